//! Loading and row-level validation of the raw extracts.
//!
//! Loading is the only phase that touches the filesystem; everything
//! downstream operates on the returned in-memory tables. Individual
//! malformed rows are excluded and counted, never fatal. Missing files are
//! fatal and reported with the offending path.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::{DataError, Result};
use crate::records::{Order, RawCustomerRow, RawOrderRow, parse_timestamp};
use crate::status::OrderStatus;

/// Customer join table: per-order `customer_id` to longitudinal
/// `customer_unique_id`.
#[derive(Debug, Clone)]
pub struct CustomerTable {
    unique_by_customer: HashMap<String, String>,

    /// Duplicate `customer_id` rows dropped (first-seen kept).
    pub duplicate_ids: usize,
}

impl CustomerTable {
    /// Number of distinct `customer_id` keys.
    pub fn len(&self) -> usize {
        self.unique_by_customer.len()
    }

    /// True when the table holds no customers.
    pub fn is_empty(&self) -> bool {
        self.unique_by_customer.is_empty()
    }

    /// Resolve a per-order `customer_id` to its longitudinal identifier.
    pub fn unique_id(&self, customer_id: &str) -> Option<&str> {
        self.unique_by_customer.get(customer_id).map(String::as_str)
    }

    #[cfg(test)]
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            unique_by_customer: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            duplicate_ids: 0,
        }
    }
}

/// Row-level exclusion counts accumulated while loading orders.
///
/// Every excluded row is counted under exactly one category; the counts are
/// surfaced in the run metadata and the build summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Raw order rows read from the extract.
    pub order_rows_read: usize,

    /// Orders kept after validation and joining.
    pub orders_kept: usize,

    /// Rows dropped because their `order_id` was already seen.
    pub duplicate_order_ids: usize,

    /// Rows dropped for a status outside the marketplace vocabulary.
    pub unknown_status_rows: usize,

    /// Rows dropped for a missing or unparseable purchase timestamp.
    pub malformed_purchase_timestamps: usize,

    /// Rows kept with their delivery timestamp cleared because it was
    /// present but unparseable.
    pub malformed_delivery_timestamps: usize,

    /// Rows dropped because their `customer_id` has no customer record.
    pub unmatched_customers: usize,
}

impl IngestStats {
    /// Total order rows excluded from the in-memory table.
    pub const fn rows_excluded(&self) -> usize {
        self.duplicate_order_ids
            + self.unknown_status_rows
            + self.malformed_purchase_timestamps
            + self.unmatched_customers
    }
}

/// Parsed orders plus the exclusion counts from loading them.
#[derive(Debug, Clone)]
pub struct OrderTable {
    /// Validated orders, in extract order.
    pub orders: Vec<Order>,

    /// Row-level exclusion counts.
    pub stats: IngestStats,
}

/// Load the customers extract.
///
/// # Errors
///
/// Returns [`DataError::MissingInput`] when the file does not exist, or a
/// CSV error when it is structurally unreadable.
pub fn load_customers(path: &Path) -> Result<CustomerTable> {
    if !path.exists() {
        return Err(DataError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    read_customers(file)
}

/// Load the orders extract and join it against the customer table.
///
/// # Errors
///
/// Returns [`DataError::MissingInput`] when the file does not exist, or a
/// CSV error when it is structurally unreadable. Row-level problems are
/// counted in the returned [`IngestStats`], not raised.
pub fn load_orders(path: &Path, customers: &CustomerTable) -> Result<OrderTable> {
    if !path.exists() {
        return Err(DataError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    read_orders(file, customers)
}

fn read_customers<R: Read>(reader: R) -> Result<CustomerTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut unique_by_customer = HashMap::new();
    let mut duplicate_ids = 0;

    for row in rdr.deserialize::<RawCustomerRow>() {
        let row = row?;
        if unique_by_customer.contains_key(&row.customer_id) {
            duplicate_ids += 1;
            continue;
        }
        unique_by_customer.insert(row.customer_id, row.customer_unique_id);
    }

    Ok(CustomerTable {
        unique_by_customer,
        duplicate_ids,
    })
}

fn read_orders<R: Read>(reader: R, customers: &CustomerTable) -> Result<OrderTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut seen_order_ids = HashSet::new();
    let mut orders = Vec::new();
    let mut stats = IngestStats::default();

    for row in rdr.deserialize::<RawOrderRow>() {
        let row = row?;
        stats.order_rows_read += 1;

        // First-seen wins, regardless of whether the first row was itself
        // usable: the dedup decision must not depend on later validation.
        if !seen_order_ids.insert(row.order_id.clone()) {
            stats.duplicate_order_ids += 1;
            continue;
        }

        let Some(status) = OrderStatus::parse(&row.order_status) else {
            stats.unknown_status_rows += 1;
            continue;
        };

        let Some(purchase_ts) = row
            .order_purchase_timestamp
            .as_deref()
            .and_then(parse_timestamp)
        else {
            stats.malformed_purchase_timestamps += 1;
            continue;
        };

        let Some(customer) = customers.unique_id(&row.customer_id) else {
            stats.unmatched_customers += 1;
            continue;
        };

        // A delivery timestamp that is present but unparseable downgrades
        // the order to not-delivered instead of dropping it.
        let delivery_ts = match row.order_delivered_customer_date.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    stats.malformed_delivery_timestamps += 1;
                }
                parsed
            }
        };

        orders.push(Order {
            order_id: row.order_id,
            customer: customer.to_string(),
            status,
            purchase_ts,
            delivery_ts,
        });
    }

    stats.orders_kept = orders.len();
    Ok(OrderTable { orders, stats })
}
