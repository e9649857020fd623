//! Index-order construction.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use rebuy_data::{Order, OrderStatus};

/// The anchoring order of one customer's observation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Longitudinal customer identifier.
    pub customer: String,

    /// Identifier of the index order.
    pub order_id: String,

    /// Purchase timestamp of the index order.
    pub purchase_ts: NaiveDateTime,

    /// Delivery timestamp of the index order; this is the anchor (`t0`)
    /// from which durations are measured.
    pub delivery_ts: NaiveDateTime,
}

/// Select each customer's index order: the earliest delivered order.
///
/// Candidates are orders with status `delivered` and a present delivery
/// timestamp; a `delivered` row missing its delivery timestamp is treated
/// as not delivered. The earliest candidate is the minimum of
/// (delivery timestamp, purchase timestamp, order id), which makes the
/// selection deterministic under timestamp ties. Customers with no
/// candidate are excluded. The result is ordered by customer identifier.
pub fn build_index(orders: &[Order]) -> Vec<IndexRecord> {
    type Candidate<'a> = (NaiveDateTime, NaiveDateTime, &'a str);

    let mut best: BTreeMap<&str, Candidate<'_>> = BTreeMap::new();

    for order in orders {
        if order.status != OrderStatus::Delivered {
            continue;
        }
        let Some(delivery_ts) = order.delivery_ts else {
            continue;
        };
        let candidate: Candidate<'_> = (delivery_ts, order.purchase_ts, order.order_id.as_str());
        best.entry(order.customer.as_str())
            .and_modify(|current| {
                if candidate < *current {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    best.into_iter()
        .map(
            |(customer, (delivery_ts, purchase_ts, order_id))| IndexRecord {
                customer: customer.to_string(),
                order_id: order_id.to_string(),
                purchase_ts,
                delivery_ts,
            },
        )
        .collect()
}
