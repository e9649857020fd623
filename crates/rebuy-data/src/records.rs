//! Typed row records for the raw extracts and the parsed in-memory order.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::status::OrderStatus;

/// Timestamp format used throughout the raw extracts.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the raw orders CSV. Columns not listed here are ignored by
/// the CSV reader.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderRow {
    /// Order identifier.
    pub order_id: String,

    /// Per-order customer identifier (joins to the customers extract).
    pub customer_id: String,

    /// Raw status string, validated against [`OrderStatus`] during ingest.
    pub order_status: String,

    /// Purchase timestamp string.
    pub order_purchase_timestamp: Option<String>,

    /// Delivery timestamp string, present only for delivered orders.
    pub order_delivered_customer_date: Option<String>,
}

/// One row of the raw customers CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCustomerRow {
    /// Per-order customer identifier.
    pub customer_id: String,

    /// Longitudinal customer identifier, stable across orders.
    pub customer_unique_id: String,
}

/// A fully parsed order, joined to its longitudinal customer identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Order identifier, unique after ingest deduplication.
    pub order_id: String,

    /// Longitudinal customer identifier.
    pub customer: String,

    /// Validated order status.
    pub status: OrderStatus,

    /// Purchase timestamp.
    pub purchase_ts: NaiveDateTime,

    /// Delivery timestamp, if the order reached the customer.
    pub delivery_ts: Option<NaiveDateTime>,
}

/// Parse a raw extract timestamp. Returns `None` for empty or unparseable
/// strings.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}
