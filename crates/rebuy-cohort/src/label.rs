//! Repurchase-event labeling and administrative censoring.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use rebuy_data::{Order, OrderStatus};

use crate::config::RepurchasePolicy;
use crate::index::IndexRecord;

/// One customer's survival outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalRecord {
    /// Longitudinal customer identifier. Omitted from sanitized outputs.
    pub customer_id: String,

    /// Identifier of the index order.
    pub index_order_id: String,

    /// Anchor of the observation window: delivery of the index order.
    pub index_date: NaiveDateTime,

    /// Whether a qualifying repurchase was observed before the snapshot.
    pub event_observed: bool,

    /// Identifier of the repurchase order, when an event was observed.
    pub repurchase_order_id: Option<String>,

    /// Status of the repurchase order, when an event was observed.
    pub repurchase_status: Option<OrderStatus>,

    /// Days from the anchor to the event, or to the snapshot when
    /// censored. Always non-negative; equals `follow_up_days` when
    /// censored.
    pub time_to_event_or_censoring: f64,

    /// Days from the anchor to the administrative snapshot.
    pub follow_up_days: f64,
}

/// Exclusion counts accumulated during labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Indexed customers dropped because their anchor postdates the
    /// snapshot (inconsistent under a fixed snapshot earlier than the
    /// data).
    pub index_after_snapshot: usize,
}

/// Fractional days from `from` to `until`.
pub fn days_between(from: NaiveDateTime, until: NaiveDateTime) -> f64 {
    (until - from).num_seconds() as f64 / 86_400.0
}

/// Label each indexed customer with their repurchase outcome.
///
/// A qualifying repurchase is the earliest order of the same customer with
/// purchase timestamp strictly after the anchor and not after the
/// snapshot, passing `policy`; ties on the purchase timestamp break by
/// order identifier. Customers whose anchor postdates the snapshot are
/// dropped and counted. The output preserves the index ordering (by
/// customer identifier).
pub fn label_events(
    orders: &[Order],
    index: &[IndexRecord],
    snapshot: NaiveDateTime,
    policy: RepurchasePolicy,
) -> (Vec<SurvivalRecord>, LabelStats) {
    let mut by_customer: HashMap<&str, Vec<&Order>> = HashMap::new();
    for order in orders {
        by_customer.entry(order.customer.as_str()).or_default().push(order);
    }

    let mut records = Vec::with_capacity(index.len());
    let mut stats = LabelStats::default();

    for anchor in index {
        let t0 = anchor.delivery_ts;
        if t0 > snapshot {
            stats.index_after_snapshot += 1;
            continue;
        }
        let follow_up_days = days_between(t0, snapshot);

        let repurchase = by_customer
            .get(anchor.customer.as_str())
            .into_iter()
            .flatten()
            .copied()
            .filter(|o| o.purchase_ts > t0 && o.purchase_ts <= snapshot)
            .filter(|o| policy.qualifies(o))
            .min_by_key(|o| (o.purchase_ts, o.order_id.as_str()));

        let record = match repurchase {
            Some(event) => SurvivalRecord {
                customer_id: anchor.customer.clone(),
                index_order_id: anchor.order_id.clone(),
                index_date: t0,
                event_observed: true,
                repurchase_order_id: Some(event.order_id.clone()),
                repurchase_status: Some(event.status),
                time_to_event_or_censoring: days_between(t0, event.purchase_ts),
                follow_up_days,
            },
            None => SurvivalRecord {
                customer_id: anchor.customer.clone(),
                index_order_id: anchor.order_id.clone(),
                index_date: t0,
                event_observed: false,
                repurchase_order_id: None,
                repurchase_status: None,
                time_to_event_or_censoring: follow_up_days,
                follow_up_days,
            },
        };
        records.push(record);
    }

    (records, stats)
}
