//! Administrative snapshot resolution.
//!
//! The snapshot is the right boundary of every customer's observation
//! window. By default it is derived from the raw orders before any cohort
//! filtering, so that the censoring boundary reflects the full extract and
//! not the subset that survives validation of downstream stages.

use chrono::NaiveDateTime;

use rebuy_data::Order;

use crate::error::{CohortError, Result};

/// Where the administrative snapshot timestamp comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Maximum purchase timestamp over all ingested orders.
    FromData,

    /// An explicit, fixed timestamp.
    Fixed(NaiveDateTime),
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self::FromData
    }
}

impl SnapshotPolicy {
    /// Resolve the snapshot timestamp against the ingested orders.
    ///
    /// # Errors
    ///
    /// Returns [`CohortError::NoUsableOrders`] for [`Self::FromData`] when
    /// no orders were ingested.
    pub fn resolve(&self, orders: &[Order]) -> Result<NaiveDateTime> {
        match self {
            Self::Fixed(ts) => Ok(*ts),
            Self::FromData => orders
                .iter()
                .map(|o| o.purchase_ts)
                .max()
                .ok_or(CohortError::NoUsableOrders),
        }
    }
}
