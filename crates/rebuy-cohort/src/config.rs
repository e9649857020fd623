//! Cohort configuration and the named qualifying-repurchase policies.

use serde::{Deserialize, Serialize};
use std::fmt;

use rebuy_data::{Order, OrderStatus};

use crate::error::{CohortError, Result};
use crate::snapshot::SnapshotPolicy;

/// Default minimum follow-up window, in days.
pub const DEFAULT_MIN_FOLLOW_UP_DAYS: f64 = 180.0;

/// The rule deciding which subsequent orders count as a repurchase event.
///
/// This definition directly moves the reported event rate, so it is an
/// explicit parameter rather than an implicit rule buried in the labeling
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepurchasePolicy {
    /// Only subsequent orders that were actually delivered qualify,
    /// symmetric with how the index order is chosen.
    DeliveredOnly,

    /// Any subsequent order qualifies unless it was canceled or could not
    /// be fulfilled.
    AnyValidStatus,
}

impl RepurchasePolicy {
    /// Returns all available policies.
    pub fn all() -> Vec<Self> {
        vec![Self::DeliveredOnly, Self::AnyValidStatus]
    }

    /// Stable policy name used on the CLI and in run metadata.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DeliveredOnly => "delivered-only",
            Self::AnyValidStatus => "any-valid-status",
        }
    }

    /// One-line description for the policy listing.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::DeliveredOnly => {
                "count only delivered subsequent orders, symmetric with the index anchor"
            }
            Self::AnyValidStatus => {
                "count any subsequent order except canceled and unavailable ones"
            }
        }
    }

    /// Parse a policy from its stable name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "delivered-only" => Some(Self::DeliveredOnly),
            "any-valid-status" => Some(Self::AnyValidStatus),
            _ => None,
        }
    }

    /// Does `order` qualify as a repurchase event under this policy?
    ///
    /// Temporal constraints (strictly after the index anchor, not after the
    /// snapshot) are applied by the labeling pass, not here.
    pub fn qualifies(&self, order: &Order) -> bool {
        match self {
            Self::DeliveredOnly => {
                order.status == OrderStatus::Delivered && order.delivery_ts.is_some()
            }
            Self::AnyValidStatus => !matches!(
                order.status,
                OrderStatus::Canceled | OrderStatus::Unavailable
            ),
        }
    }
}

impl fmt::Display for RepurchasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Full configuration of a cohort build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortConfig {
    /// Where the administrative snapshot timestamp comes from.
    pub snapshot: SnapshotPolicy,

    /// Minimum follow-up window retained in the analytic cohort, in days.
    pub min_follow_up_days: f64,

    /// Qualifying-repurchase rule.
    pub repurchase: RepurchasePolicy,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            snapshot: SnapshotPolicy::FromData,
            min_follow_up_days: DEFAULT_MIN_FOLLOW_UP_DAYS,
            repurchase: RepurchasePolicy::DeliveredOnly,
        }
    }
}

impl CohortConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CohortError::InvalidThreshold`] when the follow-up
    /// threshold is negative, NaN, or infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.min_follow_up_days.is_finite() || self.min_follow_up_days < 0.0 {
            return Err(CohortError::InvalidThreshold {
                value: self.min_follow_up_days,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn order(status: OrderStatus, delivered: bool) -> Order {
        let purchase = NaiveDate::from_ymd_opt(2017, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Order {
            order_id: "o1".to_string(),
            customer: "u1".to_string(),
            status,
            purchase_ts: purchase,
            delivery_ts: delivered.then(|| purchase + chrono::Duration::days(4)),
        }
    }

    #[test]
    fn test_policy_name_roundtrip() {
        for policy in RepurchasePolicy::all() {
            assert_eq!(RepurchasePolicy::parse(policy.name()), Some(policy));
        }
        assert_eq!(RepurchasePolicy::parse("strictest"), None);
    }

    #[test]
    fn test_delivered_only_requires_delivery_timestamp() {
        let policy = RepurchasePolicy::DeliveredOnly;
        assert!(policy.qualifies(&order(OrderStatus::Delivered, true)));
        // Delivered status without a delivery timestamp does not qualify.
        assert!(!policy.qualifies(&order(OrderStatus::Delivered, false)));
        assert!(!policy.qualifies(&order(OrderStatus::Shipped, false)));
    }

    #[rstest]
    #[case(OrderStatus::Delivered, true)]
    #[case(OrderStatus::Shipped, true)]
    #[case(OrderStatus::Invoiced, true)]
    #[case(OrderStatus::Created, true)]
    #[case(OrderStatus::Canceled, false)]
    #[case(OrderStatus::Unavailable, false)]
    fn test_any_valid_status_policy(#[case] status: OrderStatus, #[case] expected: bool) {
        let policy = RepurchasePolicy::AnyValidStatus;
        assert_eq!(policy.qualifies(&order(status, false)), expected);
    }

    #[test]
    fn test_default_config() {
        let config = CohortConfig::default();
        assert_eq!(config.repurchase, RepurchasePolicy::DeliveredOnly);
        assert_eq!(config.min_follow_up_days, DEFAULT_MIN_FOLLOW_UP_DAYS);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_thresholds_rejected(#[case] threshold: f64) {
        let config = CohortConfig {
            min_follow_up_days: threshold,
            ..CohortConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CohortError::InvalidThreshold { .. })
        ));
    }
}
