//! Minimum-follow-up filter.

use crate::label::SurvivalRecord;

/// Retain records whose follow-up window is at least `min_follow_up_days`.
///
/// Customers observed for a shorter window never had a fair chance to show
/// a repurchase; keeping them would bias the event rate downward. The
/// filter is pure: retained records are returned unmodified, so the
/// analytic cohort is always a subset of the pre-filter cohort.
pub fn apply_follow_up_filter(
    records: &[SurvivalRecord],
    min_follow_up_days: f64,
) -> Vec<SurvivalRecord> {
    records
        .iter()
        .filter(|r| r.follow_up_days >= min_follow_up_days)
        .cloned()
        .collect()
}
