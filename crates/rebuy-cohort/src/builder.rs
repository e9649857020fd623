//! Cohort assembly: snapshot, index, labeling, filter, diagnostics.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use rebuy_data::Order;

use crate::config::CohortConfig;
use crate::filter::apply_follow_up_filter;
use crate::index::build_index;
use crate::label::{SurvivalRecord, label_events};
use crate::{LabelStats, Result};

/// Aggregate figures describing one cohort build.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortDiagnostics {
    /// Customers with a delivered index order.
    pub customers_indexed: usize,

    /// Indexed customers dropped because their anchor postdates the
    /// snapshot.
    pub index_after_snapshot: usize,

    /// Rows in the pre-filter cohort.
    pub prefilter_rows: usize,

    /// Events observed in the pre-filter cohort.
    pub prefilter_events: usize,

    /// Rows in the analytic (filtered) cohort.
    pub analytic_rows: usize,

    /// Events observed in the analytic cohort.
    pub analytic_events: usize,

    /// Share of pre-filter rows that are events within 24 hours of the
    /// anchor, in percent. Unusually high values indicate delivery-date
    /// artifacts rather than genuine repurchases.
    pub pct_events_within_24h: f64,

    /// Repurchase order statuses among observed events.
    pub repurchase_status_counts: BTreeMap<String, usize>,
}

impl CohortDiagnostics {
    /// Event rate over the pre-filter cohort, 0 when empty.
    pub fn prefilter_event_rate(&self) -> f64 {
        rate(self.prefilter_events, self.prefilter_rows)
    }

    /// Event rate over the analytic cohort, 0 when empty.
    pub fn analytic_event_rate(&self) -> f64 {
        rate(self.analytic_events, self.analytic_rows)
    }
}

fn rate(events: usize, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        events as f64 / rows as f64
    }
}

/// The result of one cohort build.
#[derive(Debug, Clone)]
pub struct CohortBuild {
    /// Resolved administrative snapshot.
    pub snapshot: NaiveDateTime,

    /// Configuration the build ran under.
    pub config: CohortConfig,

    /// Pre-filter cohort, one record per indexed customer with a
    /// consistent anchor.
    pub prefilter: Vec<SurvivalRecord>,

    /// Analytic cohort: pre-filter records with sufficient follow-up.
    pub analytic: Vec<SurvivalRecord>,

    /// Aggregate figures for metadata and reporting.
    pub diagnostics: CohortDiagnostics,
}

/// Runs the full cohort construction over an ingested order table.
#[derive(Debug, Clone, Default)]
pub struct CohortBuilder {
    config: CohortConfig,
}

impl CohortBuilder {
    /// Create a builder with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CohortError::InvalidThreshold`] for an unusable
    /// follow-up threshold.
    pub fn new(config: CohortConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this builder runs under.
    pub const fn config(&self) -> &CohortConfig {
        &self.config
    }

    /// Build the pre-filter and analytic cohorts from ingested orders.
    ///
    /// The transformation is deterministic: identical orders and
    /// configuration produce identical cohorts, in identical row order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CohortError::NoUsableOrders`] when the snapshot is
    /// derived from the data and no orders were ingested.
    pub fn build(&self, orders: &[Order]) -> Result<CohortBuild> {
        let snapshot = self.config.snapshot.resolve(orders)?;
        let index = build_index(orders);
        let (prefilter, label_stats) =
            label_events(orders, &index, snapshot, self.config.repurchase);
        let analytic = apply_follow_up_filter(&prefilter, self.config.min_follow_up_days);
        let diagnostics = diagnose(index.len(), &label_stats, &prefilter, &analytic);

        Ok(CohortBuild {
            snapshot,
            config: self.config,
            prefilter,
            analytic,
            diagnostics,
        })
    }
}

fn diagnose(
    customers_indexed: usize,
    label_stats: &LabelStats,
    prefilter: &[SurvivalRecord],
    analytic: &[SurvivalRecord],
) -> CohortDiagnostics {
    let prefilter_events = prefilter.iter().filter(|r| r.event_observed).count();
    let analytic_events = analytic.iter().filter(|r| r.event_observed).count();

    let within_24h = prefilter
        .iter()
        .filter(|r| r.event_observed && r.time_to_event_or_censoring <= 1.0)
        .count();
    let pct_events_within_24h = if prefilter.is_empty() {
        0.0
    } else {
        within_24h as f64 / prefilter.len() as f64 * 100.0
    };

    let mut repurchase_status_counts = BTreeMap::new();
    for record in prefilter {
        if let Some(status) = record.repurchase_status {
            *repurchase_status_counts
                .entry(status.to_string())
                .or_insert(0) += 1;
        }
    }

    CohortDiagnostics {
        customers_indexed,
        index_after_snapshot: label_stats.index_after_snapshot,
        prefilter_rows: prefilter.len(),
        prefilter_events,
        analytic_rows: analytic.len(),
        analytic_events,
        pct_events_within_24h,
        repurchase_status_counts,
    }
}
