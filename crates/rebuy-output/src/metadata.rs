//! Run metadata for downstream scripts and the manuscript.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use rebuy_cohort::{CohortBuild, SnapshotPolicy};
use rebuy_data::records::TIMESTAMP_FORMAT;
use rebuy_data::{IngestStats, paths};

use crate::export::ExportError;

/// Definition of the index order, recorded verbatim in the metadata.
const INDEX_DEFINITION: &str =
    "earliest delivered order by delivery timestamp; ties by purchase timestamp, then order id";

/// Everything a downstream consumer needs to interpret the cohort tables:
/// the snapshot, the policies, the row counts, the event rates, and the
/// row-level exclusion counts from ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct CohortMetadata {
    /// Resolved administrative snapshot timestamp.
    pub snapshot_ts: String,

    /// Whether the snapshot was derived from the data or fixed.
    pub snapshot_source: String,

    /// Name of the qualifying-repurchase policy.
    pub repurchase_policy: String,

    /// Definition of the index order.
    pub index_definition: String,

    /// Definition of a qualifying repurchase under the active policy.
    pub repurchase_definition: String,

    /// Minimum follow-up retained in the analytic cohort, days.
    pub min_follow_up_days: f64,

    /// Customers with a delivered index order.
    pub customers_indexed: usize,

    /// Indexed customers dropped for an anchor after the snapshot.
    pub index_after_snapshot: usize,

    /// Pre-filter cohort size.
    pub prefilter_rows: usize,

    /// Events in the pre-filter cohort.
    pub prefilter_events: usize,

    /// Event rate over the pre-filter cohort.
    pub prefilter_event_rate: f64,

    /// Analytic cohort size.
    pub analytic_rows: usize,

    /// Events in the analytic cohort.
    pub analytic_events: usize,

    /// Event rate over the analytic cohort.
    pub analytic_event_rate: f64,

    /// Share of pre-filter rows that are events within 24 hours, percent.
    pub pct_events_within_24h: f64,

    /// Repurchase order statuses among events.
    pub repurchase_status_counts: BTreeMap<String, usize>,

    /// Row-level exclusion counts from ingestion.
    pub ingest: IngestStats,

    /// Raw-data directory the extracts were read from.
    pub data_dir: String,

    /// Input extract file names.
    pub inputs: InputFiles,
}

/// Names of the raw extracts consumed by a run.
#[derive(Debug, Clone, Serialize)]
pub struct InputFiles {
    /// Orders extract file name.
    pub orders: String,

    /// Customers extract file name.
    pub customers: String,
}

impl CohortMetadata {
    /// Assemble the metadata for one build.
    pub fn new(build: &CohortBuild, ingest: IngestStats, data_dir: &Path) -> Self {
        let d = &build.diagnostics;
        Self {
            snapshot_ts: build.snapshot.format(TIMESTAMP_FORMAT).to_string(),
            snapshot_source: match build.config.snapshot {
                SnapshotPolicy::FromData => "derived-from-data".to_string(),
                SnapshotPolicy::Fixed(_) => "fixed".to_string(),
            },
            repurchase_policy: build.config.repurchase.name().to_string(),
            index_definition: INDEX_DEFINITION.to_string(),
            repurchase_definition: build.config.repurchase.description().to_string(),
            min_follow_up_days: build.config.min_follow_up_days,
            customers_indexed: d.customers_indexed,
            index_after_snapshot: d.index_after_snapshot,
            prefilter_rows: d.prefilter_rows,
            prefilter_events: d.prefilter_events,
            prefilter_event_rate: d.prefilter_event_rate(),
            analytic_rows: d.analytic_rows,
            analytic_events: d.analytic_events,
            analytic_event_rate: d.analytic_event_rate(),
            pct_events_within_24h: d.pct_events_within_24h,
            repurchase_status_counts: d.repurchase_status_counts.clone(),
            ingest,
            data_dir: data_dir.display().to_string(),
            inputs: InputFiles {
                orders: paths::ORDERS_FILE.to_string(),
                customers: paths::CUSTOMERS_FILE.to_string(),
            },
        }
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rebuy_cohort::{CohortBuilder, CohortConfig, RepurchasePolicy};
    use rebuy_data::{Order, OrderStatus};
    use rstest::rstest;

    fn sample_build(policy: RepurchasePolicy) -> CohortBuild {
        let t0 = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let orders = vec![
            Order {
                order_id: "a1".to_string(),
                customer: "u1".to_string(),
                status: OrderStatus::Delivered,
                purchase_ts: t0,
                delivery_ts: Some(t0 + Duration::days(5)),
            },
            Order {
                order_id: "a2".to_string(),
                customer: "u1".to_string(),
                status: OrderStatus::Delivered,
                purchase_ts: t0 + Duration::days(250),
                delivery_ts: Some(t0 + Duration::days(256)),
            },
        ];
        let config = CohortConfig {
            repurchase: policy,
            ..CohortConfig::default()
        };
        CohortBuilder::new(config).unwrap().build(&orders).unwrap()
    }

    #[test]
    fn test_metadata_counts() {
        let build = sample_build(RepurchasePolicy::DeliveredOnly);
        let meta = CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"));

        assert_eq!(meta.prefilter_rows, 1);
        assert_eq!(meta.prefilter_events, 1);
        assert_eq!(meta.snapshot_source, "derived-from-data");
        assert_eq!(meta.inputs.orders, "olist_orders_dataset.csv");
    }

    #[rstest]
    #[case(RepurchasePolicy::DeliveredOnly, "delivered-only")]
    #[case(RepurchasePolicy::AnyValidStatus, "any-valid-status")]
    fn test_metadata_names_active_policy(
        #[case] policy: RepurchasePolicy,
        #[case] expected: &str,
    ) {
        let build = sample_build(policy);
        let meta = CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"));
        assert_eq!(meta.repurchase_policy, expected);
    }

    #[test]
    fn test_metadata_json_shape() {
        let build = sample_build(RepurchasePolicy::DeliveredOnly);
        let meta = CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"));
        let json = meta.to_json().unwrap();

        assert!(json.contains("\"snapshot_ts\""));
        assert!(json.contains("\"analytic_event_rate\""));
        assert!(json.contains("\"order_rows_read\""));
        assert!(json.contains("\"repurchase_status_counts\""));
    }
}
