//! Human-readable build summary.

use crate::metadata::CohortMetadata;

/// Render the plain-text build summary that accompanies the cohort tables.
pub fn render_build_summary(meta: &CohortMetadata) -> String {
    let mut out = String::new();

    out.push_str("SURVIVAL COHORT BUILD SUMMARY\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push('\n');

    out.push_str(&format!(
        "Snapshot ({}): {}\n",
        meta.snapshot_source, meta.snapshot_ts
    ));
    out.push_str(&format!(
        "Customers with delivered index order: {}\n",
        meta.customers_indexed
    ));
    if meta.index_after_snapshot > 0 {
        out.push_str(&format!(
            "Excluded (anchor after snapshot): {}\n",
            meta.index_after_snapshot
        ));
    }
    out.push('\n');

    out.push_str("Pre-filter cohort:\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    out.push_str(&format!("  Rows:         {}\n", meta.prefilter_rows));
    out.push_str(&format!(
        "  Events:       {} ({:.2}%)\n",
        meta.prefilter_events,
        meta.prefilter_event_rate * 100.0
    ));
    out.push_str(&format!(
        "  Within 24h:   {:.2}% of rows (diagnostic)\n",
        meta.pct_events_within_24h
    ));
    out.push('\n');

    out.push_str(&format!(
        "Analytic cohort (follow-up >= {} days):\n",
        meta.min_follow_up_days
    ));
    out.push_str(&"-".repeat(60));
    out.push('\n');
    out.push_str(&format!("  Rows:         {}\n", meta.analytic_rows));
    out.push_str(&format!(
        "  Events:       {} ({:.2}%)\n",
        meta.analytic_events,
        meta.analytic_event_rate * 100.0
    ));
    out.push('\n');

    if !meta.repurchase_status_counts.is_empty() {
        out.push_str("Repurchase order status distribution (events only):\n");
        out.push_str(&"-".repeat(60));
        out.push('\n');
        for (status, count) in &meta.repurchase_status_counts {
            out.push_str(&format!("  {status:<14} {count}\n"));
        }
        out.push('\n');
    }

    out.push_str("Index order definition:\n");
    out.push_str(&format!("  {}\n", meta.index_definition));
    out.push('\n');
    out.push_str(&format!("Repurchase definition ({}):\n", meta.repurchase_policy));
    out.push_str(&format!("  {}\n", meta.repurchase_definition));
    out.push('\n');

    out.push_str("Ingestion exclusions:\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    out.push_str(&format!("  Rows read:                {}\n", meta.ingest.order_rows_read));
    out.push_str(&format!("  Orders kept:              {}\n", meta.ingest.orders_kept));
    out.push_str(&format!(
        "  Duplicate order ids:      {}\n",
        meta.ingest.duplicate_order_ids
    ));
    out.push_str(&format!(
        "  Unknown statuses:         {}\n",
        meta.ingest.unknown_status_rows
    ));
    out.push_str(&format!(
        "  Malformed purchase ts:    {}\n",
        meta.ingest.malformed_purchase_timestamps
    ));
    out.push_str(&format!(
        "  Malformed delivery ts:    {}\n",
        meta.ingest.malformed_delivery_timestamps
    ));
    out.push_str(&format!(
        "  Unmatched customers:      {}\n",
        meta.ingest.unmatched_customers
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rebuy_cohort::{CohortBuilder, CohortConfig};
    use rebuy_data::{IngestStats, Order, OrderStatus};
    use std::path::Path;

    fn sample_metadata() -> CohortMetadata {
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
        let build = CohortBuilder::new(CohortConfig::default())
            .unwrap()
            .build(&orders)
            .unwrap();
        CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"))
    }

    #[test]
    fn test_summary_mentions_key_figures() {
        let summary = render_build_summary(&sample_metadata());

        assert!(summary.contains("SURVIVAL COHORT BUILD SUMMARY"));
        assert!(summary.contains("Pre-filter cohort:"));
        assert!(summary.contains("Analytic cohort (follow-up >= 180 days):"));
        assert!(summary.contains("delivered-only"));
        assert!(summary.contains("Ingestion exclusions:"));
    }

    #[test]
    fn test_summary_lists_status_distribution() {
        let summary = render_build_summary(&sample_metadata());
        assert!(summary.contains("Repurchase order status distribution"));
        assert!(summary.contains("delivered"));
    }
}
