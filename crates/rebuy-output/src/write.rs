//! Staged, all-or-nothing writing of the output file set.
//!
//! Every output is rendered to a string before the first file is created,
//! so a serialization failure cannot leave a partial set on disk.

use std::fs;
use std::path::{Path, PathBuf};

use rebuy_cohort::CohortBuild;

use crate::export::{ExportError, ExportFormat, Exporter, cohort_rows, public_rows};
use crate::metadata::CohortMetadata;
use crate::summary::render_build_summary;

/// Pre-filter cohort table, identifiers included.
pub const PREFILTER_FILE: &str = "cohort_prefilter.csv";

/// Analytic cohort table, identifiers included.
pub const ANALYTIC_FILE: &str = "cohort_analytic.csv";

/// Sanitized pre-filter table.
pub const PREFILTER_PUBLIC_FILE: &str = "cohort_prefilter_public.csv";

/// Sanitized analytic table.
pub const ANALYTIC_PUBLIC_FILE: &str = "cohort_analytic_public.csv";

/// Run metadata.
pub const METADATA_FILE: &str = "cohort_metadata.json";

/// Human-readable build summary.
pub const SUMMARY_FILE: &str = "cohort_build_summary.txt";

/// A fully rendered output set, ready to be written.
#[derive(Debug, Clone)]
pub struct OutputSet {
    files: Vec<(&'static str, String)>,
}

impl OutputSet {
    /// Render every output of a build.
    ///
    /// # Errors
    ///
    /// Returns an error if any table or the metadata fails to serialize.
    /// Nothing is written in that case.
    pub fn render(build: &CohortBuild, metadata: &CohortMetadata) -> Result<Self, ExportError> {
        let files = vec![
            (
                PREFILTER_FILE,
                cohort_rows(&build.prefilter).export_to_string(ExportFormat::Csv)?,
            ),
            (
                ANALYTIC_FILE,
                cohort_rows(&build.analytic).export_to_string(ExportFormat::Csv)?,
            ),
            (
                PREFILTER_PUBLIC_FILE,
                public_rows(&build.prefilter).export_to_string(ExportFormat::Csv)?,
            ),
            (
                ANALYTIC_PUBLIC_FILE,
                public_rows(&build.analytic).export_to_string(ExportFormat::Csv)?,
            ),
            (METADATA_FILE, metadata.to_json()?),
            (SUMMARY_FILE, render_build_summary(metadata)),
        ];
        Ok(Self { files })
    }

    /// File names and rendered contents, in write order.
    pub fn files(&self) -> &[(&'static str, String)] {
        &self.files
    }
}

/// Render and write the full output set under `out_dir`.
///
/// The directory is created if needed. Returns the written paths.
///
/// # Errors
///
/// Returns an error if rendering fails (nothing written) or a file cannot
/// be created or written.
pub fn write_outputs(
    out_dir: &Path,
    build: &CohortBuild,
    metadata: &CohortMetadata,
) -> Result<Vec<PathBuf>, ExportError> {
    let rendered = OutputSet::render(build, metadata)?;

    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(rendered.files().len());
    for (name, contents) in rendered.files() {
        let path = out_dir.join(name);
        fs::write(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rebuy_cohort::{CohortBuilder, CohortConfig};
    use rebuy_data::{IngestStats, Order, OrderStatus};

    fn sample_build() -> CohortBuild {
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
        CohortBuilder::new(CohortConfig::default())
            .unwrap()
            .build(&orders)
            .unwrap()
    }

    #[test]
    fn test_render_produces_all_outputs() {
        let build = sample_build();
        let meta = CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"));
        let rendered = OutputSet::render(&build, &meta).unwrap();

        let names: Vec<_> = rendered.files().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                PREFILTER_FILE,
                ANALYTIC_FILE,
                PREFILTER_PUBLIC_FILE,
                ANALYTIC_PUBLIC_FILE,
                METADATA_FILE,
                SUMMARY_FILE,
            ]
        );
        for (_, contents) in rendered.files() {
            assert!(!contents.is_empty());
        }
    }

    #[test]
    fn test_write_outputs_creates_files() {
        let build = sample_build();
        let meta = CohortMetadata::new(&build, IngestStats::default(), Path::new("raw_data"));
        let out_dir =
            std::env::temp_dir().join(format!("rebuy-out-{}", std::process::id()));

        let written = write_outputs(&out_dir, &build, &meta).unwrap();
        assert_eq!(written.len(), 6);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }

        std::fs::remove_dir_all(out_dir).ok();
    }
}
