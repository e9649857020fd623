//! CSV and JSON export of cohort tables.
//!
//! Two row shapes exist: the full [`CohortRow`] kept alongside the
//! manuscript sources, and the sanitized [`PublicCohortRow`] for
//! redistribution, which omits every identifier and reduces the anchor to
//! date granularity.

use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use rebuy_cohort::SurvivalRecord;
use rebuy_data::records::TIMESTAMP_FORMAT;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One full cohort row, identifiers included.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CohortRow {
    /// Longitudinal customer identifier.
    pub customer_id: String,

    /// Identifier of the index order.
    pub index_order_id: String,

    /// Anchor timestamp, extract format.
    pub index_date: String,

    /// Whether a qualifying repurchase was observed.
    pub event_observed: bool,

    /// Identifier of the repurchase order, empty when censored.
    pub repurchase_order_id: Option<String>,

    /// Status of the repurchase order, empty when censored.
    pub repurchase_status: Option<String>,

    /// Days to the event or to the snapshot.
    pub time_to_event_or_censoring: f64,

    /// Days of follow-up available before the snapshot.
    pub follow_up_days: f64,
}

impl CohortRow {
    const HEADER: [&'static str; 8] = [
        "customer_id",
        "index_order_id",
        "index_date",
        "event_observed",
        "repurchase_order_id",
        "repurchase_status",
        "time_to_event_or_censoring",
        "follow_up_days",
    ];
}

impl From<&SurvivalRecord> for CohortRow {
    fn from(record: &SurvivalRecord) -> Self {
        Self {
            customer_id: record.customer_id.clone(),
            index_order_id: record.index_order_id.clone(),
            index_date: record.index_date.format(TIMESTAMP_FORMAT).to_string(),
            event_observed: record.event_observed,
            repurchase_order_id: record.repurchase_order_id.clone(),
            repurchase_status: record.repurchase_status.map(|s| s.to_string()),
            time_to_event_or_censoring: record.time_to_event_or_censoring,
            follow_up_days: record.follow_up_days,
        }
    }
}

/// One sanitized cohort row: no identifiers, date-granular anchor.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicCohortRow {
    /// Anchor date.
    pub index_date: NaiveDate,

    /// Whether a qualifying repurchase was observed.
    pub event_observed: bool,

    /// Days to the event or to the snapshot.
    pub time_to_event_or_censoring: f64,

    /// Days of follow-up available before the snapshot.
    pub follow_up_days: f64,
}

impl PublicCohortRow {
    const HEADER: [&'static str; 4] = [
        "index_date",
        "event_observed",
        "time_to_event_or_censoring",
        "follow_up_days",
    ];
}

impl From<&SurvivalRecord> for PublicCohortRow {
    fn from(record: &SurvivalRecord) -> Self {
        Self {
            index_date: record.index_date.date(),
            event_observed: record.event_observed,
            time_to_event_or_censoring: record.time_to_event_or_censoring,
            follow_up_days: record.follow_up_days,
        }
    }
}

/// Convert survival records into full export rows.
pub fn cohort_rows(records: &[SurvivalRecord]) -> Vec<CohortRow> {
    records.iter().map(CohortRow::from).collect()
}

/// Convert survival records into sanitized export rows.
pub fn public_rows(records: &[SurvivalRecord]) -> Vec<PublicCohortRow> {
    records.iter().map(PublicCohortRow::from).collect()
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize rows as CSV with an explicit header, so that an empty cohort
/// still produces a well-formed table.
fn rows_to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)
        .expect("CSV output is UTF-8");
    Ok(data)
}

impl Exporter for Vec<CohortRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(&CohortRow::HEADER, self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<PublicCohortRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(&PublicCohortRow::HEADER, self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
