//! Error types for ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading raw data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required input file does not exist.
    #[error("required input file not found: {path}")]
    MissingInput {
        /// Path that was checked.
        path: PathBuf,
    },

    /// CSV reading or deserialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
