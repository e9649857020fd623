//! Error types for cohort construction.

use thiserror::Error;

/// Result type for cohort operations.
pub type Result<T> = std::result::Result<T, CohortError>;

/// Errors that can occur while building the cohort.
#[derive(Debug, Error)]
pub enum CohortError {
    /// The snapshot is derived from the data, but no usable orders exist.
    #[error("cannot derive snapshot timestamp: no usable orders were ingested")]
    NoUsableOrders,

    /// The minimum follow-up threshold is not a usable number of days.
    #[error("minimum follow-up must be a finite, non-negative number of days, got {value}")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },
}
