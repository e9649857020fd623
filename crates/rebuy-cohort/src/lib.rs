#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/retentionlab/rebuy/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod label;
pub mod snapshot;

pub use builder::{CohortBuild, CohortBuilder, CohortDiagnostics};
pub use config::{CohortConfig, DEFAULT_MIN_FOLLOW_UP_DAYS, RepurchasePolicy};
pub use error::{CohortError, Result};
pub use filter::apply_follow_up_filter;
pub use index::{IndexRecord, build_index};
pub use label::{LabelStats, SurvivalRecord, days_between, label_events};
pub use snapshot::SnapshotPolicy;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
