#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/retentionlab/rebuy/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod metadata;
pub mod summary;
pub mod write;

pub use export::{
    CohortRow, ExportError, ExportFormat, Exporter, PublicCohortRow, cohort_rows, public_rows,
};
pub use metadata::CohortMetadata;
pub use summary::render_build_summary;
pub use write::{OutputSet, write_outputs};
