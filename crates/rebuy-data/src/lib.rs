#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/retentionlab/rebuy/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ingest;
pub mod paths;
pub mod records;
pub mod status;

pub use error::{DataError, Result};
pub use ingest::{CustomerTable, IngestStats, OrderTable, load_customers, load_orders};
pub use records::Order;
pub use status::OrderStatus;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
