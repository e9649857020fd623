//! Input path resolution.

use std::path::{Path, PathBuf};

/// Orders extract file name.
pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";

/// Customers extract file name.
pub const CUSTOMERS_FILE: &str = "olist_customers_dataset.csv";

/// Environment variable overriding the raw-data directory.
pub const RAW_DIR_ENV: &str = "REBUY_RAW_DIR";

/// Default raw-data directory, relative to the working directory.
pub const DEFAULT_RAW_DIR: &str = "raw_data";

/// Resolve the raw-data directory.
///
/// Precedence: explicit flag > `$REBUY_RAW_DIR` > `raw_data/`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(RAW_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from(DEFAULT_RAW_DIR)
}

/// Path of the orders extract inside a raw-data directory.
pub fn orders_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ORDERS_FILE)
}

/// Path of the customers extract inside a raw-data directory.
pub fn customers_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CUSTOMERS_FILE)
}
