//! Marketplace order status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle statuses observed in the marketplace extract.
///
/// The vocabulary is closed: a row carrying any other status string is
/// treated as malformed and excluded from ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order registered but not yet approved.
    Created,

    /// Payment approved.
    Approved,

    /// Invoice issued.
    Invoiced,

    /// In fulfilment.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Delivered to the customer.
    Delivered,

    /// Canceled before completion.
    Canceled,

    /// Could not be fulfilled.
    Unavailable,
}

impl OrderStatus {
    /// Returns all statuses in the vocabulary.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Created,
            Self::Approved,
            Self::Invoiced,
            Self::Processing,
            Self::Shipped,
            Self::Delivered,
            Self::Canceled,
            Self::Unavailable,
        ]
    }

    /// Returns the status string as it appears in the raw extract.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Approved => "approved",
            Self::Invoiced => "invoiced",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
            Self::Unavailable => "unavailable",
        }
    }

    /// Parse a raw status string. Returns `None` for anything outside the
    /// vocabulary, including empty strings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "created" => Some(Self::Created),
            "approved" => Some(Self::Approved),
            "invoiced" => Some(Self::Invoiced),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "canceled" => Some(Self::Canceled),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
