//! Unified error handling.
//!
//! Each module owns its error enum; `WidgetError` gathers them for callers
//! that want a single type. None of these are fatal: a failed catalog load
//! leaves an empty catalog and a corrupt cart is reset to empty.

use thiserror::Error;

use crate::cart::CorruptState;
use crate::catalog::FetchError;
use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::pricing::DiscountError;
use crate::storage::StorageError;

/// Message shown to the user when the catalog cannot be loaded.
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Failed to load products. Please try again later.";

/// Application-level error type for the widget engine.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Catalog could not be fetched or parsed.
    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    /// Persisted cart could not be decoded.
    #[error("Corrupt cart state: {0}")]
    CorruptState(#[from] CorruptState),

    /// Key-value store read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Filter control value could not be parsed.
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Discount rate outside `[0, 1)`.
    #[error("Invalid discount: {0}")]
    Discount(#[from] DiscountError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl WidgetError {
    /// Message safe to show in the presentation layer.
    ///
    /// Internal details (paths, HTTP status, parser positions) stay in the
    /// logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(_) => CATALOG_UNAVAILABLE_MESSAGE.to_string(),
            Self::CorruptState(_) | Self::Storage(_) | Self::Config(_) => {
                "Something went wrong. Please reload and try again.".to_string()
            }
            Self::Filter(err) => err.to_string(),
            Self::Discount(_) => "Invalid discount".to_string(),
        }
    }
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;
