//! Widget configuration loaded from environment variables.
//!
//! Library code never reads the environment on its own; binaries call
//! [`WidgetConfig::from_env`] once at startup and pass the result down.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_CATALOG` - Catalog URL (`http`/`https`) or file path (default: products.json)
//! - `SHOPFRONT_STORAGE_DIR` - Directory for the local key-value store (default: .shopfront)
//! - `SHOPFRONT_CART_KEY` - Storage key holding the cart (default: cart)
//! - `SHOPFRONT_CURRENCY` - Display currency (default: USD)

use std::path::PathBuf;

use shopfront_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG: &str = "products.json";
const DEFAULT_STORAGE_DIR: &str = ".shopfront";
const DEFAULT_CART_KEY: &str = "cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the catalog document is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    /// Fetched with an HTTP GET.
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl CatalogLocation {
    /// Interpret a location string: `http(s)://` values are URLs, anything
    /// else is a file path.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the value has an HTTP scheme but is not a
    /// valid URL.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Url::parse(value).map(Self::Url)
        } else {
            Ok(Self::File(PathBuf::from(value)))
        }
    }
}

impl Default for CatalogLocation {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_CATALOG))
    }
}

/// Widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Catalog document location
    pub catalog: CatalogLocation,
    /// Directory backing the file key-value store
    pub storage_dir: PathBuf,
    /// Key under which the cart is persisted
    pub cart_key: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogLocation::default(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog = get_or_default(&lookup, "SHOPFRONT_CATALOG", DEFAULT_CATALOG);
        let catalog = CatalogLocation::parse(&catalog).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_CATALOG".to_string(), e.to_string())
        })?;

        let storage_dir = PathBuf::from(get_or_default(
            &lookup,
            "SHOPFRONT_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));

        let cart_key = get_or_default(&lookup, "SHOPFRONT_CART_KEY", DEFAULT_CART_KEY);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let currency = get_optional(&lookup, "SHOPFRONT_CURRENCY")
            .map(|value| value.parse::<CurrencyCode>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_CURRENCY".to_string(), e.to_string())
            })?
            .unwrap_or_default();

        Ok(Self {
            catalog,
            storage_dir,
            cart_key,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}
