//! Catalog sources and the immutable catalog store.
//!
//! The catalog is a JSON array of products, fetched exactly once per session.
//! A load either yields a fully validated [`Catalog`] or a [`FetchError`];
//! there is no partially loaded state.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use shopfront_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogLocation;
use crate::pricing;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document parsed but violates a catalog rule.
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

// =============================================================================
// Sources
// =============================================================================

/// Something the catalog document can be fetched from.
pub trait CatalogSource {
    /// Fetch and parse the catalog.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Product>, FetchError>> + Send;
}

/// Fetches the catalog with a plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpCatalogSource {
    /// Create a source for `url` with a default client.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create a source reusing an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Product>, FetchError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Catalog downloaded");
        parse_catalog(&body)
    }
}

/// Reads the catalog from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    /// Create a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogSource for FileCatalogSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<Product>, FetchError> {
        let body = tokio::fs::read(&self.path).await?;
        parse_catalog(&body)
    }
}

/// Source selected from a configured [`CatalogLocation`].
#[derive(Debug, Clone)]
pub enum LocationSource {
    Http(HttpCatalogSource),
    File(FileCatalogSource),
}

impl From<&CatalogLocation> for LocationSource {
    fn from(location: &CatalogLocation) -> Self {
        match location {
            CatalogLocation::Url(url) => Self::Http(HttpCatalogSource::new(url.clone())),
            CatalogLocation::File(path) => Self::File(FileCatalogSource::new(path)),
        }
    }
}

impl CatalogSource for LocationSource {
    async fn fetch(&self) -> Result<Vec<Product>, FetchError> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::File(source) => source.fetch().await,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse and validate a catalog document.
///
/// # Errors
///
/// Returns `FetchError::Parse` if the bytes are not a JSON array of products,
/// and `FetchError::Invalid` if product IDs repeat, a price is negative or
/// above [`pricing::MAX_UNIT_PRICE`], or a rating falls outside `0..=5`.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Product>, FetchError> {
    let products: Vec<Product> = serde_json::from_slice(bytes)?;
    validate(&products)?;
    Ok(products)
}

fn validate(products: &[Product]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(FetchError::Invalid(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        if product.price < Decimal::ZERO {
            return Err(FetchError::Invalid(format!(
                "product {} has negative price {}",
                product.id, product.price
            )));
        }
        if !pricing::is_valid_unit_price(product.price) {
            return Err(FetchError::Invalid(format!(
                "product {} has price {} above {}",
                product.id,
                product.price,
                pricing::MAX_UNIT_PRICE
            )));
        }
        if !(0.0..=5.0).contains(&product.rating) {
            return Err(FetchError::Invalid(format!(
                "product {} has rating {} outside 0-5",
                product.id, product.rating
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// The session's product list, in catalog document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// An empty catalog, used when loading failed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Invalid` under the same rules as [`parse_catalog`].
    pub fn from_products(products: Vec<Product>) -> Result<Self, FetchError> {
        validate(&products)?;
        Ok(Self { products })
    }

    /// Fetch the catalog from `source`.
    ///
    /// # Errors
    ///
    /// Returns the source's `FetchError`, or `FetchError::Invalid` if the
    /// fetched products break a catalog rule.
    pub async fn load<S: CatalogSource + Sync>(source: &S) -> Result<Self, FetchError> {
        let products = source.fetch().await?;
        Self::from_products(products)
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
