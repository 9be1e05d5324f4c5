//! Integration test support for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Browse, cart and checkout across a full session
//! - `persistence` - Cart survival and recovery across sessions
//! - `catalog_http` - Catalog fetch over HTTP against a local axum stub
//!
//! Everything runs against temporary directories and a loopback listener;
//! no external services are needed.

use std::future::IntoFuture;
use std::path::PathBuf;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use serde_json::json;
use shopfront_widget::WidgetConfig;
use shopfront_widget::catalog::FileCatalogSource;
use shopfront_widget::config::CatalogLocation;
use shopfront_widget::storage::FileStore;
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

/// A six-product catalog spanning three categories.
#[must_use]
pub fn sample_catalog() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Linen Shirt", "price": 40, "category": "Apparel", "rating": 4.4, "popularity": 10, "image": "img/shirt.jpg"},
        {"id": 2, "name": "Ceramic Mug", "price": 15, "category": "Home", "rating": 3.6, "popularity": 90, "image": "img/mug.jpg", "alt": "Speckled mug"},
        {"id": 3, "name": "Wool Socks", "price": 15, "category": "Apparel", "rating": 4.9, "popularity": 50, "image": "img/socks.jpg"},
        {"id": 4, "name": "Camp Stove", "price": 120, "category": "Outdoor", "rating": 4.1, "popularity": 90, "image": "img/stove.jpg"},
        {"id": 5, "name": "Throw Pillow", "price": 50, "category": "Home", "rating": 2.2, "popularity": 5, "image": "img/pillow.jpg"},
        {"id": 6, "name": "Rain Jacket", "price": 100, "category": "Apparel", "rating": 4.0, "popularity": 70, "image": "img/jacket.jpg"}
    ])
}

/// Temporary workspace holding a catalog file and a storage directory.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a workspace with [`sample_catalog`] written to `products.json`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or catalog file cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ctx = Self { dir };
        ctx.write_catalog(&sample_catalog().to_string());
        ctx
    }

    /// Replace the catalog file contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write_catalog(&self, contents: &str) {
        std::fs::write(self.catalog_path(), contents).expect("Failed to write catalog");
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("products.json")
    }

    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Configuration pointing at this workspace.
    #[must_use]
    pub fn config(&self) -> WidgetConfig {
        WidgetConfig {
            catalog: CatalogLocation::File(self.catalog_path()),
            storage_dir: self.storage_dir(),
            ..WidgetConfig::default()
        }
    }

    #[must_use]
    pub fn source(&self) -> FileCatalogSource {
        FileCatalogSource::new(self.catalog_path())
    }

    /// A fresh handle on the workspace's file store.
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.storage_dir())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve a canned catalog response on a loopback port.
///
/// Returns the URL to request. The server answers `GET /products.json` with
/// `status` and `body` until the test's runtime shuts down.
///
/// # Panics
///
/// Panics if the loopback listener cannot be bound.
#[allow(clippy::expect_used)]
pub async fn serve_catalog(status: StatusCode, body: impl Into<String>) -> Url {
    let body = body.into();
    let app = Router::new().route(
        "/products.json",
        get(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(axum::serve(listener, app).into_future());

    Url::parse(&format!("http://{addr}/products.json")).expect("Invalid stub URL")
}
