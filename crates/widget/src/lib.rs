//! Shopfront widget engine.
//!
//! The data layer behind a storefront widget: a catalog loaded once per
//! session, a filter/sort engine over it, a cart persisted to a local
//! key-value store, and the pricing and promo arithmetic derived from the
//! cart. Presentation is left to the caller, which consumes the plain render
//! data in [`views`].
//!
//! # Modules
//!
//! - [`catalog`] - Catalog sources and the immutable catalog store
//! - [`filter`] - Category/price-band filtering and stable sorting
//! - [`cart`] - Cart lines, merge rules and the persisting cart store
//! - [`pricing`] - Subtotal and discounted total
//! - [`promo`] - Promo code evaluation
//! - [`storage`] - Key-value store backends
//! - [`session`] - Session context tying everything together
//! - [`views`] - Render data for the presentation layer
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_widget::{FilterState, Session, WidgetConfig};
//! use shopfront_widget::catalog::FileCatalogSource;
//! use shopfront_widget::storage::FileStore;
//!
//! let config = WidgetConfig::from_env()?;
//! let source = FileCatalogSource::new("products.json");
//! let store = FileStore::new(&config.storage_dir);
//! let mut session = Session::start(&config, &source, store).await;
//!
//! session.add_to_cart(ProductId::new(1));
//! let cart = session.cart_view();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod pricing;
pub mod promo;
pub mod session;
pub mod storage;
pub mod views;

pub use cart::{Cart, CartLine, CartStore};
pub use catalog::{Catalog, CatalogSource};
pub use config::WidgetConfig;
pub use error::{Result, WidgetError};
pub use filter::{FilterState, PriceBand, SortKey};
pub use pricing::{Discount, Totals};
pub use session::{CheckoutOutcome, CheckoutReceipt, Session};
