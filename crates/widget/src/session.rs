//! Session context.
//!
//! A [`Session`] owns everything one shopper's visit needs: the catalog
//! (fetched once), the persisted cart, and the current promo discount. The
//! presentation layer holds exactly one and calls into it for every event.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CurrencyCode, ProductId};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::cart::{Cart, CartStore};
use crate::catalog::{Catalog, CatalogSource, FetchError};
use crate::config::WidgetConfig;
use crate::error::CATALOG_UNAVAILABLE_MESSAGE;
use crate::filter::{self, FilterState};
use crate::pricing::{self, Discount, Totals};
use crate::promo;
use crate::storage::KeyValueStore;
use crate::views::{CartView, ProductListView};

/// Confirmation of a mocked order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to buy; the cart is untouched.
    EmptyCart,
    /// The shopper declined the confirmation; the cart is untouched.
    Cancelled,
    /// Order placed and cart cleared.
    Completed(CheckoutReceipt),
}

impl CheckoutOutcome {
    /// Message for the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty.",
            Self::Cancelled => "Checkout cancelled.",
            Self::Completed(_) => "Thank you for your purchase!",
        }
    }
}

/// One shopper's session.
#[derive(Debug)]
pub struct Session<S> {
    catalog: Catalog,
    cart: CartStore<S>,
    discount: Discount,
    currency: CurrencyCode,
    load_error: Option<FetchError>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session: restore the cart from `store`, then fetch the
    /// catalog from `source`.
    ///
    /// A failed fetch leaves the session with an empty catalog; the error is
    /// kept for [`Session::load_error`] and [`Session::notice`].
    pub async fn start<C>(config: &WidgetConfig, source: &C, store: S) -> Self
    where
        C: CatalogSource + Sync,
    {
        let cart = CartStore::open(store, config.cart_key.clone());

        let (catalog, load_error) = match Catalog::load(source).await {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                (catalog, None)
            }
            Err(e) => {
                error!(error = %e, "Failed to load catalog");
                (Catalog::empty(), Some(e))
            }
        };

        Self {
            catalog,
            cart,
            discount: Discount::NONE,
            currency: config.currency,
            load_error,
        }
    }

    /// Build a session from parts that are already loaded.
    #[must_use]
    pub const fn new(catalog: Catalog, cart: CartStore<S>, currency: CurrencyCode) -> Self {
        Self {
            catalog,
            cart,
            discount: Discount::NONE,
            currency,
            load_error: None,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    #[must_use]
    pub const fn cart_store(&self) -> &CartStore<S> {
        &self.cart
    }

    #[must_use]
    pub const fn discount(&self) -> Discount {
        self.discount
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// The catalog load failure, if any.
    #[must_use]
    pub const fn load_error(&self) -> Option<&FetchError> {
        self.load_error.as_ref()
    }

    /// Message to show in place of the product grid, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        if self.load_error.is_some() {
            Some(CATALOG_UNAVAILABLE_MESSAGE)
        } else {
            None
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Filtered and sorted product grid.
    #[must_use]
    #[instrument(skip(self))]
    pub fn products(&self, state: &FilterState) -> ProductListView {
        ProductListView::new(filter::apply(&self.catalog, state), self.currency)
    }

    /// Category choices for the filter control.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        filter::distinct_categories(&self.catalog)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `id`. Unknown IDs are ignored.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, id: ProductId) -> bool {
        self.cart.add_item(&self.catalog, id)
    }

    /// Adjust the quantity of `id` by `delta`.
    #[instrument(skip(self))]
    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> bool {
        self.cart.change_qty(id, delta)
    }

    /// Add one unit to the line for `id`.
    pub fn increase(&mut self, id: ProductId) -> bool {
        self.change_qty(id, 1)
    }

    /// Take one unit off the line for `id`, removing it at zero.
    pub fn decrease(&mut self, id: ProductId) -> bool {
        self.change_qty(id, -1)
    }

    /// Drop the line for `id` whatever its quantity.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.cart.remove_item(id)
    }

    /// Evaluate a promo code, replacing the current discount.
    ///
    /// A non-matching code resets the discount to zero.
    #[instrument(skip(self, code))]
    pub fn apply_promo(&mut self, code: &str) -> Discount {
        self.discount = promo::evaluate(code);
        self.discount
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        pricing::compute_totals(self.cart.cart(), self.discount)
    }

    /// Cart panel render data.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::new(self.cart.cart(), self.totals(), self.currency)
    }

    /// Place the (mock) order.
    ///
    /// An empty cart short-circuits before confirmation is considered.
    /// When `confirmed`, the cart is cleared and persisted empty.
    #[instrument(skip(self))]
    pub fn checkout(&mut self, confirmed: bool) -> CheckoutOutcome {
        if self.cart.cart().is_empty() {
            return CheckoutOutcome::EmptyCart;
        }
        if !confirmed {
            return CheckoutOutcome::Cancelled;
        }

        let totals = self.totals();
        let receipt = CheckoutReceipt {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            item_count: self.cart.cart().item_count(),
            subtotal: totals.subtotal,
            total: totals.total,
        };
        self.cart.clear();

        info!(
            order_id = %receipt.order_id,
            items = receipt.item_count,
            total = %receipt.total,
            "Checkout completed"
        );
        CheckoutOutcome::Completed(receipt)
    }
}
