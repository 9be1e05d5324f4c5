//! Render data for the presentation layer.
//!
//! These are the only shapes a renderer needs: formatted prices, star counts
//! and empty-state messages are decided here so every presentation layer
//! shows the same thing.

use serde::Serialize;
use shopfront_core::{CurrencyCode, Price, Product, ProductId};

use crate::cart::{Cart, CartLine};
use crate::pricing::{self, Totals};

/// Shown when filtering leaves no products.
pub const NO_PRODUCTS_MESSAGE: &str = "No products found.";

/// Highest star rating.
pub const MAX_STARS: u8 = 5;

/// Rating rendered as whole stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub filled: u8,
    pub empty: u8,
}

impl StarRating {
    /// Round `rating` to the nearest whole star, clamped to `0..=5`.
    #[must_use]
    pub fn from_rating(rating: f64) -> Self {
        let rounded = rating.round().clamp(0.0, f64::from(MAX_STARS));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
        let filled = rounded as u8;
        Self {
            filled,
            empty: MAX_STARS - filled,
        }
    }
}

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub category: String,
    pub image: String,
    pub alt: String,
    pub stars: StarRating,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: Price::new(product.price, currency).display(),
            category: product.category.clone(),
            image: product.image.clone(),
            alt: product.alt_text().to_string(),
            stars: StarRating::from_rating(product.rating),
        }
    }
}

/// Product grid display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    /// Set when `products` is empty.
    pub empty_message: Option<&'static str>,
}

impl ProductListView {
    #[must_use]
    pub fn new<'a>(products: impl IntoIterator<Item = &'a Product>, currency: CurrencyCode) -> Self {
        let products: Vec<ProductView> = products
            .into_iter()
            .map(|p| ProductView::new(p, currency))
            .collect();
        let empty_message = products.is_empty().then_some(NO_PRODUCTS_MESSAGE);
        Self {
            products,
            empty_message,
        }
    }
}

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    #[must_use]
    pub fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        let line_total = pricing::line_total(line);
        Self {
            id: line.id(),
            name: line.product.name.clone(),
            quantity: line.qty,
            price: Price::new(line.product.price, currency).display(),
            line_price: Price::new(line_total, currency).display(),
        }
    }
}

/// Cart panel display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::new(&Cart::new(), Totals::ZERO, currency)
    }

    #[must_use]
    pub fn new(cart: &Cart, totals: Totals, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            subtotal: Price::new(totals.subtotal, currency).display(),
            total: Price::new(totals.total, currency).display(),
            item_count: cart.item_count(),
        }
    }
}
