//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A purchasable product as published in the catalog document.
///
/// Products are loaded once per session and never mutated. Cart lines keep
/// their own copy taken at the moment the product was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the store currency. Never negative.
    pub price: Decimal,
    pub category: String,
    /// Average review score between 0 and 5.
    pub rating: f64,
    pub popularity: f64,
    /// Image URL or path.
    pub image: String,
    /// Alternative text for the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Product {
    /// Image alternative text, falling back to the product name.
    #[must_use]
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or(&self.name)
    }
}
