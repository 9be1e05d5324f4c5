//! Subtotal and discounted total.
//!
//! All arithmetic stays in full `Decimal` precision; rounding to cents only
//! happens when a [`Price`](shopfront_core::Price) is formatted.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::cart::{Cart, CartLine};

/// Highest unit price a product may carry.
///
/// A cart of at most `i32::MAX` lines of at most `u32::MAX` units each at
/// this price still totals below `Decimal::MAX`.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Whether `price` lies in `0..=MAX_UNIT_PRICE`.
#[must_use]
pub fn is_valid_unit_price(price: Decimal) -> bool {
    price >= Decimal::ZERO && price <= MAX_UNIT_PRICE
}

/// Discount rate outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    #[error("discount rate {0} must be at least 0 and below 1")]
    OutOfRange(Decimal),
}

/// A whole-cart discount rate in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Create a discount from a rate.
    ///
    /// # Errors
    ///
    /// Returns `DiscountError::OutOfRange` unless `0 <= rate < 1`.
    pub fn new(rate: Decimal) -> Result<Self, DiscountError> {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(DiscountError::OutOfRange(rate));
        }
        Ok(Self(rate))
    }

    /// Create a discount from a whole percentage, e.g. `10` for 10%.
    ///
    /// # Errors
    ///
    /// Returns `DiscountError::OutOfRange` unless `0 <= percent < 100`.
    pub fn from_percent(percent: u32) -> Result<Self, DiscountError> {
        Self::new(Decimal::new(i64::from(percent), 2))
    }

    #[must_use]
    pub const fn rate(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self.0.is_zero()
    }
}

/// Cart value before and after the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Amount taken off by the discount.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.subtotal - self.total
    }
}

/// `price × qty` for one line.
///
/// Saturates at `Decimal::MAX` (or `MIN`) instead of overflowing; only lines
/// built from unvalidated products can get there.
#[must_use]
pub fn line_total(line: &CartLine) -> Decimal {
    let price = line.product.price;
    price.checked_mul(Decimal::from(line.qty)).unwrap_or_else(|| {
        warn!(product_id = %line.id(), %price, qty = line.qty, "Line total overflowed");
        saturated(price)
    })
}

/// Compute subtotal and discounted total for `cart`.
///
/// `subtotal = Σ price × qty`, `total = subtotal × (1 − discount)`.
/// Amounts saturate rather than overflow.
#[must_use]
pub fn compute_totals(cart: &Cart, discount: Discount) -> Totals {
    let subtotal = cart.lines().iter().map(line_total).fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).unwrap_or_else(|| {
            warn!(%acc, %amount, "Subtotal overflowed");
            saturated(amount)
        })
    });

    // The factor is in (0, 1], so the product never grows past `subtotal`.
    let total = subtotal
        .checked_mul(Decimal::ONE - discount.rate())
        .unwrap_or(subtotal);

    Totals { subtotal, total }
}

fn saturated(toward: Decimal) -> Decimal {
    if toward.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}
