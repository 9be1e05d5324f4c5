//! Promo code evaluation.

use tracing::debug;

use crate::pricing::Discount;

/// The one promo code the store honours.
pub const WELCOME_CODE: &str = "WELCOME10";

/// Percentage taken off by [`WELCOME_CODE`].
pub const WELCOME_PERCENT: u32 = 10;

/// Map a submitted promo code to a discount.
///
/// Matching ignores case and surrounding whitespace. Anything other than
/// [`WELCOME_CODE`], including an empty submission, yields no discount.
#[must_use]
pub fn evaluate(code: &str) -> Discount {
    let normalized = code.trim();
    if normalized.eq_ignore_ascii_case(WELCOME_CODE) {
        debug!(code = WELCOME_CODE, "Promo code accepted");
        Discount::from_percent(WELCOME_PERCENT).unwrap_or_default()
    } else {
        Discount::NONE
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_welcome_code_is_ten_percent() {
        assert_eq!(evaluate("WELCOME10").rate(), Decimal::new(1, 1));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(evaluate(" welcome10 ").rate(), Decimal::new(1, 1));
        assert_eq!(evaluate("\tWelcome10\n").rate(), Decimal::new(1, 1));
    }

    #[test]
    fn test_other_codes_give_nothing() {
        assert!(evaluate("WELCOME20").is_none());
        assert!(evaluate("").is_none());
        assert!(evaluate("   ").is_none());
        assert!(evaluate("WELCOME 10").is_none());
    }
}
