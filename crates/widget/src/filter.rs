//! Catalog filtering and sorting.
//!
//! [`apply`] composes a category predicate with a price-band predicate,
//! keeps catalog order for the survivors, then applies a stable sort.
//! Everything here is a pure function of its inputs.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use shopfront_core::Product;
use thiserror::Error;

use crate::catalog::Catalog;

/// Errors parsing filter control values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid price band: {0}")]
    InvalidPriceBand(String),

    #[error("Unknown sort key: {0}")]
    InvalidSortKey(String),
}

// =============================================================================
// Price Band
// =============================================================================

/// Price predicate selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBand {
    /// No price restriction.
    #[default]
    Any,
    /// Inclusive range, written `"min-max"`.
    Between { min: Decimal, max: Decimal },
    /// Open upper bound, written `"min+"`.
    AtLeast { min: Decimal },
}

impl PriceBand {
    /// Parse a price band control value.
    ///
    /// `""` is [`PriceBand::Any`], `"25-50"` is an inclusive range and
    /// `"100+"` an open lower bound.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidPriceBand` for any other shape and for
    /// bounds that are not numbers. An inverted range such as `"50-10"` is
    /// accepted and matches nothing.
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        let value = value.trim();
        let invalid = || FilterError::InvalidPriceBand(value.to_string());

        if value.is_empty() {
            return Ok(Self::Any);
        }

        if let Some((min, max)) = value.split_once('-') {
            let min = parse_bound(min).ok_or_else(invalid)?;
            let max = parse_bound(max).ok_or_else(invalid)?;
            return Ok(Self::Between { min, max });
        }

        if let Some(min) = value.strip_suffix('+') {
            let min = parse_bound(min).ok_or_else(invalid)?;
            return Ok(Self::AtLeast { min });
        }

        Err(invalid())
    }

    /// Whether `price` satisfies this band.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        match *self {
            Self::Any => true,
            Self::Between { min, max } => min <= price && price <= max,
            Self::AtLeast { min } => price >= min,
        }
    }
}

fn parse_bound(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}

impl FromStr for PriceBand {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => Ok(()),
            Self::Between { min, max } => write!(f, "{min}-{max}"),
            Self::AtLeast { min } => write!(f, "{min}+"),
        }
    }
}

// =============================================================================
// Sort Key
// =============================================================================

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Keep catalog order.
    #[default]
    Catalog,
    PriceAsc,
    PriceDesc,
    PopularityDesc,
}

impl SortKey {
    /// Control value for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::PopularityDesc => "popularity-desc",
        }
    }

    /// Parse a sort control value.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidSortKey` for unknown values.
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        match value.trim() {
            "" => Ok(Self::Catalog),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "popularity-desc" => Ok(Self::PopularityDesc),
            other => Err(FilterError::InvalidSortKey(other.to_string())),
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Catalog => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::PopularityDesc => b.popularity.total_cmp(&a.popularity),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// Current filter controls. Owned by the presentation layer, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// `None` matches every category.
    pub category: Option<String>,
    pub price_band: PriceBand,
    pub sort: SortKey,
}

impl FilterState {
    /// Build a filter state from raw control values.
    ///
    /// An empty category means "any category".
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the price band or sort key cannot be parsed.
    pub fn from_controls(category: &str, price_band: &str, sort: &str) -> Result<Self, FilterError> {
        Ok(Self {
            category: Some(category.to_string()).filter(|c| !c.is_empty()),
            price_band: PriceBand::parse(price_band)?,
            sort: SortKey::parse(sort)?,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = Some(category).filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub const fn with_price_band(mut self, price_band: PriceBand) -> Self {
        self.price_band = price_band;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `product` passes both the category and price predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);
        category_match && self.price_band.contains(product.price)
    }
}

/// Filter and sort the catalog.
///
/// Survivors keep catalog order unless a sort key is set; sorting is stable,
/// so ties also keep catalog order.
#[must_use]
pub fn apply<'a>(catalog: &'a Catalog, state: &FilterState) -> Vec<&'a Product> {
    let mut products: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| state.matches(p))
        .collect();

    if state.sort != SortKey::Catalog {
        products.sort_by(|a, b| state.sort.compare(a, b));
    }

    products
}

/// Distinct product categories in first-seen catalog order.
#[must_use]
pub fn distinct_categories(catalog: &Catalog) -> Vec<String> {
    let mut seen = HashSet::new();
    catalog
        .products()
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    fn product(id: i32, category: &str, price: i64, popularity: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            category: category.to_string(),
            rating: 4.0,
            popularity,
            image: format!("img/{id}.jpg"),
            alt: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_products(vec![
            product(1, "Apparel", 40, 10.0),
            product(2, "Home", 15, 90.0),
            product(3, "Apparel", 15, 50.0),
            product(4, "Outdoor", 120, 90.0),
            product(5, "Home", 50, 5.0),
            product(6, "Apparel", 100, 70.0),
        ])
        .unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_price_band_parse() {
        assert_eq!(PriceBand::parse("").unwrap(), PriceBand::Any);
        assert_eq!(
            PriceBand::parse("10-50").unwrap(),
            PriceBand::Between {
                min: Decimal::new(10, 0),
                max: Decimal::new(50, 0)
            }
        );
        assert_eq!(
            PriceBand::parse("100+").unwrap(),
            PriceBand::AtLeast {
                min: Decimal::new(100, 0)
            }
        );
        assert_eq!(
            PriceBand::parse(" 9.99 - 19.99 ").unwrap(),
            PriceBand::Between {
                min: Decimal::new(999, 2),
                max: Decimal::new(1999, 2)
            }
        );
    }

    #[test]
    fn test_price_band_parse_invalid() {
        for value in ["cheap", "10-", "-50", "abc+", "100"] {
            assert!(
                matches!(PriceBand::parse(value), Err(FilterError::InvalidPriceBand(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_inverted_price_band_matches_nothing() {
        let band = PriceBand::parse("50-10").unwrap();
        assert_eq!(
            band,
            PriceBand::Between {
                min: Decimal::new(50, 0),
                max: Decimal::new(10, 0)
            }
        );

        let state = FilterState::default().with_price_band(band);
        assert!(apply(&catalog(), &state).is_empty());
    }

    #[test]
    fn test_price_band_display_matches_control_value() {
        assert_eq!(PriceBand::parse("10-50").unwrap().to_string(), "10-50");
        assert_eq!(PriceBand::parse("100+").unwrap().to_string(), "100+");
        assert_eq!(PriceBand::Any.to_string(), "");
    }

    #[test]
    fn test_price_band_bounds_are_inclusive() {
        let band = PriceBand::parse("15-40").unwrap();
        assert!(band.contains(Decimal::new(15, 0)));
        assert!(band.contains(Decimal::new(40, 0)));
        assert!(!band.contains(Decimal::new(4001, 2)));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("").unwrap(), SortKey::Catalog);
        assert_eq!(SortKey::parse("price-asc").unwrap(), SortKey::PriceAsc);
        assert_eq!(SortKey::parse("price-desc").unwrap(), SortKey::PriceDesc);
        assert_eq!(
            SortKey::parse("popularity-desc").unwrap(),
            SortKey::PopularityDesc
        );
        assert!(SortKey::parse("newest").is_err());
    }

    #[test]
    fn test_no_filters_keeps_catalog_order() {
        let catalog = catalog();
        let result = apply(&catalog, &FilterState::default());
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_category_filter() {
        let catalog = catalog();
        let state = FilterState::default().with_category("Apparel");
        assert_eq!(ids(&apply(&catalog, &state)), vec![1, 3, 6]);
    }

    #[test]
    fn test_empty_category_matches_all() {
        let catalog = catalog();
        let state = FilterState::default().with_category("");
        assert_eq!(apply(&catalog, &state).len(), catalog.len());
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let catalog = catalog();
        let state = FilterState::default().with_category("Toys");
        assert!(apply(&catalog, &state).is_empty());
    }

    #[test]
    fn test_results_never_violate_price_band() {
        let catalog = catalog();
        for value in ["", "0-15", "15-50", "40-100", "50+", "120+", "121+"] {
            let band = PriceBand::parse(value).unwrap();
            let state = FilterState::default().with_price_band(band);
            for p in apply(&catalog, &state) {
                assert!(band.contains(p.price), "{} escaped band {value}", p.id);
            }
        }
    }

    #[test]
    fn test_open_band() {
        let catalog = catalog();
        let state = FilterState::default().with_price_band(PriceBand::parse("100+").unwrap());
        assert_eq!(ids(&apply(&catalog, &state)), vec![4, 6]);
    }

    #[test]
    fn test_category_and_band_compose() {
        let catalog = catalog();
        let state = FilterState::from_controls("Apparel", "10-50", "").unwrap();
        assert_eq!(ids(&apply(&catalog, &state)), vec![1, 3]);
    }

    #[test]
    fn test_price_asc_is_non_decreasing_and_stable() {
        let catalog = catalog();
        let state = FilterState::default().with_sort(SortKey::PriceAsc);
        let result = apply(&catalog, &state);

        assert!(result.windows(2).all(|w| w[0].price <= w[1].price));
        // 2 and 3 tie at 15 and keep catalog order
        assert_eq!(ids(&result), vec![2, 3, 1, 5, 6, 4]);
    }

    #[test]
    fn test_price_desc() {
        let catalog = catalog();
        let state = FilterState::default().with_sort(SortKey::PriceDesc);
        assert_eq!(ids(&apply(&catalog, &state)), vec![4, 6, 5, 1, 2, 3]);
    }

    #[test]
    fn test_popularity_desc_is_stable() {
        let catalog = catalog();
        let state = FilterState::default().with_sort(SortKey::PopularityDesc);
        // 2 and 4 tie at 90
        assert_eq!(ids(&apply(&catalog, &state)), vec![2, 4, 6, 3, 1, 5]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = catalog();
        let state = FilterState::from_controls("Home", "10-60", "price-desc").unwrap();
        assert_eq!(apply(&catalog, &state), apply(&catalog, &state));
    }

    #[test]
    fn test_distinct_categories_first_seen_order() {
        assert_eq!(
            distinct_categories(&catalog()),
            vec!["Apparel", "Home", "Outdoor"]
        );
        assert!(distinct_categories(&Catalog::empty()).is_empty());
    }

    #[test]
    fn test_from_controls_rejects_bad_sort() {
        assert!(matches!(
            FilterState::from_controls("", "", "rating"),
            Err(FilterError::InvalidSortKey(_))
        ));
    }
}
