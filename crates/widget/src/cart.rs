//! Cart lines, merge rules and the persisting cart store.
//!
//! [`Cart`] is a plain value holding the merge/remove rules: one line per
//! product, quantities always at least 1, lines in first-added order.
//! [`CartStore`] owns a cart together with a [`KeyValueStore`] and writes the
//! cart back after every change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::WidgetError;
use crate::pricing;
use crate::storage::{KeyValueStore, StorageError};

/// The persisted cart could not be decoded.
#[derive(Debug, Error)]
pub enum CorruptState {
    /// Stored value is not a JSON array of cart lines.
    #[error("Unreadable cart JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A stored line has quantity zero.
    #[error("Cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// Two stored lines share a product ID.
    #[error("Cart has more than one line for product {0}")]
    DuplicateLine(ProductId),

    /// A stored price is negative or too large to total.
    #[error("Cart line for product {0} has out-of-range price {1}")]
    PriceOutOfRange(ProductId, Decimal),
}

// =============================================================================
// CartLine
// =============================================================================

/// One product in the cart with its quantity.
///
/// The product fields are a copy taken when the line was created, so later
/// catalog changes do not alter what is in the cart. Serialized flat:
/// `{"id":1,"name":"...","price":"9.99",...,"qty":2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub qty: u32,
}

impl CartLine {
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered cart lines, first-added first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Decode a persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `CorruptState` if the JSON is malformed, a quantity is zero,
    /// a price is outside `0..=MAX_UNIT_PRICE`, or a product appears on more
    /// than one line.
    pub fn from_json(json: &str) -> Result<Self, CorruptState> {
        let lines: Vec<CartLine> = serde_json::from_str(json)?;
        Self::try_from(lines)
    }

    /// Encode the cart for persistence.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if a line cannot be encoded.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty)).sum()
    }

    /// Add one unit of `product`, merging into its existing line.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id() == product.id) {
            line.qty = line.qty.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                qty: 1,
            });
        }
    }

    /// Add one unit of the catalog product `id`. Unknown IDs are ignored.
    ///
    /// Returns whether the cart changed.
    pub fn add_item(&mut self, catalog: &Catalog, id: ProductId) -> bool {
        catalog.find(id).is_some_and(|product| {
            self.add(product);
            true
        })
    }

    /// Adjust the quantity of `id` by `delta`, dropping the line when it
    /// reaches zero or below. Absent IDs are ignored.
    ///
    /// Returns whether the cart changed.
    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.id() == id) else {
            return false;
        };

        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };
        let qty = i64::from(line.qty).saturating_add(delta);
        if qty <= 0 {
            self.lines.remove(index);
        } else {
            line.qty = u32::try_from(qty).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove the line for `id` if present.
    ///
    /// Returns whether the cart changed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Remove every line.
    ///
    /// Returns whether the cart changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CorruptState;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        for (i, line) in lines.iter().enumerate() {
            if line.qty == 0 {
                return Err(CorruptState::ZeroQuantity(line.id()));
            }
            if !pricing::is_valid_unit_price(line.product.price) {
                return Err(CorruptState::PriceOutOfRange(line.id(), line.product.price));
            }
            if lines.iter().take(i).any(|earlier| earlier.id() == line.id()) {
                return Err(CorruptState::DuplicateLine(line.id()));
            }
        }
        Ok(Self { lines })
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// A cart bound to the key-value store it is persisted in.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart persisted under `key`.
    ///
    /// An absent key gives an empty cart. An unreadable or corrupt value is
    /// logged and also gives an empty cart; the stored value is replaced on
    /// the next mutation.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match restore(&store, &key) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to restore cart, starting empty");
                Cart::new()
            }
        };
        debug!(key = %key, lines = cart.len(), "Cart opened");
        Self { cart, store, key }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Add one unit of catalog product `id`. Unknown IDs are ignored.
    pub fn add_item(&mut self, catalog: &Catalog, id: ProductId) -> bool {
        let changed = self.cart.add_item(catalog, id);
        self.after_mutation("add", id, changed)
    }

    /// Adjust the quantity of `id` by `delta`; see [`Cart::change_qty`].
    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> bool {
        let changed = self.cart.change_qty(id, delta);
        self.after_mutation("change_qty", id, changed)
    }

    /// Remove the line for `id` if present.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let changed = self.cart.remove(id);
        self.after_mutation("remove", id, changed)
    }

    /// Empty the cart and persist the empty state.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist_or_warn();
        debug!("Cart cleared");
    }

    /// Write the cart to the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or writing fails.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let json = self.cart.to_json()?;
        self.store.set(&self.key, &json)
    }

    fn after_mutation(&mut self, op: &str, id: ProductId, changed: bool) -> bool {
        if changed {
            debug!(op, product_id = %id, lines = self.cart.len(), "Cart updated");
            self.persist_or_warn();
        }
        changed
    }

    fn persist_or_warn(&mut self) {
        if let Err(e) = self.persist() {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

/// Read the cart persisted under `key`.
///
/// # Errors
///
/// Returns `WidgetError::Storage` if the store cannot be read and
/// `WidgetError::CorruptState` if the stored value is not a valid cart.
pub fn restore<S: KeyValueStore>(store: &S, key: &str) -> Result<Cart, WidgetError> {
    match store.get(key)? {
        Some(json) => Ok(Cart::from_json(&json)?),
        None => Ok(Cart::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            category: "Misc".to_string(),
            rating: 3.0,
            popularity: 1.0,
            image: format!("{id}.jpg"),
            alt: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_products(vec![product(1, 10), product(2, 5), product(3, 7)]).unwrap()
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let catalog = catalog();
        let mut cart = Cart::new();

        assert!(cart.add_item(&catalog, ProductId::new(1)));
        assert!(cart.add_item(&catalog, ProductId::new(1)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().qty, 2);
    }

    #[test]
    fn test_add_unknown_product_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(&catalog(), ProductId::new(42)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let catalog = catalog();
        let mut cart = Cart::new();
        for id in [3, 1, 3, 2] {
            cart.add_item(&catalog, ProductId::new(id));
        }

        let order: Vec<i32> = cart.lines().iter().map(|l| l.id().as_i32()).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_line_snapshots_product() {
        let mut cart = Cart::new();
        let mut p = product(1, 10);
        cart.add(&p);
        p.price = Decimal::new(99, 0);

        assert_eq!(cart.get(p.id).unwrap().product.price, Decimal::new(10, 0));
    }

    #[test]
    fn test_change_qty() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(2));

        assert!(cart.change_qty(ProductId::new(2), 3));
        assert_eq!(cart.get(ProductId::new(2)).unwrap().qty, 4);

        assert!(cart.change_qty(ProductId::new(2), -1));
        assert_eq!(cart.get(ProductId::new(2)).unwrap().qty, 3);
    }

    #[test]
    fn test_change_qty_to_zero_removes_line() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(1));
        cart.add_item(&catalog, ProductId::new(1));

        assert!(cart.change_qty(ProductId::new(1), -2));
        assert!(!cart.contains(ProductId::new(1)));
    }

    #[test]
    fn test_change_qty_below_zero_removes_line() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(1));

        assert!(cart.change_qty(ProductId::new(1), -5));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_qty_absent_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.change_qty(ProductId::new(1), 1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(1));
        cart.add_item(&catalog, ProductId::new(2));

        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_json_is_flat() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10));

        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["qty"], 1);
        assert_eq!(value[0]["name"], "Product 1");
    }

    #[test]
    fn test_from_json_roundtrip() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(2));
        cart.add_item(&catalog, ProductId::new(2));
        cart.add_item(&catalog, ProductId::new(3));

        let restored = Cart::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_json_accepts_numeric_price() {
        let json = r#"[{"id":1,"name":"Mug","price":8.5,"category":"Home",
            "rating":4,"popularity":3,"image":"mug.png","qty":2}]"#;
        let cart = Cart::from_json(json).unwrap();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().product.price, Decimal::new(85, 1));
    }

    #[test]
    fn test_from_json_rejects_corrupt_values() {
        assert!(matches!(
            Cart::from_json("{not json"),
            Err(CorruptState::Parse(_))
        ));
        assert!(matches!(
            Cart::from_json(r#"{"id":1}"#),
            Err(CorruptState::Parse(_))
        ));

        let zero = r#"[{"id":1,"name":"A","price":1,"category":"x","rating":1,"popularity":1,"image":"a","qty":0}]"#;
        assert!(matches!(
            Cart::from_json(zero),
            Err(CorruptState::ZeroQuantity(_))
        ));

        let negative = r#"[{"id":1,"name":"A","price":1,"category":"x","rating":1,"popularity":1,"image":"a","qty":-3}]"#;
        assert!(matches!(
            Cart::from_json(negative),
            Err(CorruptState::Parse(_))
        ));

        let dup = r#"[
            {"id":1,"name":"A","price":1,"category":"x","rating":1,"popularity":1,"image":"a","qty":1},
            {"id":1,"name":"A","price":1,"category":"x","rating":1,"popularity":1,"image":"a","qty":2}
        ]"#;
        assert!(matches!(
            Cart::from_json(dup),
            Err(CorruptState::DuplicateLine(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_untotallable_price() {
        let huge = r#"[{"id":1,"name":"A","price":"79228162514264337593543950335","category":"x","rating":1,"popularity":1,"image":"a","qty":2}]"#;
        assert!(matches!(
            Cart::from_json(huge),
            Err(CorruptState::PriceOutOfRange(id, _)) if id == ProductId::new(1)
        ));

        let negative = r#"[{"id":1,"name":"A","price":-1,"category":"x","rating":1,"popularity":1,"image":"a","qty":1}]"#;
        assert!(matches!(
            Cart::from_json(negative),
            Err(CorruptState::PriceOutOfRange(..))
        ));
    }

    #[test]
    fn test_store_open_untotallable_price_starts_empty() {
        let mut backing = MemoryStore::new();
        backing
            .set(
                "cart",
                r#"[{"id":1,"name":"A","price":"79228162514264337593543950335","category":"x","rating":1,"popularity":1,"image":"a","qty":2}]"#,
            )
            .unwrap();

        let store = CartStore::open(backing, "cart");
        assert!(store.cart().is_empty());
        assert_eq!(
            pricing::compute_totals(store.cart(), pricing::Discount::NONE),
            pricing::Totals::ZERO
        );
    }

    #[test]
    fn test_store_persists_after_each_mutation() {
        let catalog = catalog();
        let mut store = CartStore::open(MemoryStore::new(), "cart");

        store.add_item(&catalog, ProductId::new(1));
        let saved = restore(store.store(), "cart").unwrap();
        assert_eq!(saved.get(ProductId::new(1)).unwrap().qty, 1);

        store.change_qty(ProductId::new(1), 2);
        let saved = restore(store.store(), "cart").unwrap();
        assert_eq!(saved.get(ProductId::new(1)).unwrap().qty, 3);

        store.remove_item(ProductId::new(1));
        assert!(restore(store.store(), "cart").unwrap().is_empty());
    }

    #[test]
    fn test_store_open_restores_existing_cart() {
        let catalog = catalog();
        let mut first = CartStore::open(MemoryStore::new(), "cart");
        first.add_item(&catalog, ProductId::new(3));

        let second = CartStore::open(first.store().clone(), "cart");
        assert_eq!(second.cart(), first.cart());
    }

    #[test]
    fn test_store_open_corrupt_value_starts_empty() {
        let mut backing = MemoryStore::new();
        backing.set("cart", "[{\"id\":").unwrap();

        let store = CartStore::open(backing, "cart");
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_store_noop_does_not_write() {
        let mut store = CartStore::open(MemoryStore::new(), "cart");
        assert!(!store.remove_item(ProductId::new(1)));
        assert_eq!(store.store().get("cart").unwrap(), None);
    }

    #[test]
    fn test_store_write_failure_keeps_mutation() {
        let mut store = CartStore::open(ReadOnlyStore, "cart");
        assert!(store.add_item(&catalog(), ProductId::new(2)));
        assert!(store.cart().contains(ProductId::new(2)));
        assert!(store.persist().is_err());
    }

    #[test]
    fn test_store_clear_persists_empty_cart() {
        let mut store = CartStore::open(MemoryStore::new(), "cart");
        store.add_item(&catalog(), ProductId::new(1));
        store.clear();

        assert!(store.cart().is_empty());
        assert_eq!(store.store().get("cart").unwrap().as_deref(), Some("[]"));
    }
}
