//! CLI command implementations and text rendering.

pub mod cart;
pub mod catalog;
pub mod checkout;

use serde::Serialize;
use shopfront_widget::catalog::LocationSource;
use shopfront_widget::storage::FileStore;
use shopfront_widget::views::CartView;
use shopfront_widget::{Session, WidgetConfig};

/// Load configuration, restore the cart and fetch the catalog.
///
/// # Errors
///
/// Returns an error if the configuration is invalid. A catalog that fails to
/// load is not an error here; the session carries a notice instead.
pub async fn open_session() -> Result<Session<FileStore>, Box<dyn std::error::Error>> {
    let config = WidgetConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let source = LocationSource::from(&config.catalog);
    let store = FileStore::new(&config.storage_dir);
    Ok(Session::start(&config, &source, store).await)
}

/// Where render data goes: human-readable text or JSON.
pub struct Output {
    json: bool,
}

#[allow(clippy::print_stdout)]
impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn line(&self, text: &str) {
        println!("{text}");
    }

    /// Print the cart panel.
    pub fn cart(&self, cart: &CartView) -> Result<(), serde_json::Error> {
        if self.json {
            return self.json(cart);
        }

        if cart.items.is_empty() {
            self.line("Your cart is empty.");
        }
        for item in &cart.items {
            self.line(&format!(
                "[{:>3}] {:<32} {:>3} × {:>10} = {:>10}",
                item.id.as_i32(), item.name, item.quantity, item.price, item.line_price
            ));
        }
        self.line(&format!("Items:    {}", cart.item_count));
        self.line(&format!("Subtotal: {}", cart.subtotal));
        self.line(&format!("Total:    {}", cart.total));
        Ok(())
    }
}
