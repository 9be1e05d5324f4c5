//! Cart commands.
//!
//! Every change is persisted by the session before the cart is printed.

use shopfront_core::ProductId;
use shopfront_widget::Session;
use shopfront_widget::storage::FileStore;

use super::Output;

/// Print the cart, optionally with a promo code applied.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn show(
    session: &mut Session<FileStore>,
    output: &Output,
    promo: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(code) = promo {
        let discount = session.apply_promo(code);
        if discount.is_none() && !output.is_json() {
            output.line("Promo code not recognised.");
        }
    }
    output.cart(&session.cart_view())?;
    Ok(())
}

/// Add one unit of `id`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn add(
    session: &mut Session<FileStore>,
    output: &Output,
    id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(notice) = session.notice() {
        output.line(notice);
        return Ok(());
    }
    if !session.add_to_cart(id) {
        tracing::info!(product_id = %id, "No such product");
    }
    output.cart(&session.cart_view())?;
    Ok(())
}

/// Change the quantity of `id` by `delta`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn change(
    session: &mut Session<FileStore>,
    output: &Output,
    id: ProductId,
    delta: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    session.change_qty(id, delta);
    output.cart(&session.cart_view())?;
    Ok(())
}

/// Remove the line for `id`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn remove(
    session: &mut Session<FileStore>,
    output: &Output,
    id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    session.remove(id);
    output.cart(&session.cart_view())?;
    Ok(())
}
