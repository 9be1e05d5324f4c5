//! Catalog browsing commands.

use shopfront_widget::{FilterState, Session, WidgetError};
use shopfront_widget::storage::FileStore;
use tracing::instrument;

use super::Output;

/// List products matching the filter controls.
///
/// # Errors
///
/// Returns an error if a filter value cannot be parsed or output fails.
#[instrument(skip(session, output))]
pub fn products(
    session: &Session<FileStore>,
    output: &Output,
    category: &str,
    price: &str,
    sort: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(notice) = session.notice() {
        output.line(notice);
        return Ok(());
    }

    let state = FilterState::from_controls(category, price, sort).map_err(WidgetError::from)?;
    let list = session.products(&state);

    if output.is_json() {
        output.json(&list)?;
        return Ok(());
    }

    if let Some(message) = list.empty_message {
        output.line(message);
    }
    for product in &list.products {
        let stars = format!(
            "{}{}",
            "★".repeat(usize::from(product.stars.filled)),
            "☆".repeat(usize::from(product.stars.empty))
        );
        output.line(&format!(
            "[{:>3}] {:<32} {:>10}  {}  {}",
            product.id.as_i32(), product.name, product.price, stars, product.category
        ));
    }
    Ok(())
}

/// List category choices in catalog order.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn categories(
    session: &Session<FileStore>,
    output: &Output,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(notice) = session.notice() {
        output.line(notice);
        return Ok(());
    }

    let categories = session.categories();
    if output.is_json() {
        output.json(&categories)?;
    } else {
        for category in &categories {
            output.line(category);
        }
    }
    Ok(())
}
