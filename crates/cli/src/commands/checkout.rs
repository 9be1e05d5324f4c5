//! Checkout command.

use std::io::{BufRead, Write};

use shopfront_widget::{CheckoutOutcome, Session};
use shopfront_widget::storage::FileStore;

use super::Output;

/// Confirm and place the mock order.
///
/// Prompts on stdin unless `yes` is set.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or output fails.
pub fn run(
    session: &mut Session<FileStore>,
    output: &Output,
    yes: bool,
    promo: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(code) = promo {
        session.apply_promo(code);
    }

    let confirmed = if yes || session.cart().is_empty() {
        yes
    } else {
        output.cart(&session.cart_view())?;
        confirm("Proceed to checkout?")?
    };

    let outcome = session.checkout(confirmed);
    match &outcome {
        CheckoutOutcome::Completed(receipt) if output.is_json() => output.json(receipt)?,
        CheckoutOutcome::Completed(receipt) => {
            output.line(outcome.message());
            output.line(&format!("Order {}", receipt.order_id));
        }
        _ => output.line(outcome.message()),
    }
    Ok(())
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
fn confirm(question: &str) -> std::io::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
