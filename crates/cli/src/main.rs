//! Shopfront CLI - a terminal presentation layer for the widget engine.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront products --category Apparel --price 10-50 --sort price-asc
//! shopfront categories
//!
//! # Work with the cart (persisted under SHOPFRONT_STORAGE_DIR)
//! shopfront cart add 3
//! shopfront cart dec 3
//! shopfront cart show --promo WELCOME10
//!
//! # Place the mock order
//! shopfront checkout --yes
//! ```
//!
//! # Commands
//!
//! - `products` - List filtered and sorted products
//! - `categories` - List category choices
//! - `cart` - Show or change the cart
//! - `checkout` - Confirm the order and clear the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_core::ProductId;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront terminal storefront")]
struct Cli {
    /// Print render data as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show this category
        #[arg(short, long, default_value = "")]
        category: String,

        /// Price band, e.g. `10-50` or `100+`
        #[arg(short, long, default_value = "")]
        price: String,

        /// Sort key (`price-asc`, `price-desc`, `popularity-desc`)
        #[arg(short, long, default_value = "")]
        sort: String,
    },
    /// List product categories
    Categories,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the order and clear the cart
    Checkout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Promo code to apply
        #[arg(long)]
        promo: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show {
        /// Promo code to apply
        #[arg(long)]
        promo: Option<String>,
    },
    /// Add one unit of a product
    Add { id: ProductId },
    /// Increase a line's quantity by one
    Inc { id: ProductId },
    /// Decrease a line's quantity by one, removing it at zero
    Dec { id: ProductId },
    /// Remove a line
    Remove { id: ProductId },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for render output
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_widget=info,shopfront_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = commands::open_session().await?;
    let output = commands::Output::new(cli.json);

    match cli.command {
        Commands::Products {
            category,
            price,
            sort,
        } => commands::catalog::products(&session, &output, &category, &price, &sort)?,
        Commands::Categories => commands::catalog::categories(&session, &output)?,
        Commands::Cart { action } => match action {
            CartAction::Show { promo } => {
                commands::cart::show(&mut session, &output, promo.as_deref())?;
            }
            CartAction::Add { id } => commands::cart::add(&mut session, &output, id)?,
            CartAction::Inc { id } => commands::cart::change(&mut session, &output, id, 1)?,
            CartAction::Dec { id } => commands::cart::change(&mut session, &output, id, -1)?,
            CartAction::Remove { id } => commands::cart::remove(&mut session, &output, id)?,
        },
        Commands::Checkout { yes, promo } => {
            commands::checkout::run(&mut session, &output, yes, promo.as_deref())?;
        }
    }
    Ok(())
}
