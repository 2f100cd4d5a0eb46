//! Pocket Shop CLI - drive the cart, checkout and theme from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products whose name contains "key"
//! pocket catalog --query key
//!
//! # Add a product, then bump its quantity
//! pocket cart add 4
//! pocket cart change 4 2
//!
//! # Pay for the cart and wait for the order confirmation
//! pocket checkout
//!
//! # Switch between light and dark
//! pocket theme toggle
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `cart` - Show or change the cart
//! - `checkout` - Run the timed payment flow
//! - `theme` - Show or switch the theme
//! - `weather` - Sequenced async lookups

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pocket_shop_core::ProductId;
use pocket_shop_storefront::catalog::Catalog;
use pocket_shop_storefront::config::{DEFAULT_STORAGE_PATH, StorefrontConfig};
use pocket_shop_storefront::shop::Shop;
use pocket_shop_storefront::storage::FileStore;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "pocket")]
#[command(author, version, about = "Pocket Shop CLI tools")]
struct Cli {
    /// Key-value file holding the cart and theme
    #[arg(long, global = true, env = "POCKET_STORE_PATH", default_value = DEFAULT_STORAGE_PATH)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered by name
    Catalog {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Pay for the cart and wait for the order to complete
    Checkout,
    /// Show or switch the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Look up the weather with two sequenced async calls
    Weather,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and the total
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product's line
    Remove { product_id: ProductId },
    /// Change a line's quantity by a signed amount
    Change {
        product_id: ProductId,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { store, command } = cli;
    let shop = open_shop(store)?;
    dispatch(&shop, command).await
}

async fn dispatch(shop: &Shop, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Catalog { query } => commands::catalog::list(shop, &query),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(shop),
            CartAction::Add { product_id } => commands::cart::add(shop, product_id)?,
            CartAction::Remove { product_id } => commands::cart::remove(shop, product_id),
            CartAction::Change { product_id, delta } => {
                commands::cart::change(shop, product_id, delta);
            }
            CartAction::Clear => commands::cart::clear(shop),
        },
        Commands::Checkout => commands::checkout::run(shop).await?,
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(shop),
            ThemeAction::Toggle => commands::theme::toggle(shop),
        },
        Commands::Weather => {
            commands::weather::run(commands::weather::STEP_DELAY).await?;
        }
    }
    Ok(())
}

/// Build a shop over the given store, reusing the storefront's catalog and
/// payment settings.
fn open_shop(store: PathBuf) -> Result<Shop, CliError> {
    let config = StorefrontConfig::from_env()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::reference(),
    };
    tracing::debug!(path = %store.display(), "Opening store");
    let storage = Arc::new(FileStore::open(store));
    Ok(Shop::new(catalog, storage, config.payment))
}
