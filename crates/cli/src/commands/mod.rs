//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod theme;
pub mod weather;

use pocket_shop_storefront::cart::CartError;
use pocket_shop_storefront::catalog::CatalogError;
use pocket_shop_storefront::checkout::CheckoutError;
use pocket_shop_storefront::config::ConfigError;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog file could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout or payment rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A background task panicked.
    #[error("Task failed: {0}")]
    Task(#[from] JoinError),
}
