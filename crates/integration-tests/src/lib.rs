//! Integration tests for Pocket Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart store behavior through the shop, including persistence
//! - `checkout_flow` - Timed payment sequence on a paused clock
//! - `http_routes` - The axum router driven with `tower::ServiceExt::oneshot`
//!
//! No server or external service is needed; every test builds its own shop
//! over in-memory or temporary storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use pocket_shop_storefront::catalog::Catalog;
use pocket_shop_storefront::checkout::PaymentDelays;
use pocket_shop_storefront::routes;
use pocket_shop_storefront::shop::Shop;
use pocket_shop_storefront::state::AppState;
use pocket_shop_storefront::storage::{KeyValueStore, MemoryStore};

/// Payment delays short enough for tests that run on a real clock.
pub const FAST_PAYMENT: PaymentDelays = PaymentDelays {
    processing: Duration::from_millis(20),
    success: Duration::from_millis(10),
};

/// A shop over the reference catalog and a fresh in-memory store.
#[must_use]
pub fn memory_shop(delays: PaymentDelays) -> (Shop, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let shop = shop_over(Arc::clone(&storage) as Arc<dyn KeyValueStore>, delays);
    (shop, storage)
}

/// A shop over the reference catalog and the given store.
#[must_use]
pub fn shop_over(storage: Arc<dyn KeyValueStore>, delays: PaymentDelays) -> Shop {
    Shop::new(Catalog::reference(), storage, delays)
}

/// The storefront router around `shop`.
#[must_use]
pub fn test_app(shop: Shop) -> Router {
    routes::app(AppState::new(shop))
}

/// A unique path under the system temp directory.
#[must_use]
pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("pocket-shop-it-{}", uuid::Uuid::new_v4()))
        .join("storage.json")
}
