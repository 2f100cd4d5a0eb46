//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products?q=            - Product grid fragment (search)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart items fragment
//! POST /cart/add               - Add to cart (returns cart_items fragment, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Open payment modal (422 when the cart is empty)
//! POST /checkout/pay           - Confirm payment (409 while a payment runs)
//! GET  /checkout/status        - Pay control fragment (polled while disabled)
//! GET  /checkout/modal         - Payment modal fragment (re-fetched on payment-finished)
//! POST /checkout/close         - Close payment modal
//!
//! # Preferences & notices
//! POST /theme/toggle           - Switch light/dark
//! GET  /notices                - Drain pending notices into a toast fragment
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod notices;
pub mod products;
pub mod theme;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::open))
        .route("/pay", post(checkout::pay))
        .route("/status", get(checkout::status))
        .route("/modal", get(checkout::show))
        .route("/close", post(checkout::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Storefront page
        .route("/", get(home::home))
        .route("/health", get(health))
        // Product grid
        .nest("/products", product_routes())
        // Cart fragments
        .nest("/cart", cart_routes())
        // Checkout and payment
        .nest("/checkout", checkout_routes())
        // Preferences
        .route("/theme/toggle", post(theme::toggle))
        // Toasts
        .route("/notices", get(notices::index))
}

/// Build the application router with state attached.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

/// Liveness check.
async fn health() -> &'static str {
    "ok"
}
