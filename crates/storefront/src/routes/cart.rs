//! Cart route handlers.
//!
//! Cart operations return the re-rendered cart items fragment and trigger
//! `cart-updated` so the badge refreshes itself. Edits made while a payment
//! runs are refused with a notice, so quantity changes also trigger `notice`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use pocket_shop_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;
use crate::view::CartView;

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct ChangeQuantityForm {
    pub product_id: ProductId,
    pub delta: i32,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn updated(cart: CartView, trigger: &'static str) -> Response {
    (
        AppendHeaders([("HX-Trigger", trigger)]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Cart items fragment.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: state.shop().cart_view(),
    }
}

/// Add one unit to the cart (HTMX).
///
/// Also triggers `open-cart` so the sidebar slides in.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let cart = state.shop().on_add_to_cart(form.product_id)?;
    let product_id = form.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    Ok(updated(cart, "cart-updated, open-cart"))
}

/// Change a line's quantity by `delta` (HTMX).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<ChangeQuantityForm>,
) -> Response {
    let cart = state
        .shop()
        .on_change_quantity(form.product_id, form.delta);
    updated(cart, "cart-updated, notice")
}

/// Remove a line (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<CartItemForm>) -> Response {
    let cart = state.shop().on_remove_from_cart(form.product_id);
    updated(cart, "cart-updated, notice")
}

/// Cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.shop().item_count(),
    }
}
