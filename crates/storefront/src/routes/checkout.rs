//! Checkout and payment route handlers.
//!
//! The pay control polls `/checkout/status` while it is disabled. Once the
//! flow is idle again the status response triggers `cart-updated`, `notice`
//! and `payment-finished`, so the sidebar, badge and toast catch up with the
//! cleanup and the modal re-fetches itself from `/checkout/modal`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use pocket_shop_core::PaymentStage;
use tracing::instrument;

use crate::checkout::{PayButtonView, PaymentModal};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Payment modal fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_modal.html")]
pub struct PaymentModalTemplate {
    pub modal: PaymentModal,
    pub button: PayButtonView,
}

/// Pay control fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/pay_button.html")]
pub struct PayButtonTemplate {
    pub button: PayButtonView,
}

/// Open the payment modal for the current cart total.
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> Result<Response> {
    let shop = state.shop();
    let modal = shop.on_checkout()?;
    Ok((
        AppendHeaders([("HX-Trigger", "close-cart")]),
        PaymentModalTemplate {
            modal,
            button: shop.pay_button(),
        },
    )
        .into_response())
}

/// Confirm the payment. The timed sequence continues in the background.
#[instrument(skip(state))]
pub async fn pay(State(state): State<AppState>) -> Result<PayButtonTemplate> {
    let shop = state.shop();
    // Dropping the handle detaches the payment task; it still runs to cleanup.
    let _handle = shop.on_confirm_payment()?;
    add_breadcrumb("checkout", "Payment confirmed", None);
    Ok(PayButtonTemplate {
        button: shop.pay_button(),
    })
}

/// Current pay control state.
#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Response {
    let button = state.shop().pay_button();
    if button.stage == PaymentStage::Idle {
        (
            AppendHeaders([("HX-Trigger", "cart-updated, notice, payment-finished")]),
            PayButtonTemplate { button },
        )
            .into_response()
    } else {
        PayButtonTemplate { button }.into_response()
    }
}

/// Current payment modal, re-fetched when a payment finishes.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> PaymentModalTemplate {
    let shop = state.shop();
    PaymentModalTemplate {
        modal: shop.modal(),
        button: shop.pay_button(),
    }
}

/// Close the payment modal. A running payment is not cancelled.
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> PaymentModalTemplate {
    let shop = state.shop();
    shop.on_close_payment();
    PaymentModalTemplate {
        modal: shop.modal(),
        button: shop.pay_button(),
    }
}
