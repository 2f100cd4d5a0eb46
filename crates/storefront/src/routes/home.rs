//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::checkout::{PayButtonView, PaymentModal};
use crate::state::AppState;
use crate::view::{CartView, ProductCardView};

use super::notices::NoticeView;

/// Search query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Full storefront page.
///
/// Field names match the variables used by the included partials.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub theme_class: &'static str,
    pub theme_icon: &'static str,
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub count: u32,
    pub modal: PaymentModal,
    pub button: PayButtonView,
    pub notices: Vec<NoticeView>,
}

/// Body class for a theme.
pub(crate) const fn theme_class(theme: pocket_shop_core::Theme) -> &'static str {
    match theme {
        pocket_shop_core::Theme::Light => "light-mode",
        pocket_shop_core::Theme::Dark => "",
    }
}

/// Display the storefront page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(search): Query<SearchQuery>) -> HomeTemplate {
    let shop = state.shop();
    let theme = shop.theme();
    let cart = shop.cart_view();

    HomeTemplate {
        theme_class: theme_class(theme),
        theme_icon: theme.icon(),
        products: shop.on_search(&search.q),
        query: search.q,
        count: cart.item_count,
        cart,
        modal: shop.modal(),
        button: shop.pay_button(),
        notices: Vec::new(),
    }
}
