//! Product grid route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::state::AppState;
use crate::view::ProductCardView;

use super::home::SearchQuery;

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCardView>,
}

/// Product grid filtered by name (HTMX).
///
/// Searching never touches the cart.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> ProductGridTemplate {
    let products = state.shop().on_search(&search.q);
    tracing::debug!(query = %search.q, results = products.len(), "Product search");
    ProductGridTemplate { products }
}
