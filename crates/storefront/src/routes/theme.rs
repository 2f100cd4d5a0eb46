//! Theme preference route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use tracing::instrument;

use crate::state::AppState;

/// Theme toggle button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/theme_toggle.html")]
pub struct ThemeToggleTemplate {
    pub theme_icon: &'static str,
}

/// Switch between light and dark and persist the choice.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> impl IntoResponse {
    let theme = state.shop().on_toggle_theme();
    (
        AppendHeaders([("HX-Trigger", "theme-changed")]),
        ThemeToggleTemplate {
            theme_icon: theme.icon(),
        },
    )
}
