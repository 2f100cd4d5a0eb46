//! Toast notice route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::notices::Notice;
use crate::state::AppState;

/// Toast display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub message: String,
    pub warning: bool,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        Self {
            message: notice.message(),
            warning: notice.is_warning(),
        }
    }
}

/// Toast fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notices.html")]
pub struct NoticesTemplate {
    pub notices: Vec<NoticeView>,
}

/// Drain pending notices into the toast area.
pub async fn index(State(state): State<AppState>) -> NoticesTemplate {
    NoticesTemplate {
        notices: state.take_notices().iter().map(NoticeView::from).collect(),
    }
}
