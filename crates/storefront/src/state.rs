//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::notices::{self, Notice};
use crate::shop::Shop;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// shop and the notices waiting for the page.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    shop: Shop,
    /// Notices waiting to be shown in the toast area.
    pending_notices: Mutex<broadcast::Receiver<Notice>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(shop: Shop) -> Self {
        let pending_notices = Mutex::new(shop.notices().subscribe());
        Self {
            inner: Arc::new(AppStateInner {
                shop,
                pending_notices,
            }),
        }
    }

    /// Get a reference to the shop.
    #[must_use]
    pub fn shop(&self) -> &Shop {
        &self.inner.shop
    }

    /// Take every notice published since the last call.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut rx = self
            .inner
            .pending_notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        notices::drain(&mut rx)
    }
}
