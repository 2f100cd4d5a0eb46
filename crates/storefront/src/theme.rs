//! Persisted theme preference.

use std::sync::Arc;

use pocket_shop_core::Theme;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, keys};

/// Holds the current [`Theme`] and persists changes under the `theme` key.
pub struct ThemeStore {
    current: Theme,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Read the stored theme. Missing or unrecognised values fall back to dark.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = match storage.get(keys::THEME) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Theme preference unavailable");
                Theme::default()
            }
        };

        Self { current, storage }
    }

    /// The active theme.
    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    /// Switch to the other theme and persist it. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        debug!(theme = %self.current, "Theme toggled");
        if let Err(e) = self.storage.set(keys::THEME, self.current.as_str()) {
            warn!(error = %e, "Failed to persist theme");
        }
        self.current
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_to_dark() {
        let store = ThemeStore::load(Arc::new(MemoryStore::new()));
        assert_eq!(store.current(), Theme::Dark);
    }

    #[test]
    fn test_reads_stored_light() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::THEME, "light")]));
        assert_eq!(ThemeStore::load(storage).current(), Theme::Light);
    }

    #[test]
    fn test_unrecognised_value_falls_back() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::THEME, "neon")]));
        assert_eq!(ThemeStore::load(storage).current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = ThemeStore::load(storage.clone());

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("light"));

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("dark"));
    }
}
