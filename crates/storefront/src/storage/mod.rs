//! Durable key-value storage.
//!
//! The shop persists small string values (the cart snapshot, the theme)
//! under well-known keys, the same way a browser page uses local storage.
//! Persisted values are snapshots: they are read once at startup and
//! overwritten on every mutation, while the in-memory state stays
//! authoritative for the running session.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage keys used by the shop.
pub mod keys {
    /// Key for the serialized cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the selected theme (`"light"` or `"dark"`).
    pub const THEME: &str = "theme";
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// A value could not be (de)serialized.
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// A string-valued key-value store that survives restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
