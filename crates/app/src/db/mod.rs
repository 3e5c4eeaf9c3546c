//! Local key-value storage backends.
//!
//! # Storage model
//!
//! Everything the app persists lives in one JSON document stored under a
//! single key (see [`crate::config::DEFAULT_STORAGE_KEY`]). Backends only
//! need to get, set and remove whole string values:
//!
//! - [`FileStore`] - one `<key>.json` file per key inside a data directory
//! - [`MemoryStore`] - in-process map, used by tests
//!
//! Backends are injected into [`crate::services::accounts::AccountStore`]
//! rather than reached through a global, so tests can swap them freely.

mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::AppConfig;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A number that JSON cannot represent (NaN or infinity).
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    /// Key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Whether `c` may appear in a storage key.
#[must_use]
pub const fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Whether `key` is usable by every backend, including as a file name.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

/// A string key-value store holding whole documents.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Open the file-backed store described by the configuration.
///
/// The data directory is created lazily on the first write.
#[must_use]
pub fn open_file_store(config: &AppConfig) -> FileStore {
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening file store");
    FileStore::new(&config.data_dir)
}
