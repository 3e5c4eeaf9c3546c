//! Unified error handling.
//!
//! Provides an `AppError` that front-ends (the CLI) return from their
//! command handlers. Library operations keep their narrower error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::StorageError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication flow failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Referenced account or item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation needs an unlocked session.
    #[error("Locked: {0}")]
    Locked(String),

    /// Invalid input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error was caused by the caller rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Storage(err) => matches!(err, StorageError::NonFinite(_)),
            Self::Auth(err) => match err {
                AuthError::Storage(err) => matches!(err, StorageError::NonFinite(_)),
                _ => true,
            },
            Self::NotFound(_) | Self::Locked(_) | Self::BadRequest(_) => true,
        }
    }
}
