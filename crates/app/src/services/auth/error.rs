//! Auth flow error types.

use thiserror::Error;

use crate::db::StorageError;

/// Errors surfaced to the sign-up and unlock screens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Name was blank after trimming.
    #[error("name is required")]
    MissingName,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] second_sole_core::EmailError),

    /// Password shorter than the minimum.
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Another account already uses this email.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// No account is selected to unlock.
    #[error("no account selected")]
    NoCurrentAccount,

    /// Password did not match the selected account.
    #[error("incorrect password")]
    IncorrectPassword,

    /// The biometric prompt failed or was cancelled.
    #[error("{message}")]
    BiometricFailed {
        message: String,
        code: Option<String>,
    },

    /// Backend write failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
