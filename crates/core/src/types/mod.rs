//! Core types for Second Sole.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod biometry;
pub mod credential;
pub mod email;
pub mod id;

pub use biometry::BiometryKind;
pub use credential::PasswordDigest;
pub use email::{Email, EmailError};
pub use id::*;
