//! Second Sole Core - Shared types library.
//!
//! This crate provides common types used across all Second Sole components:
//! - `app` - Local account store, auth flow and biometric boundary
//! - `cli` - Command-line driver for the account store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, password digests and biometry kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
