//! Second Sole account store library.
//!
//! Local-only persistence of runner accounts (profile, gait profile, shoe
//! rotation, cart, event RSVPs, privacy audit) plus the session lock, the
//! sign-up/unlock flows and the biometric boundary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::AppError;
pub use state::AppState;
