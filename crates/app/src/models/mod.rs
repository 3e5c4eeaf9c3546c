//! Domain models for the local account store.
//!
//! - [`account`] - per-account records (profile, gait, rotation, cart, RSVPs, audit)
//! - [`document`] - the single persisted document and its load outcome

pub mod account;
pub mod document;

pub use account::{
    Account, CartItem, GaitProfile, PrivacyAudit, ProfileUpdate, ShoeRotationItem, UserProfile,
};
pub use document::{AccountSummary, DocumentLoad, StoreDocument};
