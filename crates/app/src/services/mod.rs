//! Business logic services.

pub mod accounts;
pub mod auth;
pub mod biometric;

pub use accounts::{AccountStore, SessionReload};
pub use auth::{AuthError, AuthService};
pub use biometric::{
    BiometricAuthenticator, BiometricAvailability, BiometricResult, SimulatedBiometrics,
};
