//! Biometric capability.
//!
//! Native fingerprint/face hardware is platform glue and lives outside this
//! crate; callers inject any [`BiometricAuthenticator`]. The bundled
//! [`SimulatedBiometrics`] stands in wherever no native provider exists.

use async_trait::async_trait;
use tracing::{debug, instrument};

use second_sole_core::BiometryKind;

/// Prompt shown when no specific reason is given.
pub const DEFAULT_REASON: &str = "Authenticate to access your profile";

/// Prompt shown by the profile unlock flow.
pub const UNLOCK_REASON: &str = "Unlock your Second Sole profile";

/// Message used when a provider fails without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Biometric authentication failed";

/// Whether biometric auth can be offered, and which kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiometricAvailability {
    pub available: bool,
    pub kind: BiometryKind,
}

impl BiometricAvailability {
    /// Label to show on the unlock button, e.g. `"Face ID"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Outcome of one biometric prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiometricResult {
    pub success: bool,
    pub error: Option<String>,
    pub code: Option<String>,
}

impl BiometricResult {
    /// A successful prompt.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            success: true,
            error: None,
            code: None,
        }
    }

    /// A failed prompt with an optional provider message and code.
    #[must_use]
    pub const fn failure(error: Option<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            error,
            code,
        }
    }

    /// The failure message, falling back to the generic one.
    #[must_use]
    pub fn message(&self) -> &str {
        self.error.as_deref().unwrap_or(DEFAULT_FAILURE_MESSAGE)
    }
}

/// Port for a device biometric provider.
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    /// Report whether biometrics can be used right now.
    async fn check_availability(&self) -> BiometricAvailability;

    /// Prompt the user with `reason`.
    async fn authenticate(&self, reason: &str) -> BiometricResult;
}

/// Provider for platforms without native biometrics.
///
/// Always available and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedBiometrics {
    kind: BiometryKind,
}

impl SimulatedBiometrics {
    #[must_use]
    pub const fn new(kind: BiometryKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub const fn kind(&self) -> BiometryKind {
        self.kind
    }
}

#[async_trait]
impl BiometricAuthenticator for SimulatedBiometrics {
    async fn check_availability(&self) -> BiometricAvailability {
        BiometricAvailability {
            available: true,
            kind: self.kind,
        }
    }

    #[instrument(skip(self))]
    async fn authenticate(&self, reason: &str) -> BiometricResult {
        debug!(kind = %self.kind, "Simulated biometric prompt accepted");
        BiometricResult::success()
    }
}
