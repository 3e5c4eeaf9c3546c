//! Biometry kinds reported by the platform.

use serde::{Deserialize, Serialize};

/// Kind of biometric hardware available on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BiometryKind {
    #[default]
    None,
    TouchId,
    FaceId,
    FingerprintAuthentication,
    FaceAuthentication,
    IrisAuthentication,
}

impl BiometryKind {
    /// User-facing label for the unlock button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FaceId => "Face ID",
            Self::TouchId => "Touch ID",
            Self::FaceAuthentication => "Face Unlock",
            Self::FingerprintAuthentication => "Fingerprint",
            Self::IrisAuthentication => "Iris Scan",
            Self::None => "Biometrics",
        }
    }
}

impl std::fmt::Display for BiometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::TouchId => write!(f, "touch_id"),
            Self::FaceId => write!(f, "face_id"),
            Self::FingerprintAuthentication => write!(f, "fingerprint_authentication"),
            Self::FaceAuthentication => write!(f, "face_authentication"),
            Self::IrisAuthentication => write!(f, "iris_authentication"),
        }
    }
}

impl std::str::FromStr for BiometryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "touch_id" => Ok(Self::TouchId),
            "face_id" => Ok(Self::FaceId),
            "fingerprint_authentication" => Ok(Self::FingerprintAuthentication),
            "face_authentication" => Ok(Self::FaceAuthentication),
            "iris_authentication" => Ok(Self::IrisAuthentication),
            _ => Err(format!("invalid biometry kind: {s}")),
        }
    }
}
