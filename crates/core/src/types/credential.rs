//! Password digest type.
//!
//! Plaintext passwords are hashed at the edge; everything downstream only
//! ever sees and compares [`PasswordDigest`] values.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of a password.
///
/// Guest accounts carry the empty digest, which never verifies against a
/// non-empty one.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a plaintext password.
    ///
    /// ```
    /// use second_sole_core::PasswordDigest;
    ///
    /// let digest = PasswordDigest::from_plaintext("abc");
    /// assert_eq!(
    ///     digest.as_str(),
    ///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    /// );
    /// ```
    #[must_use]
    pub fn from_plaintext(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wrap an already computed hex digest.
    #[must_use]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The empty digest stored for passwordless (guest) accounts.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` for the guest placeholder digest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the hex digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality check against another digest.
    #[must_use]
    pub fn verify(&self, candidate: &Self) -> bool {
        constant_time_compare(&self.0, &candidate.0)
    }
}

// Digests are credentials; keep them out of logs.
impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("PasswordDigest(<empty>)")
        } else {
            f.write_str("PasswordDigest([REDACTED])")
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_plaintext_is_lowercase_hex() {
        let digest = PasswordDigest::from_plaintext("hunter22");
        assert_eq!(digest.as_str().len(), 64);
        assert!(
            digest
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_verify_matches_same_password() {
        let stored = PasswordDigest::from_plaintext("trail-miles");
        assert!(stored.verify(&PasswordDigest::from_plaintext("trail-miles")));
        assert!(!stored.verify(&PasswordDigest::from_plaintext("trail-mile")));
    }

    #[test]
    fn test_empty_digest_never_verifies_real_digest() {
        let guest = PasswordDigest::empty();
        assert!(guest.is_empty());
        assert!(!guest.verify(&PasswordDigest::from_plaintext("")));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
    }

    #[test]
    fn test_debug_redacts() {
        let digest = PasswordDigest::from_hex("deadbeef");
        let debug = format!("{digest:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("REDACTED"));
    }
}
