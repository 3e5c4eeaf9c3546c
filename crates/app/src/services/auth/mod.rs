//! Auth flow service.
//!
//! Sign-up validation, password-fallback unlock, biometric unlock and guest
//! entry on top of the [`AccountStore`].

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use second_sole_core::{AccountId, Email, PasswordDigest};

use crate::db::KeyValueStore;
use crate::services::accounts::AccountStore;
use crate::services::biometric::{BiometricAuthenticator, UNLOCK_REASON};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Auth flow service.
///
/// Borrows the store and the biometric provider for the duration of a flow.
pub struct AuthService<'a, S, B> {
    store: &'a AccountStore<S>,
    biometrics: &'a B,
}

impl<'a, S, B> AuthService<'a, S, B>
where
    S: KeyValueStore,
    B: BiometricAuthenticator,
{
    /// Create a new auth service.
    #[must_use]
    pub const fn new(store: &'a AccountStore<S>, biometrics: &'a B) -> Self {
        Self { store, biometrics }
    }

    // =========================================================================
    // Sign-up
    // =========================================================================

    /// Validate a sign-up form and create the account.
    ///
    /// The new account is selected and the session unlocked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    #[instrument(skip(self, password, confirm))]
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<AccountId, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        let email = Email::parse(email)?;

        validate_password(password.expose_secret())?;
        if password.expose_secret() != confirm.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        if self
            .store
            .list_accounts()
            .iter()
            .any(|account| email.matches(&account.email))
        {
            return Err(AuthError::EmailTaken);
        }

        let digest = PasswordDigest::from_plaintext(password.expose_secret());
        let id = self.store.create_account(name, email.as_str(), digest)?;

        info!(account_id = %id, "Registered new account");
        Ok(id)
    }

    // =========================================================================
    // Unlock
    // =========================================================================

    /// Unlock the selected account with its password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoCurrentAccount` if no account is selected.
    /// Returns `AuthError::IncorrectPassword` if the password is wrong.
    #[instrument(skip(self, password))]
    pub fn unlock_with_password(&self, password: &SecretString) -> Result<(), AuthError> {
        let id = self
            .store
            .current_account_id()
            .ok_or(AuthError::NoCurrentAccount)?;

        let candidate = PasswordDigest::from_plaintext(password.expose_secret());
        if !self.store.verify_password(&id, &candidate) {
            warn!(account_id = %id, "Password unlock rejected");
            return Err(AuthError::IncorrectPassword);
        }

        self.store.set_authenticated(true)?;
        info!(account_id = %id, "Unlocked with password");
        Ok(())
    }

    /// Unlock the selected account with the biometric provider.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoCurrentAccount` if no account is selected; the
    /// provider is not prompted.
    /// Returns `AuthError::BiometricFailed` if the prompt fails.
    #[instrument(skip(self))]
    pub async fn unlock_with_biometrics(&self) -> Result<(), AuthError> {
        let id = self
            .store
            .current_account_id()
            .ok_or(AuthError::NoCurrentAccount)?;

        let result = self.biometrics.authenticate(UNLOCK_REASON).await;
        if !result.success {
            warn!(account_id = %id, code = ?result.code, "Biometric unlock rejected");
            return Err(AuthError::BiometricFailed {
                message: result.message().to_owned(),
                code: result.code,
            });
        }

        self.store.set_authenticated(true)?;
        info!(account_id = %id, "Unlocked with biometrics");
        Ok(())
    }

    // =========================================================================
    // Guest
    // =========================================================================

    /// Enter as the shared guest account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the document cannot be written.
    #[instrument(skip(self))]
    pub fn continue_as_guest(&self) -> Result<AccountId, AuthError> {
        Ok(self.store.create_guest_account()?)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::biometric::{BiometricAvailability, BiometricResult, SimulatedBiometrics};
    use second_sole_core::BiometryKind;

    /// Provider whose prompt always fails.
    struct RejectingBiometrics;

    #[async_trait::async_trait]
    impl BiometricAuthenticator for RejectingBiometrics {
        async fn check_availability(&self) -> BiometricAvailability {
            BiometricAvailability {
                available: true,
                kind: BiometryKind::TouchId,
            }
        }

        async fn authenticate(&self, _reason: &str) -> BiometricResult {
            BiometricResult::failure(None, Some("user_cancel".to_owned()))
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn register(
        auth: &AuthService<'_, MemoryStore, SimulatedBiometrics>,
        email: &str,
    ) -> Result<AccountId, AuthError> {
        auth.register("Ann", email, &secret("hunter22"), &secret("hunter22"))
    }

    #[test]
    fn test_register_creates_unlocked_account() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        let id = auth
            .register("  Ann  ", " Ann@X.com ", &secret("hunter22"), &secret("hunter22"))
            .unwrap();

        assert_eq!(store.current_account_id(), Some(id.clone()));
        assert!(store.is_authenticated());
        let profile = store.profile();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.email, "ann@x.com");
        assert!(store.verify_password(&id, &PasswordDigest::from_plaintext("hunter22")));
    }

    #[test]
    fn test_register_validation() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        assert!(matches!(
            auth.register("   ", "a@x.com", &secret("hunter22"), &secret("hunter22")),
            Err(AuthError::MissingName)
        ));
        assert!(matches!(
            auth.register("Ann", "not-an-email", &secret("hunter22"), &secret("hunter22")),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("Ann", "a@x.com", &secret("12345"), &secret("12345")),
            Err(AuthError::WeakPassword(6))
        ));
        assert!(matches!(
            auth.register("Ann", "a@x.com", &secret("hunter22"), &secret("hunter23")),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(store.list_accounts().is_empty());
    }

    #[test]
    fn test_register_rejects_duplicate_email_case_insensitively() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        register(&auth, "ann@x.com").unwrap();
        assert!(matches!(
            register(&auth, "ANN@X.COM"),
            Err(AuthError::EmailTaken)
        ));
        assert_eq!(store.list_accounts().len(), 1);
    }

    #[test]
    fn test_unlock_with_password() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        assert!(matches!(
            auth.unlock_with_password(&secret("hunter22")),
            Err(AuthError::NoCurrentAccount)
        ));

        register(&auth, "ann@x.com").unwrap();
        store.logout().unwrap();

        assert!(matches!(
            auth.unlock_with_password(&secret("wrong-pass")),
            Err(AuthError::IncorrectPassword)
        ));
        assert!(!store.is_authenticated());

        auth.unlock_with_password(&secret("hunter22")).unwrap();
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_guest_cannot_unlock_with_password() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        auth.continue_as_guest().unwrap();
        store.logout().unwrap();
        assert!(matches!(
            auth.unlock_with_password(&secret("")),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[tokio::test]
    async fn test_unlock_with_biometrics() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::new(BiometryKind::FaceId);
        let auth = AuthService::new(&store, &biometrics);

        register(&auth, "ann@x.com").unwrap();
        store.logout().unwrap();

        auth.unlock_with_biometrics().await.unwrap();
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_biometric_unlock_requires_selected_account() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        assert!(matches!(
            auth.unlock_with_biometrics().await,
            Err(AuthError::NoCurrentAccount)
        ));
        assert!(!store.is_authenticated());
        assert_eq!(store.backend().get(store.key()).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_biometrics_keeps_session_locked() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = RejectingBiometrics;
        let auth = AuthService::new(&store, &biometrics);

        auth.continue_as_guest().unwrap();
        store.logout().unwrap();

        let err = auth.unlock_with_biometrics().await.unwrap_err();
        match err {
            AuthError::BiometricFailed { message, code } => {
                assert_eq!(message, "Biometric authentication failed");
                assert_eq!(code.as_deref(), Some("user_cancel"));
            }
            other => panic!("expected biometric failure, got {other:?}"),
        }
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_continue_as_guest_reuses_account() {
        let store = AccountStore::new(MemoryStore::new());
        let biometrics = SimulatedBiometrics::default();
        let auth = AuthService::new(&store, &biometrics);

        let first = auth.continue_as_guest().unwrap();
        let second = auth.continue_as_guest().unwrap();
        assert_eq!(first, second);
        assert!(store.is_authenticated());
    }
}
