//! Integration tests for the sign-up and unlock flows.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use second_sole_app::services::{AuthError, BiometricAuthenticator};
use second_sole_core::BiometryKind;
use second_sole_integration_tests::TestContext;

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

#[test]
fn test_register_then_password_unlock() {
    let ctx = TestContext::new().unwrap();
    let auth = ctx.state.auth();

    let id = auth
        .register("Ann", "ann@x.com", &secret("tempo-run"), &secret("tempo-run"))
        .unwrap();
    ctx.state.store().logout().unwrap();
    assert_eq!(ctx.state.store().current_account_id(), Some(id));

    assert!(matches!(
        auth.unlock_with_password(&secret("easy-run")),
        Err(AuthError::IncorrectPassword)
    ));
    auth.unlock_with_password(&secret("tempo-run")).unwrap();
    assert!(ctx.state.store().is_authenticated());
}

#[test]
fn test_register_rejections() {
    let ctx = TestContext::new().unwrap();
    let auth = ctx.state.auth();
    auth.register("Ann", "ann@x.com", &secret("tempo-run"), &secret("tempo-run"))
        .unwrap();

    assert!(matches!(
        auth.register("Bo", "bo@x.com", &secret("short"), &secret("short")),
        Err(AuthError::WeakPassword(_))
    ));
    assert!(matches!(
        auth.register("Bo", "bo@x.com", &secret("tempo-run"), &secret("long-run")),
        Err(AuthError::PasswordMismatch)
    ));
    assert!(matches!(
        auth.register("Bo", "Ann@X.COM", &secret("tempo-run"), &secret("tempo-run")),
        Err(AuthError::EmailTaken)
    ));
    assert_eq!(ctx.state.store().list_accounts().len(), 1);
}

#[tokio::test]
async fn test_biometric_unlock_after_switch() {
    let ctx = TestContext::with_biometry(BiometryKind::FingerprintAuthentication).unwrap();
    let auth = ctx.state.auth();

    let ann = auth
        .register("Ann", "ann@x.com", &secret("tempo-run"), &secret("tempo-run"))
        .unwrap();
    auth.continue_as_guest().unwrap();

    ctx.state.store().switch_account(&ann).unwrap();
    assert!(!ctx.state.store().is_authenticated());

    let availability = ctx.state.biometrics().check_availability().await;
    assert!(availability.available);
    assert_eq!(availability.label(), "Fingerprint");

    auth.unlock_with_biometrics().await.unwrap();
    assert!(ctx.state.store().is_authenticated());
    assert_eq!(ctx.state.store().profile().name, "Ann");
}

#[tokio::test]
async fn test_unlock_without_selection() {
    let ctx = TestContext::new().unwrap();
    let auth = ctx.state.auth();
    assert!(matches!(
        auth.unlock_with_password(&secret("tempo-run")),
        Err(AuthError::NoCurrentAccount)
    ));
    assert!(matches!(
        auth.unlock_with_biometrics().await,
        Err(AuthError::NoCurrentAccount)
    ));
    assert!(!ctx.state.store().is_authenticated());
}
