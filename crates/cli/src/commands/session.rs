//! Session lock commands.

use secrecy::SecretString;
use tracing::info;

use second_sole_app::services::BiometricAuthenticator;
use second_sole_app::{AppError, AppState};

/// Unlock with the profile password.
pub fn unlock_with_password(state: &AppState, password: &SecretString) -> Result<(), AppError> {
    state.auth().unlock_with_password(password)?;
    info!("Unlocked");
    Ok(())
}

/// Unlock with the biometric provider.
pub async fn unlock_with_biometrics(state: &AppState) -> Result<(), AppError> {
    state.auth().unlock_with_biometrics().await?;
    info!("Unlocked with {}", state.biometrics().kind().label());
    Ok(())
}

/// Lock the session.
pub fn logout(state: &AppState) -> Result<(), AppError> {
    state.store().logout()?;
    info!("Locked");
    Ok(())
}

/// Show the selected profile, lock state and biometric availability.
pub async fn status(state: &AppState) {
    let store = state.store();
    match store.current_account_id() {
        Some(id) => {
            let lock = if store.is_authenticated() {
                "unlocked"
            } else {
                "locked"
            };
            info!("Profile {id} ({lock})");
        }
        None => info!("No profile selected"),
    }

    let availability = state.biometrics().check_availability().await;
    if availability.available {
        info!("Biometric unlock available: {}", availability.label());
    } else {
        info!("Biometric unlock unavailable");
    }
    info!(
        "Data stored in {}",
        state.config().data_dir.display()
    );
}
