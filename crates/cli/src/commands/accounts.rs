//! Profile management commands.

use secrecy::SecretString;
use tracing::info;

use second_sole_app::{AppError, AppState};
use second_sole_core::AccountId;

/// List every profile on this device.
pub fn list(state: &AppState) {
    let current = state.store().current_account_id();
    let accounts = state.store().list_accounts();
    if accounts.is_empty() {
        info!("No profiles on this device");
        return;
    }

    for account in accounts {
        let marker = if current.as_ref() == Some(&account.id) {
            "*"
        } else {
            " "
        };
        let kind = if account.is_guest { "guest" } else { "member" };
        info!(
            "{marker} {} {} <{}> ({kind})",
            account.id, account.name, account.email
        );
    }
}

/// Sign up a new profile and select it.
pub fn create(
    state: &AppState,
    name: &str,
    email: &str,
    password: &SecretString,
    confirm: &SecretString,
) -> Result<(), AppError> {
    let id = state.auth().register(name, email, password, confirm)?;
    info!("Created profile {id}");
    Ok(())
}

/// Enter as the guest profile.
pub fn guest(state: &AppState) -> Result<(), AppError> {
    let id = state.auth().continue_as_guest()?;
    info!("Continuing as guest ({id})");
    Ok(())
}

/// Select another profile.
pub fn switch(state: &AppState, id: &str) -> Result<(), AppError> {
    let id = AccountId::new(id);
    if !state.store().switch_account(&id)? {
        return Err(AppError::NotFound(format!("profile {id}")));
    }
    info!("Switched to {id}; unlock it to continue");
    Ok(())
}

/// Delete a profile.
pub fn delete(state: &AppState, id: &str) -> Result<(), AppError> {
    let id = AccountId::new(id);
    if !state.store().delete_account(&id)? {
        return Err(AppError::NotFound(format!("profile {id}")));
    }
    info!("Deleted profile {id}");
    Ok(())
}

/// Show the selected profile id.
pub fn current(state: &AppState) {
    match state.store().current_account_id() {
        Some(id) => info!("{id}"),
        None => info!("No profile selected"),
    }
}
