//! Privacy commands.

use tracing::info;

use second_sole_app::db::StorageError;
use second_sole_app::services::SessionReload;
use second_sole_app::{AppError, AppState};

use super::require_unlocked;

/// Show storage usage of the selected profile.
pub fn audit(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let audit = state.store().privacy_audit();
    info!("Storage used: {}", audit.storage_used);
    match audit.last_wipe {
        Some(at) => info!("Last wipe: {at}"),
        None => info!("Last wipe: never"),
    }
    Ok(())
}

/// Print the stored document as pretty JSON on stdout.
#[allow(clippy::print_stdout)] // output is meant to be piped
pub fn dump(state: &AppState) -> Result<(), AppError> {
    let document = state.store().raw_document();
    let json = serde_json::to_string_pretty(&document).map_err(StorageError::from)?;
    println!("{json}");
    Ok(())
}

/// Delete the selected profile from this device.
pub fn wipe(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let SessionReload = state.store().wipe_data()?;
    info!("Profile wiped; select or create a profile to continue");
    Ok(())
}

/// Delete every profile from this device.
pub fn wipe_all(state: &AppState) -> Result<(), AppError> {
    let SessionReload = state.store().wipe_all_data()?;
    info!("All local data wiped");
    Ok(())
}
