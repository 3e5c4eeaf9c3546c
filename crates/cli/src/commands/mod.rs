//! Command handlers.

pub mod accounts;
pub mod cart;
pub mod privacy;
pub mod profile;
pub mod rotation;
pub mod rsvp;
pub mod session;

use second_sole_app::{AppError, AppState};
use second_sole_core::AccountId;

/// Parse a number the store can persist, rejecting NaN and infinity.
pub fn parse_finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid number {raw:?}: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{raw:?} is not a finite number"))
    }
}

/// Require a selected, unlocked profile for per-profile commands.
fn require_unlocked(state: &AppState) -> Result<AccountId, AppError> {
    let store = state.store();
    let id = store
        .current_account_id()
        .ok_or_else(|| AppError::Locked("no profile selected".to_owned()))?;
    if !store.is_authenticated() {
        return Err(AppError::Locked(format!(
            "profile {id} is locked, run `sole unlock`"
        )));
    }
    Ok(id)
}
