//! Shoe rotation commands.

use chrono::Utc;
use tracing::{info, warn};

use second_sole_app::models::ShoeRotationItem;
use second_sole_app::{AppError, AppState};
use second_sole_core::{RotationShoeId, ShoeId};

use super::require_unlocked;

/// Replacement mileage used when none is given.
pub const DEFAULT_THRESHOLD: f64 = 300.0;

/// A pair of shoes to add to the rotation.
pub struct NewShoe {
    pub shoe_id: String,
    pub name: String,
    pub nickname: Option<String>,
    pub miles: f64,
    pub threshold: f64,
    pub image: Option<String>,
}

/// List shoes in the rotation.
pub fn list(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let rotation = state.store().rotation();
    if rotation.is_empty() {
        info!("Rotation is empty");
        return Ok(());
    }

    for shoe in rotation {
        let label = shoe.nickname.as_deref().unwrap_or(&shoe.name);
        info!(
            "{} {label}: {:.1}/{:.0} mi ({:.1} left)",
            shoe.id,
            shoe.miles,
            shoe.threshold,
            shoe.remaining_miles()
        );
        if shoe.needs_replacement() {
            warn!("{label} has reached its replacement mileage");
        }
    }
    Ok(())
}

/// Add a pair of shoes.
pub fn add(state: &AppState, shoe: NewShoe) -> Result<(), AppError> {
    require_unlocked(state)?;
    let id = RotationShoeId::new(format!("rot_{}", Utc::now().timestamp_millis()));
    state.store().add_to_rotation(ShoeRotationItem {
        id: id.clone(),
        shoe_id: ShoeId::new(shoe.shoe_id),
        name: shoe.name,
        nickname: shoe.nickname,
        miles: shoe.miles,
        threshold: shoe.threshold,
        image: shoe.image,
    })?;
    info!("Added {id} to rotation");
    Ok(())
}

/// Log miles on a pair.
pub fn log(state: &AppState, id: &str, miles: f64) -> Result<(), AppError> {
    require_unlocked(state)?;
    let id = RotationShoeId::new(id);
    if !state.store().update_rotation_shoe(&id, miles)? {
        return Err(AppError::NotFound(format!("rotation entry {id}")));
    }
    info!("Logged {miles:.1} mi on {id}");
    Ok(())
}

/// Retire a pair.
pub fn remove(state: &AppState, id: &str) -> Result<(), AppError> {
    require_unlocked(state)?;
    state.store().remove_rotation_shoe(&RotationShoeId::new(id))?;
    info!("Removed {id} from rotation");
    Ok(())
}
