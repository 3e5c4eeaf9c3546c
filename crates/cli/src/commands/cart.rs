//! Shopping cart commands.

use tracing::info;

use second_sole_app::models::CartItem;
use second_sole_app::{AppError, AppState};
use second_sole_core::ShoeId;

use super::require_unlocked;

pub fn show(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let cart = state.store().cart();
    if cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }
    for line in cart {
        info!("{} x{} (size {})", line.shoe_id, line.quantity, line.size);
    }
    Ok(())
}

pub fn add(state: &AppState, shoe_id: &str, size: f64, quantity: u32) -> Result<(), AppError> {
    require_unlocked(state)?;
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_owned()));
    }
    state.store().add_to_cart(CartItem {
        shoe_id: ShoeId::new(shoe_id),
        quantity,
        size,
    })?;
    info!("Added {quantity} x {shoe_id} (size {size}) to cart");
    Ok(())
}

pub fn remove(state: &AppState, shoe_id: &str, size: f64) -> Result<(), AppError> {
    require_unlocked(state)?;
    state.store().remove_from_cart(&ShoeId::new(shoe_id), size)?;
    info!("Removed {shoe_id} (size {size}) from cart");
    Ok(())
}

pub fn clear(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    state.store().clear_cart()?;
    info!("Cart cleared");
    Ok(())
}
