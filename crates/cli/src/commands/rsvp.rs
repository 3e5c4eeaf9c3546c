//! Event RSVP commands.

use tracing::info;

use second_sole_app::{AppError, AppState};
use second_sole_core::EventId;

use super::require_unlocked;

/// List RSVPed events.
pub fn list(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let events = state.store().rsvped_events();
    if events.is_empty() {
        info!("No RSVPs");
    }
    for event in events {
        info!("{event}");
    }
    Ok(())
}

/// RSVP to an event. Without an id this is a plain check-in.
pub fn add(state: &AppState, event_id: Option<&str>) -> Result<(), AppError> {
    require_unlocked(state)?;
    let event_id = event_id.map(EventId::new);
    state.store().rsvp_event(event_id.as_ref())?;

    let attended = state.store().profile().attendance_count;
    match event_id {
        Some(id) => info!("RSVPed to {id} ({attended} events attended)"),
        None => info!("Checked in ({attended} events attended)"),
    }
    Ok(())
}

/// Cancel an RSVP.
pub fn remove(state: &AppState, event_id: &str) -> Result<(), AppError> {
    require_unlocked(state)?;
    state.store().remove_rsvp(&EventId::new(event_id))?;
    info!("Cancelled RSVP for {event_id}");
    Ok(())
}
