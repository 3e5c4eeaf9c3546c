//! Runner profile and gait commands.

use clap::Args;
use tracing::info;

use second_sole_app::models::{GaitProfile, ProfileUpdate};
use second_sole_app::{AppError, AppState};

use super::require_unlocked;

/// Gait preference fields; unset flags are left unchanged.
#[derive(Args)]
pub struct GaitArgs {
    /// Usual terrain (road, trail, track)
    #[arg(long)]
    terrain: Option<String>,

    /// Foot strike (heel, mid, fore)
    #[arg(long)]
    strike: Option<String>,

    /// Arch height
    #[arg(long)]
    arch: Option<String>,

    #[arg(long)]
    pronation: Option<String>,

    #[arg(long)]
    distance_goals: Option<String>,

    #[arg(long)]
    cushion_pref: Option<String>,

    #[arg(long)]
    foot_shape: Option<String>,

    /// Past injury; repeat for several
    #[arg(long = "injury")]
    injuries: Vec<String>,
}

impl From<GaitArgs> for GaitProfile {
    fn from(args: GaitArgs) -> Self {
        Self {
            terrain: args.terrain,
            strike: args.strike,
            arch: args.arch,
            pronation: args.pronation,
            distance_goals: args.distance_goals,
            cushion_pref: args.cushion_pref,
            foot_shape: args.foot_shape,
            injury_history: (!args.injuries.is_empty()).then_some(args.injuries),
        }
    }
}

/// Show the runner profile.
pub fn show(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let profile = state.store().profile();
    let kind = if profile.is_guest { "guest" } else { "member" };
    info!("{} <{}> ({kind})", profile.name, profile.email);
    info!(
        "{} events attended, {:.1} miles run",
        profile.attendance_count, profile.miles_run
    );
    Ok(())
}

/// Update profile fields.
pub fn update(
    state: &AppState,
    name: Option<String>,
    email: Option<String>,
    miles_run: Option<f64>,
) -> Result<(), AppError> {
    require_unlocked(state)?;
    let update = ProfileUpdate {
        name,
        email,
        miles_run,
        ..ProfileUpdate::default()
    };
    if update.is_empty() {
        return Err(AppError::BadRequest("nothing to update".to_owned()));
    }

    if let Some(profile) = state.store().update_profile(update)? {
        info!("Updated profile for {}", profile.name);
    }
    Ok(())
}

/// Show gait preferences.
pub fn show_gait(state: &AppState) -> Result<(), AppError> {
    require_unlocked(state)?;
    let gait = state.store().gait_profile();
    if gait == GaitProfile::default() {
        info!("No gait preferences recorded");
        return Ok(());
    }

    let fields = [
        ("terrain", &gait.terrain),
        ("strike", &gait.strike),
        ("arch", &gait.arch),
        ("pronation", &gait.pronation),
        ("distance goals", &gait.distance_goals),
        ("cushion", &gait.cushion_pref),
        ("foot shape", &gait.foot_shape),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            info!("{label}: {value}");
        }
    }
    if let Some(injuries) = &gait.injury_history {
        info!("injuries: {}", injuries.join(", "));
    }
    Ok(())
}

/// Update gait preferences.
pub fn update_gait(state: &AppState, args: GaitArgs) -> Result<(), AppError> {
    require_unlocked(state)?;
    let update = GaitProfile::from(args);
    if update == GaitProfile::default() {
        return Err(AppError::BadRequest("nothing to update".to_owned()));
    }
    state.store().update_gait_profile(update)?;
    info!("Updated gait preferences");
    Ok(())
}
