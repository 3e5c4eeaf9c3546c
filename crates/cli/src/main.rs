//! Second Sole CLI - local account store management.
//!
//! # Usage
//!
//! ```bash
//! # Sign up (password from SOLE_PASSWORD or --password)
//! sole accounts create -n "Ann" -e ann@example.com
//!
//! # Enter as the shared guest
//! sole accounts guest
//!
//! # Switch profile, then unlock it
//! sole accounts switch acc_1718000000000_k3j9x
//! sole unlock --biometric
//!
//! # Track shoes and cart
//! sole rotation add --shoe-id brooks-ghost-16 --name "Ghost 16"
//! sole cart add brooks-ghost-16 --size 10.5
//!
//! # Remove the current profile from this device
//! sole wipe
//! ```
//!
//! # Commands
//!
//! - `accounts` - List, create, switch and delete profiles
//! - `unlock` / `logout` / `status` - Session lock
//! - `profile` / `gait` - Runner profile and gait preferences
//! - `rotation` / `cart` / `rsvp` - Per-profile data
//! - `audit` / `dump` / `wipe` / `wipe-all` - Privacy tools

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use second_sole_app::config::AppConfig;
use second_sole_app::{AppError, AppState};

mod commands;

#[derive(Parser)]
#[command(name = "sole")]
#[command(author, version, about = "Second Sole local account store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage local profiles
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },
    /// Unlock the selected profile
    Unlock {
        /// Profile password
        #[arg(short, long, env = "SOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Use the biometric provider instead of a password
        #[arg(short, long)]
        biometric: bool,
    },
    /// Lock the session
    Logout,
    /// Show the selected profile and lock state
    Status,
    /// Show or edit the runner profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show or edit gait preferences
    Gait {
        #[command(subcommand)]
        action: GaitAction,
    },
    /// Track shoe mileage
    Rotation {
        #[command(subcommand)]
        action: RotationAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage event RSVPs
    Rsvp {
        #[command(subcommand)]
        action: RsvpAction,
    },
    /// Show storage usage of the selected profile
    Audit,
    /// Print the stored document as JSON
    Dump,
    /// Delete the selected profile from this device
    Wipe,
    /// Delete every profile from this device
    WipeAll,
}

#[derive(Subcommand)]
enum AccountsAction {
    /// List profiles
    List,
    /// Sign up a new profile
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "SOLE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(short, long)]
        confirm: Option<String>,
    },
    /// Enter as the shared guest profile
    Guest,
    /// Select another profile (requires unlocking)
    Switch {
        /// Profile id
        id: String,
    },
    /// Delete a profile
    Delete {
        /// Profile id
        id: String,
    },
    /// Show the selected profile id
    Current,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Update profile fields
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Total miles run
        #[arg(short, long, value_parser = commands::parse_finite)]
        miles_run: Option<f64>,
    },
}

#[derive(Subcommand)]
enum GaitAction {
    /// Show gait preferences
    Show,
    /// Update gait preferences
    Update(commands::profile::GaitArgs),
}

#[derive(Subcommand)]
enum RotationAction {
    /// List shoes in the rotation
    List,
    /// Add a pair of shoes
    Add {
        /// Catalog shoe id
        #[arg(short, long)]
        shoe_id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        nickname: Option<String>,

        /// Miles already on the pair
        #[arg(short, long, default_value_t = 0.0, value_parser = commands::parse_finite)]
        miles: f64,

        /// Replacement mileage
        #[arg(
            short,
            long,
            default_value_t = commands::rotation::DEFAULT_THRESHOLD,
            value_parser = commands::parse_finite
        )]
        threshold: f64,

        #[arg(long)]
        image: Option<String>,
    },
    /// Log miles on a pair
    Log {
        /// Rotation entry id
        id: String,

        /// Miles to add
        #[arg(value_parser = commands::parse_finite)]
        miles: f64,
    },
    /// Retire a pair
    Remove {
        /// Rotation entry id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add shoes to the cart
    Add {
        /// Catalog shoe id
        shoe_id: String,

        /// US size
        #[arg(short, long, value_parser = commands::parse_finite)]
        size: f64,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Catalog shoe id
        shoe_id: String,

        /// US size
        #[arg(short, long, value_parser = commands::parse_finite)]
        size: f64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum RsvpAction {
    /// List RSVPed events
    List,
    /// RSVP to an event, or check in without one
    Add {
        /// Event id
        event_id: Option<String>,
    },
    /// Cancel an RSVP
    Remove {
        /// Event id
        event_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "second_sole_app=info,second_sole_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let state = AppState::new(AppConfig::from_env()?);

    match cli.command {
        Commands::Accounts { action } => match action {
            AccountsAction::List => commands::accounts::list(&state),
            AccountsAction::Create {
                name,
                email,
                password,
                confirm,
            } => {
                let confirm = SecretString::from(confirm.unwrap_or_else(|| password.clone()));
                commands::accounts::create(&state, &name, &email, &password.into(), &confirm)?;
            }
            AccountsAction::Guest => commands::accounts::guest(&state)?,
            AccountsAction::Switch { id } => commands::accounts::switch(&state, &id)?,
            AccountsAction::Delete { id } => commands::accounts::delete(&state, &id)?,
            AccountsAction::Current => commands::accounts::current(&state),
        },
        Commands::Unlock {
            password,
            biometric,
        } => {
            if biometric {
                commands::session::unlock_with_biometrics(&state).await?;
            } else {
                let password = password.ok_or_else(|| {
                    AppError::BadRequest(
                        "pass --password, set SOLE_PASSWORD or use --biometric".to_owned(),
                    )
                })?;
                commands::session::unlock_with_password(&state, &password.into())?;
            }
        }
        Commands::Logout => commands::session::logout(&state)?,
        Commands::Status => commands::session::status(&state).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&state)?,
            ProfileAction::Update {
                name,
                email,
                miles_run,
            } => commands::profile::update(&state, name, email, miles_run)?,
        },
        Commands::Gait { action } => match action {
            GaitAction::Show => commands::profile::show_gait(&state)?,
            GaitAction::Update(args) => commands::profile::update_gait(&state, args)?,
        },
        Commands::Rotation { action } => match action {
            RotationAction::List => commands::rotation::list(&state)?,
            RotationAction::Add {
                shoe_id,
                name,
                nickname,
                miles,
                threshold,
                image,
            } => commands::rotation::add(
                &state,
                commands::rotation::NewShoe {
                    shoe_id,
                    name,
                    nickname,
                    miles,
                    threshold,
                    image,
                },
            )?,
            RotationAction::Log { id, miles } => commands::rotation::log(&state, &id, miles)?,
            RotationAction::Remove { id } => commands::rotation::remove(&state, &id)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state)?,
            CartAction::Add {
                shoe_id,
                size,
                quantity,
            } => commands::cart::add(&state, &shoe_id, size, quantity)?,
            CartAction::Remove { shoe_id, size } => commands::cart::remove(&state, &shoe_id, size)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Rsvp { action } => match action {
            RsvpAction::List => commands::rsvp::list(&state)?,
            RsvpAction::Add { event_id } => commands::rsvp::add(&state, event_id.as_deref())?,
            RsvpAction::Remove { event_id } => commands::rsvp::remove(&state, &event_id)?,
        },
        Commands::Audit => commands::privacy::audit(&state)?,
        Commands::Dump => commands::privacy::dump(&state)?,
        Commands::Wipe => commands::privacy::wipe(&state)?,
        Commands::WipeAll => commands::privacy::wipe_all(&state)?,
    }
    Ok(())
}
