//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SOLE_DATA_DIR` - Directory holding the persisted document (default: `.second-sole`)
//! - `SOLE_STORAGE_KEY` - Key the document is stored under (default: `second_sole_v2_data`)
//! - `SOLE_BIOMETRY` - Biometry kind reported by the simulated provider (default: `none`)

use std::path::PathBuf;

use second_sole_core::BiometryKind;
use thiserror::Error;

use crate::db::is_key_char;

/// Key the whole account document is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "second_sole_v2_data";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".second-sole";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// Key of the persisted account document
    pub storage_key: String,
    /// Biometry kind the simulated provider reports
    pub biometry: BiometryKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            biometry: BiometryKind::None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("SOLE_DATA_DIR", DEFAULT_DATA_DIR));

        let storage_key = get_env_or_default("SOLE_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key, "SOLE_STORAGE_KEY")?;

        let biometry = get_optional_env("SOLE_BIOMETRY")
            .map(|raw| {
                raw.parse::<BiometryKind>()
                    .map_err(|e| ConfigError::InvalidEnvVar("SOLE_BIOMETRY".to_owned(), e))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            storage_key,
            biometry,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Storage keys become file names, so only a conservative alphabet is allowed.
fn validate_storage_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_owned(),
            "must not be empty".to_owned(),
        ));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !is_key_char(*c))
    {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_owned(),
            format!("contains unsupported character '{bad}'"),
        ));
    }
    Ok(())
}
