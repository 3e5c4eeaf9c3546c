//! Integration tests for Second Sole.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p second-sole-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `account_store` - Store operations against the file backend
//! - `auth_flow` - Sign-up and unlock flows through `AppState`
//! - `file_backend` - On-disk document format and recovery

use std::path::Path;

use tempfile::TempDir;

use second_sole_app::AppState;
use second_sole_app::config::{AppConfig, DEFAULT_STORAGE_KEY};
use second_sole_core::BiometryKind;

/// App state over a throwaway data directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub state: AppState,
    dir: TempDir,
}

impl TestContext {
    /// Create a context with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Self::with_biometry(BiometryKind::None)
    }

    /// Create a context whose simulated provider reports `biometry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn with_biometry(biometry: BiometryKind) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let state = AppState::new(AppConfig {
            data_dir: dir.path().to_path_buf(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            biometry,
        });
        Ok(Self { state, dir })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn document_path(&self) -> std::path::PathBuf {
        self.dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json"))
    }

    /// Raw persisted document, if written.
    #[must_use]
    pub fn raw_document(&self) -> Option<String> {
        std::fs::read_to_string(self.document_path()).ok()
    }
}
