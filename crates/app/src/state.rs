//! Application state shared by front-ends.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{FileStore, open_file_store};
use crate::services::accounts::AccountStore;
use crate::services::auth::AuthService;
use crate::services::biometric::SimulatedBiometrics;

/// Application state.
///
/// Cheaply cloneable via `Arc`; owns the configured account store and
/// biometric provider.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: AccountStore<FileStore>,
    biometrics: SimulatedBiometrics,
}

impl AppState {
    /// Create application state from configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let store = AccountStore::with_key(open_file_store(&config), config.storage_key.clone());
        let biometrics = SimulatedBiometrics::new(config.biometry);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                biometrics,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn store(&self) -> &AccountStore<FileStore> {
        &self.inner.store
    }

    /// Get a reference to the biometric provider.
    #[must_use]
    pub fn biometrics(&self) -> &SimulatedBiometrics {
        &self.inner.biometrics
    }

    /// Auth flows over the configured store and provider.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_, FileStore, SimulatedBiometrics> {
        AuthService::new(&self.inner.store, &self.inner.biometrics)
    }
}
