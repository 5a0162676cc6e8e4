//! Application state shared across handlers.

use docket_core::config::AppConfig;
use docket_metadata::{FileRepository, FileStore, NameKey};
use docket_staging::StagingArea;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Lifecycle repository (store + cache).
    pub repo: Arc<FileRepository>,
    /// Staging area for uploaded bytes.
    pub staging: Arc<StagingArea>,
    /// Raw store handle, used by the health check only.
    pub store: Arc<dyn FileStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repo: Arc<FileRepository>,
        staging: Arc<StagingArea>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repo,
            staging,
            store,
        }
    }

    /// Derive the name-field key for one request. Request-scoped: derived
    /// here, passed down by reference, dropped with the request.
    pub fn name_key(&self) -> NameKey {
        NameKey::derive(&self.config.encryption.secret)
    }
}
