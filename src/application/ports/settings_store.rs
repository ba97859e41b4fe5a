use crate::domain::entities::{SyncSettings, SyncState};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> Result<SyncSettings, AppError>;
    async fn save_settings(&self, settings: &SyncSettings) -> Result<(), AppError>;
}

/// Persistence of the verification flags, kept behind this interface so nothing
/// reads or writes them as ambient globals.
#[async_trait]
pub trait SyncStateStore: Send + Sync {
    async fn load_state(&self) -> Result<SyncState, AppError>;
    async fn save_state(&self, state: &SyncState) -> Result<(), AppError>;
}
