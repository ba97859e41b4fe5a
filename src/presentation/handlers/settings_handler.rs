use crate::application::ports::SettingsStore;
use crate::domain::entities::SyncSettings;
use crate::presentation::dto::Validate;
use crate::presentation::dto::sync_dto::{SettingsView, UpdateSettingsRequest};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

pub struct SettingsHandler {
    settings: Arc<dyn SettingsStore>,
}

impl SettingsHandler {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    pub async fn show(&self) -> Result<SettingsView, AppError> {
        let settings = self.settings.load_settings().await?;
        Ok(SettingsView::from(&settings))
    }

    /// Fields left out of the request keep their stored value.
    pub async fn update(&self, request: UpdateSettingsRequest) -> Result<SettingsView, AppError> {
        request.validate().map_err(AppError::ValidationError)?;

        let current = self.settings.load_settings().await?;
        let updated = SyncSettings::new(
            request.url.as_deref().unwrap_or(&current.endpoint_url),
            request.token.as_deref().unwrap_or(&current.token),
        );
        self.settings.save_settings(&updated).await?;
        info!(url = %updated.endpoint_url, "sync settings updated");

        Ok(SettingsView::from(&updated))
    }
}
