use crate::application::services::SyncDispatcher;
use crate::presentation::dto::sync_dto::SyncReport;
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct SyncHandler {
    dispatcher: Arc<SyncDispatcher>,
}

impl SyncHandler {
    pub fn new(dispatcher: Arc<SyncDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Dispatches once and waits for background sends before returning.
    pub async fn sync(&self) -> Result<SyncReport, AppError> {
        let result = self.dispatcher.sync_now().await;
        self.dispatcher.settle().await;
        result.map(SyncReport::from)
    }
}
