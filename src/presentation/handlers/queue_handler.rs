use crate::application::services::{BatchPreview, QueueService};
use crate::domain::entities::FormSnapshot;
use crate::presentation::dto::Validate;
use crate::presentation::dto::queue_dto::{DeleteRequest, HistoryRow, SaveBatchResponse, StatusView};
use crate::shared::error::AppError;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct QueueHandler {
    queue_service: Arc<QueueService>,
}

impl QueueHandler {
    pub fn new(queue_service: Arc<QueueService>) -> Self {
        Self { queue_service }
    }

    pub async fn save_from_file(&self, path: &Path) -> Result<SaveBatchResponse, AppError> {
        let form = read_form(path).await?;
        let saved = self.queue_service.save_batch(&form).await?;
        Ok(saved.into())
    }

    pub async fn preview_from_file(&self, path: &Path) -> Result<BatchPreview, AppError> {
        let form = read_form(path).await?;
        Ok(self.queue_service.preview(&form))
    }

    pub async fn status(&self) -> Result<StatusView, AppError> {
        Ok(self.queue_service.status().await?.into())
    }

    pub async fn history(&self) -> Result<Vec<HistoryRow>, AppError> {
        let entries = self.queue_service.history_today().await?;
        Ok(entries.iter().map(HistoryRow::from).collect())
    }

    /// Writes the export file and returns where it went and how many rows it holds.
    pub async fn export(&self, out: Option<&Path>) -> Result<(PathBuf, usize), AppError> {
        let document = self.queue_service.export(Local::now().date_naive()).await?;
        let target = match out {
            Some(path) if path.is_dir() => path.join(&document.file_name),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(&document.file_name),
        };
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&target, document.to_pretty_json()?).await?;
        Ok((target, document.rows.len()))
    }

    pub async fn verify(&self) -> Result<(), AppError> {
        self.queue_service.mark_verified().await.map(|_| ())
    }

    pub async fn clear(&self, confirmed: bool) -> Result<u64, AppError> {
        if !confirmed {
            return Err(AppError::ValidationError(
                "clearing the queue needs explicit confirmation (--yes)".to_string(),
            ));
        }
        self.queue_service.clear_confirmed().await
    }

    pub async fn delete(&self, request: DeleteRequest) -> Result<u64, AppError> {
        request.validate().map_err(AppError::ValidationError)?;
        let keys = request.local_keys().map_err(AppError::ValidationError)?;
        self.queue_service.delete(&keys).await
    }
}

async fn read_form(path: &Path) -> Result<FormSnapshot, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::InvalidInput(format!("{} is not a valid form: {}", path.display(), err))
    })
}
