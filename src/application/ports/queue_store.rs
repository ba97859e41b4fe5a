use crate::domain::entities::QueueRecord;
use crate::domain::value_objects::LocalKey;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Append-only local queue. Payloads are opaque; the store assigns keys and timestamps.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// All payloads are stored in one transaction, or none are.
    async fn enqueue(&self, payloads: Vec<Value>) -> Result<Vec<LocalKey>, AppError>;
    /// Oldest first, at most `limit` rows. Nothing is removed.
    async fn dequeue_all(&self, limit: u32) -> Result<Vec<QueueRecord>, AppError>;
    /// Keys that are not present are ignored. Returns how many rows were removed.
    async fn delete_by_keys(&self, keys: &[LocalKey]) -> Result<u64, AppError>;
    async fn clear(&self) -> Result<u64, AppError>;
    async fn count(&self) -> Result<u64, AppError>;
}
