use crate::domain::entities::QueueRecord;
use crate::domain::value_objects::LocalKey;
use crate::shared::error::AppError;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct QueueRow {
    pub local_key: i64,
    pub created_at: i64,
    pub payload: String,
}

impl TryFrom<QueueRow> for QueueRecord {
    type Error = AppError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let local_key = LocalKey::new(row.local_key).map_err(AppError::Database)?;
        let payload = serde_json::from_str(&row.payload)?;
        Ok(QueueRecord::new(local_key, row.created_at, payload))
    }
}
