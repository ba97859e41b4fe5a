use super::record_builder::{self, BatchStamp};
use crate::application::ports::{QueueStore, SyncStateStore};
use crate::domain::entities::{FormSnapshot, FormTotals, QueueRecord, SyncState};
use crate::domain::value_objects::LocalKey;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBatch {
    pub batch_id: String,
    pub keys: Vec<LocalKey>,
}

impl SavedBatch {
    pub fn rows(&self) -> usize {
        self.keys.len()
    }
}

/// Live totals for a form plus whether it would be accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPreview {
    pub totals: FormTotals,
    pub rows: usize,
    pub rejection: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    /// `None` when the count could not be read.
    pub queued: Option<u64>,
    pub last_sent_at: Option<i64>,
    pub pending_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub local_key: LocalKey,
    pub created_at: Option<i64>,
    pub kind: String,
    pub category: String,
    pub detail: String,
    pub units: String,
    pub net_kg: String,
}

impl HistoryEntry {
    fn from_record(record: &QueueRecord) -> Self {
        let payload = &record.payload;
        Self {
            local_key: record.local_key,
            created_at: payload_created_at(payload),
            kind: wire_text(payload, "evento"),
            category: wire_text(payload, "categoria"),
            detail: wire_text(payload, "detalle"),
            units: wire_text(payload, "unidades"),
            net_kg: wire_text(payload, "kg_neto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub file_name: String,
    pub rows: Vec<Value>,
}

impl ExportDocument {
    pub fn to_pretty_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("lavanderia_queue_{}.json", date.format("%Y-%m-%d"))
}

fn payload_created_at(payload: &Value) -> Option<i64> {
    payload.get("createdAt").and_then(Value::as_i64)
}

fn wire_text(payload: &Value, field: &str) -> String {
    match payload.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn local_date(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local).date_naive())
}

/// Operator-facing operations on the local queue and its verification flags.
pub struct QueueService {
    queue: Arc<dyn QueueStore>,
    state: Arc<dyn SyncStateStore>,
    config: SyncConfig,
}

impl QueueService {
    pub fn new(
        queue: Arc<dyn QueueStore>,
        state: Arc<dyn SyncStateStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            queue,
            state,
            config,
        }
    }

    pub async fn save_batch(&self, form: &FormSnapshot) -> Result<SavedBatch, AppError> {
        self.save_batch_stamped(form, BatchStamp::now()).await
    }

    pub async fn save_batch_stamped(
        &self,
        form: &FormSnapshot,
        stamp: BatchStamp,
    ) -> Result<SavedBatch, AppError> {
        let payloads = record_builder::build(form, stamp)
            .map_err(|rejection| AppError::ValidationError(rejection.to_string()))?;
        let batch_id = stamp.batch_id.to_string();

        if payloads.is_empty() {
            info!(batch_id = %batch_id, "form produced no rows; nothing queued");
            return Ok(SavedBatch {
                batch_id,
                keys: Vec::new(),
            });
        }

        let values = payloads
            .iter()
            .map(|payload| payload.to_value())
            .collect::<Result<Vec<_>, _>>()?;
        let keys = self.queue.enqueue(values).await?;

        info!(batch_id = %batch_id, rows = keys.len(), "batch queued");
        Ok(SavedBatch { batch_id, keys })
    }

    pub fn preview(&self, form: &FormSnapshot) -> BatchPreview {
        let totals = form.totals();
        match record_builder::build(form, BatchStamp::now()) {
            Ok(rows) => BatchPreview {
                totals,
                rows: rows.len(),
                rejection: None,
            },
            Err(rejection) => BatchPreview {
                totals,
                rows: 0,
                rejection: Some(rejection.to_string()),
            },
        }
    }

    pub async fn status(&self) -> Result<QueueStatus, AppError> {
        let queued = match self.queue.count().await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!(error = %err, "failed to count queued rows");
                None
            }
        };
        let state = self.state.load_state().await?;

        Ok(QueueStatus {
            queued,
            last_sent_at: state.last_sent_at,
            pending_verify: state.pending_verify,
        })
    }

    /// Rows created on `today` (local calendar), newest first.
    pub async fn history(&self, today: NaiveDate) -> Result<Vec<HistoryEntry>, AppError> {
        let records = self.queue.dequeue_all(self.config.history_limit).await?;
        let mut entries: Vec<HistoryEntry> = records
            .iter()
            .filter(|record| {
                // Rows without a usable timestamp stay visible.
                match payload_created_at(&record.payload).and_then(local_date) {
                    Some(day) => day == today,
                    None => true,
                }
            })
            .map(HistoryEntry::from_record)
            .collect();

        entries.reverse();
        entries.truncate(self.config.history_display);
        Ok(entries)
    }

    pub async fn history_today(&self) -> Result<Vec<HistoryEntry>, AppError> {
        self.history(Local::now().date_naive()).await
    }

    /// Snapshot of the oldest queued payloads. The queue is left as it is.
    pub async fn export(&self, today: NaiveDate) -> Result<ExportDocument, AppError> {
        let records = self.queue.dequeue_all(self.config.export_limit).await?;
        Ok(ExportDocument {
            file_name: export_file_name(today),
            rows: records.into_iter().map(|record| record.payload).collect(),
        })
    }

    pub async fn mark_verified(&self) -> Result<SyncState, AppError> {
        let mut state = self.state.load_state().await?;
        state.mark_verified();
        self.state.save_state(&state).await?;
        info!("last send marked as verified");
        Ok(state)
    }

    /// Empties the queue after the operator confirmed the data reached its destination.
    pub async fn clear_confirmed(&self) -> Result<u64, AppError> {
        let removed = self.queue.clear().await?;
        let mut state = self.state.load_state().await?;
        state.mark_verified();
        self.state.save_state(&state).await?;
        info!(removed, "queue cleared");
        Ok(removed)
    }

    pub async fn delete(&self, keys: &[LocalKey]) -> Result<u64, AppError> {
        let removed = self.queue.delete_by_keys(keys).await?;
        info!(requested = keys.len(), removed, "queue rows deleted");
        Ok(removed)
    }
}
