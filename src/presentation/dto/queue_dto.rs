use super::Validate;
use crate::application::services::{HistoryEntry, QueueStatus, SavedBatch};
use crate::domain::value_objects::LocalKey;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

pub const VERIFICATION_PENDING: &str = "Pendiente";
pub const VERIFICATION_OK: &str = "OK";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBatchResponse {
    pub batch_id: String,
    pub rows: usize,
    pub keys: Vec<i64>,
}

impl From<SavedBatch> for SaveBatchResponse {
    fn from(saved: SavedBatch) -> Self {
        Self {
            rows: saved.rows(),
            keys: saved.keys.iter().map(LocalKey::value).collect(),
            batch_id: saved.batch_id,
        }
    }
}

fn format_local(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|utc| {
        utc.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}

/// Queue summary as printed by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub queued: String,
    pub last_sent: String,
    pub verification: String,
}

impl StatusView {
    pub fn needs_verification(&self) -> bool {
        self.verification == VERIFICATION_PENDING
    }
}

impl From<QueueStatus> for StatusView {
    fn from(status: QueueStatus) -> Self {
        Self {
            queued: status
                .queued
                .map(|count| count.to_string())
                .unwrap_or_else(|| "?".to_string()),
            last_sent: status
                .last_sent_at
                .and_then(format_local)
                .unwrap_or_else(|| "-".to_string()),
            verification: if status.pending_verify {
                VERIFICATION_PENDING.to_string()
            } else {
                VERIFICATION_OK.to_string()
            },
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queued rows:   {}", self.queued)?;
        writeln!(f, "Last sent:     {}", self.last_sent)?;
        write!(f, "Verification:  {}", self.verification)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub key: i64,
    pub time: String,
    pub kind: String,
    pub label: String,
    pub amount: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let label = match (entry.category.is_empty(), entry.detail.is_empty()) {
            (false, false) => format!("{} {}", entry.category, entry.detail),
            (false, true) => entry.category.clone(),
            _ => entry.detail.clone(),
        };
        let amount = if !entry.net_kg.is_empty() {
            format!("{} kg", entry.net_kg)
        } else if !entry.units.is_empty() {
            format!("{} u", entry.units)
        } else {
            String::new()
        };
        let time = entry
            .created_at
            .and_then(DateTime::from_timestamp_millis)
            .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_default();

        Self {
            key: entry.local_key.value(),
            time,
            kind: entry.kind.clone(),
            label,
            amount,
        }
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<5} {:<5} {:<16} {:<24} {}",
            self.key, self.time, self.kind, self.label, self.amount
        )
    }
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub keys: Vec<String>,
}

impl DeleteRequest {
    pub fn local_keys(&self) -> Result<Vec<LocalKey>, String> {
        self.keys.iter().map(|key| key.parse::<LocalKey>()).collect()
    }
}

impl Validate for DeleteRequest {
    fn validate(&self) -> Result<(), String> {
        if self.keys.is_empty() {
            return Err("at least one key is required".to_string());
        }
        self.local_keys().map(|_| ())
    }
}
