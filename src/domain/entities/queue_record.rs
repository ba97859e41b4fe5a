use crate::domain::value_objects::LocalKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted row of the local queue. `payload` is opaque to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub local_key: LocalKey,
    pub created_at: i64,
    pub payload: Value,
}

impl QueueRecord {
    pub fn new(local_key: LocalKey, created_at: i64, payload: Value) -> Self {
        Self {
            local_key,
            created_at,
            payload,
        }
    }
}
