use crate::application::ports::{SettingsStore, SyncStateStore};
use crate::domain::entities::{SyncSettings, SyncState};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

const SETTINGS_KEY: &str = "lav_cfg";
const STATE_KEY: &str = "ui_state";

const SELECT_SETTING: &str = "SELECT value FROM settings WHERE key = ?1";

const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// Endpoint settings and sync state, each stored as one JSON document in `settings`.
pub struct SqliteSettingsStore {
    pool: ConnectionPool,
}

impl SqliteSettingsStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Missing documents yield the default; unreadable ones too, with a warning.
    async fn load_document<T>(&self, key: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        let value: Option<String> = sqlx::query_scalar(SELECT_SETTING)
            .bind(key)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match value {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(document) => Ok(document),
                Err(err) => {
                    warn!(key, error = %err, "stored settings document is unreadable; using defaults");
                    Ok(T::default())
                }
            },
            None => Ok(T::default()),
        }
    }

    async fn save_document<T: Serialize>(&self, key: &str, document: &T) -> Result<(), AppError> {
        sqlx::query(UPSERT_SETTING)
            .bind(key)
            .bind(serde_json::to_string(document)?)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn load_settings(&self) -> Result<SyncSettings, AppError> {
        self.load_document(SETTINGS_KEY).await
    }

    async fn save_settings(&self, settings: &SyncSettings) -> Result<(), AppError> {
        self.save_document(SETTINGS_KEY, settings).await
    }
}

#[async_trait]
impl SyncStateStore for SqliteSettingsStore {
    async fn load_state(&self) -> Result<SyncState, AppError> {
        self.load_document(STATE_KEY).await
    }

    async fn save_state(&self, state: &SyncState) -> Result<(), AppError> {
        self.save_document(STATE_KEY, state).await
    }
}
