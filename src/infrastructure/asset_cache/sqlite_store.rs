use crate::application::ports::{AssetCacheStore, AssetResponse};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use sqlx::FromRow;

const SELECT_ASSET: &str = r#"
    SELECT status, content_type, body
    FROM asset_cache
    WHERE generation = ?1 AND request_key = ?2
"#;

const UPSERT_ASSET: &str = r#"
    INSERT OR REPLACE INTO asset_cache (generation, request_key, status, content_type, body, stored_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

const SELECT_GENERATIONS: &str = r#"
    SELECT generation FROM asset_cache
    GROUP BY generation
    ORDER BY MIN(stored_at), generation
"#;

const DELETE_GENERATION: &str = "DELETE FROM asset_cache WHERE generation = ?1";

#[derive(Debug, FromRow)]
struct AssetRow {
    status: i64,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl TryFrom<AssetRow> for AssetResponse {
    type Error = AppError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let status = u16::try_from(row.status)
            .map_err(|_| AppError::Database(format!("invalid cached status {}", row.status)))?;
        Ok(AssetResponse {
            status,
            content_type: row.content_type,
            body: Bytes::from(row.body),
        })
    }
}

pub struct SqliteAssetCacheStore {
    pool: ConnectionPool,
}

impl SqliteAssetCacheStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetCacheStore for SqliteAssetCacheStore {
    async fn lookup(&self, generation: &str, key: &str) -> Result<Option<AssetResponse>, AppError> {
        let row = sqlx::query_as::<_, AssetRow>(SELECT_ASSET)
            .bind(generation)
            .bind(key)
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.map(AssetResponse::try_from).transpose()
    }

    async fn put(
        &self,
        generation: &str,
        key: &str,
        response: &AssetResponse,
    ) -> Result<(), AppError> {
        sqlx::query(UPSERT_ASSET)
            .bind(generation)
            .bind(key)
            .bind(i64::from(response.status))
            .bind(response.content_type.as_deref())
            .bind(response.body.as_ref())
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn put_all(
        &self,
        generation: &str,
        entries: &[(String, AssetResponse)],
    ) -> Result<(), AppError> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.get_pool().begin().await?;

        for (key, response) in entries {
            sqlx::query(UPSERT_ASSET)
                .bind(generation)
                .bind(key)
                .bind(i64::from(response.status))
                .bind(response.content_type.as_deref())
                .bind(response.body.as_ref())
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn generations(&self) -> Result<Vec<String>, AppError> {
        let generations = sqlx::query_scalar(SELECT_GENERATIONS)
            .fetch_all(self.pool.get_pool())
            .await?;
        Ok(generations)
    }

    async fn delete_generation(&self, generation: &str) -> Result<u64, AppError> {
        let result = sqlx::query(DELETE_GENERATION)
            .bind(generation)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected())
    }
}
