use super::queries::{
    COUNT_QUEUE_ROWS, DELETE_ALL_QUEUE_ROWS, DELETE_QUEUE_ROW, INSERT_QUEUE_ROW,
    SELECT_OLDEST_QUEUE_ROWS,
};
use super::rows::QueueRow;
use crate::application::ports::QueueStore;
use crate::domain::entities::QueueRecord;
use crate::domain::value_objects::LocalKey;
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::Row;
use tracing::debug;

/// `queue` table with AUTOINCREMENT keys, so a key is never handed out twice even after
/// rows are deleted.
pub struct SqliteQueueStore {
    pool: ConnectionPool,
}

impl SqliteQueueStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn enqueue(&self, payloads: Vec<Value>) -> Result<Vec<LocalKey>, AppError> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.get_pool().begin().await?;
        let mut keys = Vec::with_capacity(payloads.len());

        for payload in &payloads {
            let result = sqlx::query(INSERT_QUEUE_ROW)
                .bind(now)
                .bind(serde_json::to_string(payload)?)
                .execute(&mut *tx)
                .await?;
            keys.push(LocalKey::new(result.last_insert_rowid()).map_err(AppError::Database)?);
        }

        tx.commit().await?;
        debug!(rows = keys.len(), "queue rows inserted");
        Ok(keys)
    }

    async fn dequeue_all(&self, limit: u32) -> Result<Vec<QueueRecord>, AppError> {
        let rows = sqlx::query_as::<_, QueueRow>(SELECT_OLDEST_QUEUE_ROWS)
            .bind(i64::from(limit))
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(QueueRecord::try_from).collect()
    }

    async fn delete_by_keys(&self, keys: &[LocalKey]) -> Result<u64, AppError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.get_pool().begin().await?;
        let mut removed = 0;
        for key in keys {
            removed += sqlx::query(DELETE_QUEUE_ROW)
                .bind(key.value())
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        Ok(removed)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query(DELETE_ALL_QUEUE_ROWS)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query(COUNT_QUEUE_ROWS)
            .fetch_one(self.pool.get_pool())
            .await?
            .try_get("count")?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_store() -> SqliteQueueStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        SqliteQueueStore::new(pool)
    }

    fn keys(values: &[i64]) -> Vec<LocalKey> {
        values.iter().map(|v| LocalKey::new(*v).unwrap()).collect()
    }

    #[tokio::test]
    async fn enqueue_assigns_increasing_keys_and_keeps_order() {
        let store = setup_store().await;

        let assigned = store
            .enqueue(vec![json!({ "id": "a:1" }), json!({ "id": "a:2" })])
            .await
            .unwrap();
        assert_eq!(assigned, keys(&[1, 2]));

        let records = store.dequeue_all(500).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload, json!({ "id": "a:1" }));
        assert_eq!(records[1].payload, json!({ "id": "a:2" }));
        assert_eq!(records[0].created_at, records[1].created_at);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn count_tracks_every_enqueued_payload() {
        let store = setup_store().await;
        let mut expected = 0;
        for size in [3usize, 0, 1, 7, 2] {
            let payloads = (0..size).map(|i| json!({ "i": i })).collect();
            store.enqueue(payloads).await.unwrap();
            expected += size as u64;

            store.dequeue_all(2).await.unwrap();
            assert_eq!(store.count().await.unwrap(), expected);
        }
        assert_eq!(store.count().await.unwrap(), 13);
    }

    #[tokio::test]
    async fn dequeue_respects_limit_and_does_not_remove() {
        let store = setup_store().await;
        let payloads = (1..=5).map(|i| json!({ "n": i })).collect();
        store.enqueue(payloads).await.unwrap();

        let first = store.dequeue_all(3).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].payload["n"], 1);
        assert_eq!(first[2].payload["n"], 3);
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn empty_enqueue_is_a_no_op() {
        let store = setup_store().await;
        assert!(store.enqueue(Vec::new()).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_whole_batch() {
        let store = setup_store().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_poison BEFORE INSERT ON queue
            WHEN NEW.payload LIKE '%poison%'
            BEGIN
                SELECT RAISE(ABORT, 'poison row');
            END
            "#,
        )
        .execute(store.pool.get_pool())
        .await
        .unwrap();

        let result = store
            .enqueue(vec![
                json!({ "id": "b:1" }),
                json!({ "id": "b:2" }),
                json!({ "id": "poison" }),
            ])
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_ignores_unknown_keys() {
        let store = setup_store().await;
        store
            .enqueue(vec![json!({ "n": 1 }), json!({ "n": 2 }), json!({ "n": 3 })])
            .await
            .unwrap();

        let removed = store.delete_by_keys(&keys(&[2, 42])).await.unwrap();
        assert_eq!(removed, 1);

        let remaining: Vec<i64> = store
            .dequeue_all(10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.local_key.value())
            .collect();
        assert_eq!(remaining, vec![1, 3]);
        assert_eq!(store.delete_by_keys(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn keys_are_not_reused_after_clear() {
        let store = setup_store().await;
        store
            .enqueue(vec![json!({ "n": 1 }), json!({ "n": 2 })])
            .await
            .unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);

        let assigned = store.enqueue(vec![json!({ "n": 3 })]).await.unwrap();
        assert_eq!(assigned, keys(&[3]));
    }
}
