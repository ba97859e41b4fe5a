use crate::application::ports::{QueueStore, SettingsStore, SyncStateStore};
use crate::application::services::{
    AssetCacheService, CacheManifest, QueueService, SyncDispatcher,
};
use crate::infrastructure::asset_cache::{HttpAssetFetcher, SqliteAssetCacheStore};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::queue::SqliteQueueStore;
use crate::infrastructure::settings::SqliteSettingsStore;
use crate::infrastructure::transport;
use crate::presentation::handlers::{QueueHandler, SettingsHandler, SyncHandler};
use crate::shared::config::AppConfig;
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

/// Wires stores, services and handlers around one database pool.
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub queue_handler: Arc<QueueHandler>,
    pub sync_handler: Arc<SyncHandler>,
    pub settings_handler: Arc<SettingsHandler>,
    http_client: reqwest::Client,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow!(e))?;

        let pool = ConnectionPool::new(&config.database.url, config.database.max_connections)
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;
        pool.migrate()
            .await
            .context("failed to run database migrations")?;

        let http_client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::from_parts(config, pool, http_client))
    }

    pub fn from_parts(
        config: AppConfig,
        pool: ConnectionPool,
        http_client: reqwest::Client,
    ) -> Self {
        let queue_store: Arc<dyn QueueStore> = Arc::new(SqliteQueueStore::new(pool.clone()));
        let settings_store = Arc::new(SqliteSettingsStore::new(pool.clone()));
        let settings: Arc<dyn SettingsStore> = settings_store.clone();
        let state: Arc<dyn SyncStateStore> = settings_store;

        let queue_service = Arc::new(QueueService::new(
            Arc::clone(&queue_store),
            Arc::clone(&state),
            config.sync.clone(),
        ));
        let dispatcher = Arc::new(SyncDispatcher::new(
            queue_store,
            Arc::clone(&settings),
            state,
            transport::default_chain(http_client.clone(), &config.sync),
            config.sync.batch_limit,
        ));

        Self {
            queue_handler: Arc::new(QueueHandler::new(queue_service)),
            sync_handler: Arc::new(SyncHandler::new(dispatcher)),
            settings_handler: Arc::new(SettingsHandler::new(settings)),
            config,
            pool,
            http_client,
        }
    }

    /// Offline shell service; needs the origin the assets are published on.
    pub fn asset_cache_service(&self) -> Result<Arc<AssetCacheService>> {
        let origin = self.config.asset_cache.origin.as_deref().ok_or_else(|| {
            anyhow!("asset origin is not configured (LAVANDERIA_ASSET_ORIGIN or --origin)")
        })?;

        Ok(Arc::new(AssetCacheService::new(
            Arc::new(SqliteAssetCacheStore::new(self.pool.clone())),
            Arc::new(HttpAssetFetcher::new(self.http_client.clone(), origin)),
            CacheManifest::from(&self.config.asset_cache),
        )))
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}
