use crate::application::ports::{AssetCacheStore, AssetFetcher, AssetRequest, AssetResponse};
use crate::shared::config::AssetCacheConfig;
use crate::shared::error::AppError;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

const ROOT_DOCUMENT: &str = "./index.html";

/// Versioned list of the assets the shell needs to start offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    pub version: String,
    pub assets: Vec<String>,
}

impl From<&AssetCacheConfig> for CacheManifest {
    fn from(config: &AssetCacheConfig) -> Self {
        Self {
            version: config.version.clone(),
            assets: config.assets.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    Served(AssetResponse),
    /// Not handled by the cache; the caller forwards the request as-is.
    Bypassed,
}

/// Turns `./css/style.css`, `css/style.css` and `/css/style.css` into the same key.
pub fn request_key(path: &str) -> String {
    let trimmed = path.trim();
    let without_dot = trimmed.strip_prefix("./").unwrap_or(trimmed);
    if without_dot == "." || without_dot.is_empty() {
        return "/".to_string();
    }
    if without_dot.starts_with('/') {
        without_dot.to_string()
    } else {
        format!("/{}", without_dot)
    }
}

pub struct AssetCacheService {
    store: Arc<dyn AssetCacheStore>,
    fetcher: Arc<dyn AssetFetcher>,
    manifest: CacheManifest,
    /// Generation requests are answered from. Starts as the manifest version.
    active: RwLock<String>,
}

impl AssetCacheService {
    pub fn new(
        store: Arc<dyn AssetCacheStore>,
        fetcher: Arc<dyn AssetFetcher>,
        manifest: CacheManifest,
    ) -> Self {
        let active = RwLock::new(manifest.version.clone());
        Self {
            store,
            fetcher,
            manifest,
            active,
        }
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn active_generation(&self) -> String {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_active(&self, generation: &str) {
        match self.active.write() {
            Ok(mut guard) => *guard = generation.to_string(),
            Err(poisoned) => *poisoned.into_inner() = generation.to_string(),
        }
    }

    /// Fetches every manifest asset and stores them together. One failure stores nothing.
    pub async fn install(&self) -> Result<usize, AppError> {
        let mut entries = Vec::with_capacity(self.manifest.assets.len());
        for asset in &self.manifest.assets {
            let key = request_key(asset);
            let response = self.fetcher.fetch(&AssetRequest::get(&key)).await?;
            if !response.is_ok() {
                return Err(AppError::Network(format!(
                    "asset {} answered with status {}",
                    key, response.status
                )));
            }
            entries.push((key, response));
        }

        self.store.put_all(&self.manifest.version, &entries).await?;
        info!(
            version = %self.manifest.version,
            assets = entries.len(),
            "asset cache installed"
        );
        Ok(entries.len())
    }

    /// Keeps answering from the newest stored generation after a failed install.
    /// Returns `None` when nothing older is stored.
    pub async fn resume_previous(&self) -> Result<Option<String>, AppError> {
        let previous = self
            .store
            .generations()
            .await?
            .into_iter()
            .filter(|generation| *generation != self.manifest.version)
            .last();
        if let Some(generation) = &previous {
            self.set_active(generation);
            info!(generation = %generation, "serving previous asset cache generation");
        }
        Ok(previous)
    }

    /// Makes the current version active and drops every other generation. Run only after
    /// a successful `install`.
    pub async fn activate(&self) -> Result<Vec<String>, AppError> {
        self.set_active(&self.manifest.version);
        let mut removed = Vec::new();
        for generation in self.store.generations().await? {
            if generation == self.manifest.version {
                continue;
            }
            self.store.delete_generation(&generation).await?;
            removed.push(generation);
        }
        if !removed.is_empty() {
            info!(removed = ?removed, "stale asset cache generations deleted");
        }
        Ok(removed)
    }

    pub async fn respond(&self, request: &AssetRequest) -> Result<Interception, AppError> {
        if !request.is_get() {
            return Ok(Interception::Bypassed);
        }

        let generation = &self.active_generation();
        let key = request_key(&request.path);
        if let Some(cached) = self.store.lookup(generation, &key).await? {
            debug!(key = %key, "served from asset cache");
            return Ok(Interception::Served(cached));
        }

        match self.fetcher.fetch(request).await {
            Ok(fresh) => {
                if fresh.is_ok() {
                    if let Err(err) = self.store.put(generation, &key, &fresh).await {
                        warn!(key = %key, error = %err, "failed to cache fresh response");
                    }
                }
                Ok(Interception::Served(fresh))
            }
            Err(err) => {
                warn!(key = %key, error = %err, "network unreachable; falling back to root document");
                match self.store.lookup(generation, &request_key(ROOT_DOCUMENT)).await? {
                    Some(root) => Ok(Interception::Served(root)),
                    None => Err(err),
                }
            }
        }
    }

    /// Sends a bypassed request straight to the network.
    pub async fn forward(&self, request: &AssetRequest) -> Result<AssetResponse, AppError> {
        self.fetcher.fetch(request).await
    }
}
