use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_RELATIVE_DB_PATH: &str = "lavanderia/lavanderia.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub asset_cache: AssetCacheConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Rows read from the queue for one sync request.
    pub batch_limit: u32,
    pub export_limit: u32,
    pub history_limit: u32,
    pub history_display: usize,
    /// Largest body the beacon transport accepts before deferring to the next transport.
    pub beacon_max_bytes: usize,
    /// How long the beacon waits for its request to fail before reporting it as sent.
    pub beacon_handoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCacheConfig {
    pub version: String,
    pub assets: Vec<String>,
    /// Origin the shell assets are fetched from. `serve` refuses to start without it.
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: 5,
            },
            sync: SyncConfig::default(),
            asset_cache: AssetCacheConfig::default(),
            server: ServerConfig {
                bind: "127.0.0.1:8088".to_string(),
            },
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_limit: 500,
            export_limit: 2000,
            history_limit: 80,
            history_display: 20,
            beacon_max_bytes: 64 * 1024,
            beacon_handoff_ms: 1500,
        }
    }
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            version: "lavanderia-pwa-v6".to_string(),
            assets: [
                "./",
                "./index.html",
                "./css/style.css",
                "./js/app.js",
                "./js/db.js",
                "./manifest.json",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("LAVANDERIA_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v.trim().to_string();
            }
        }
        if let Some(value) = lookup("LAVANDERIA_DB_MAX_CONNECTIONS").and_then(|v| parse_u32(&v)) {
            cfg.database.max_connections = value;
        }
        if let Some(value) = lookup("LAVANDERIA_SYNC_BATCH_LIMIT").and_then(|v| parse_u32(&v)) {
            cfg.sync.batch_limit = value;
        }
        if let Some(value) = lookup("LAVANDERIA_EXPORT_LIMIT").and_then(|v| parse_u32(&v)) {
            cfg.sync.export_limit = value;
        }
        if let Some(value) = lookup("LAVANDERIA_BEACON_MAX_BYTES").and_then(|v| parse_usize(&v)) {
            cfg.sync.beacon_max_bytes = value;
        }
        if let Some(value) = lookup("LAVANDERIA_BEACON_HANDOFF_MS").and_then(|v| parse_u64(&v)) {
            cfg.sync.beacon_handoff_ms = value;
        }
        if let Some(v) = lookup("LAVANDERIA_ASSET_CACHE_VERSION") {
            if !v.trim().is_empty() {
                cfg.asset_cache.version = v.trim().to_string();
            }
        }
        if let Some(v) = lookup("LAVANDERIA_ASSET_ORIGIN") {
            let origin = v.trim().trim_end_matches('/').to_string();
            cfg.asset_cache.origin = if origin.is_empty() { None } else { Some(origin) };
        }
        if let Some(v) = lookup("LAVANDERIA_BIND") {
            if !v.trim().is_empty() {
                cfg.server.bind = v.trim().to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.batch_limit == 0 {
            return Err("Sync batch_limit must be greater than 0".to_string());
        }
        if self.sync.export_limit == 0 {
            return Err("Sync export_limit must be greater than 0".to_string());
        }
        if self.asset_cache.version.trim().is_empty() {
            return Err("Asset cache version cannot be empty".to_string());
        }
        Ok(())
    }
}

pub fn default_database_url() -> String {
    let path = dirs::data_dir()
        .map(|base| base.join(DEFAULT_RELATIVE_DB_PATH))
        .unwrap_or_else(|| PathBuf::from("./data/lavanderia.db"));
    format!("sqlite://{}?mode=rwc", path.display())
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
