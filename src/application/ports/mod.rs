pub mod asset_cache;
pub mod queue_store;
pub mod settings_store;
pub mod transport;

pub use asset_cache::{AssetCacheStore, AssetFetcher, AssetRequest, AssetResponse};
pub use queue_store::QueueStore;
pub use settings_store::{SettingsStore, SyncStateStore};
pub use transport::{SyncTransport, TransportOutcome, SYNC_CONTENT_TYPE};
