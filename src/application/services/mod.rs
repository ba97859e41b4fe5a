pub mod asset_cache_service;
pub mod queue_service;
pub mod record_builder;
pub mod sync_dispatcher;

pub use asset_cache_service::{AssetCacheService, CacheManifest, Interception};
pub use queue_service::{
    BatchPreview, ExportDocument, HistoryEntry, QueueService, QueueStatus, SavedBatch,
};
pub use record_builder::{BatchRejection, BatchStamp};
pub use sync_dispatcher::{SyncDispatcher, SyncOutcome};
