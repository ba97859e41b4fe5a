pub mod http_fetcher;
pub mod sqlite_store;

pub use http_fetcher::HttpAssetFetcher;
pub use sqlite_store::SqliteAssetCacheStore;
