pub mod asset_cache;
pub mod database;
pub mod queue;
pub mod settings;
pub mod transport;
