pub mod queue_handler;
pub mod settings_handler;
pub mod sync_handler;

pub use queue_handler::QueueHandler;
pub use settings_handler::SettingsHandler;
pub use sync_handler::SyncHandler;
