pub mod beacon;
pub mod opaque_post;

pub use beacon::BeaconTransport;
pub use opaque_post::OpaquePostTransport;

use crate::application::ports::SyncTransport;
use crate::shared::config::SyncConfig;
use std::sync::Arc;
use std::time::Duration;

/// Beacon first, then the awaited POST.
pub fn default_chain(
    client: reqwest::Client,
    config: &SyncConfig,
) -> Vec<Arc<dyn SyncTransport>> {
    let beacon = BeaconTransport::new(client.clone(), config.beacon_max_bytes)
        .with_handoff(Duration::from_millis(config.beacon_handoff_ms));
    let post = OpaquePostTransport::new(client);
    vec![
        Arc::new(beacon) as Arc<dyn SyncTransport>,
        Arc::new(post) as Arc<dyn SyncTransport>,
    ]
}
