use crate::application::ports::{SyncTransport, TransportOutcome, SYNC_CONTENT_TYPE};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Awaited POST. Any HTTP response counts as sent; its status and body are never read.
pub struct OpaquePostTransport {
    client: reqwest::Client,
}

impl OpaquePostTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SyncTransport for OpaquePostTransport {
    fn name(&self) -> &'static str {
        "opaque-post"
    }

    async fn send(&self, endpoint: &str, body: &str) -> TransportOutcome {
        let result = self
            .client
            .post(endpoint.trim())
            .header(CONTENT_TYPE, SYNC_CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .await;

        match result {
            Ok(_) => TransportOutcome::DeliveredUnconfirmed,
            Err(err) => TransportOutcome::Failed(err.to_string()),
        }
    }
}
