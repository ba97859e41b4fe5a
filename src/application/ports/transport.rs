use async_trait::async_trait;
use std::fmt;

/// Result of handing a sync body to one delivery mechanism.
///
/// None of the variants means the remote party stored the rows: the best case is
/// that the bytes left this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    DeliveredUnconfirmed,
    NotAttempted(String),
    Failed(String),
}

impl fmt::Display for TransportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportOutcome::DeliveredUnconfirmed => write!(f, "delivered (unconfirmed)"),
            TransportOutcome::NotAttempted(reason) => write!(f, "not attempted: {}", reason),
            TransportOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

pub const SYNC_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

#[async_trait]
pub trait SyncTransport: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, endpoint: &str, body: &str) -> TransportOutcome;
    /// Waits for sends that were handed off in the background. No-op by default.
    async fn settle(&self) {}
}
