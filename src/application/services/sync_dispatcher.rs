use crate::application::ports::{
    QueueStore, SettingsStore, SyncStateStore, SyncTransport, TransportOutcome,
};
use crate::shared::error::AppError;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingToSend,
    /// Rows left this process through `transport`. Receipt is not confirmed.
    Sent { rows: usize, transport: &'static str },
}

#[derive(Serialize)]
struct SyncBody<'a> {
    token: &'a str,
    rows: Vec<Value>,
}

/// Pushes the oldest queued rows to the collection endpoint, one transport after another.
///
/// The queue is never modified here: rows stay until the operator confirms receipt and
/// clears them.
pub struct SyncDispatcher {
    queue: Arc<dyn QueueStore>,
    settings: Arc<dyn SettingsStore>,
    state: Arc<dyn SyncStateStore>,
    transports: Vec<Arc<dyn SyncTransport>>,
    batch_limit: u32,
}

impl SyncDispatcher {
    pub fn new(
        queue: Arc<dyn QueueStore>,
        settings: Arc<dyn SettingsStore>,
        state: Arc<dyn SyncStateStore>,
        transports: Vec<Arc<dyn SyncTransport>>,
        batch_limit: u32,
    ) -> Self {
        Self {
            queue,
            settings,
            state,
            transports,
            batch_limit,
        }
    }

    pub async fn sync_now(&self) -> Result<SyncOutcome, AppError> {
        let settings = self.settings.load_settings().await?;
        if !settings.is_complete() {
            return Err(AppError::ConfigurationError(
                "endpoint URL and token must be configured before syncing".to_string(),
            ));
        }

        let records = self.queue.dequeue_all(self.batch_limit).await?;
        if records.is_empty() {
            info!("queue is empty; nothing to send");
            return Ok(SyncOutcome::NothingToSend);
        }

        let rows = records.len();
        let body = serde_json::to_string(&SyncBody {
            token: &settings.token,
            rows: records.into_iter().map(|record| record.payload).collect(),
        })?;

        let mut reasons = Vec::new();
        for transport in &self.transports {
            match transport.send(&settings.endpoint_url, &body).await {
                TransportOutcome::DeliveredUnconfirmed => {
                    let mut state = self.state.load_state().await?;
                    state.mark_sent(Utc::now());
                    self.state.save_state(&state).await?;
                    info!(rows, transport = transport.name(), "sync body handed off");
                    return Ok(SyncOutcome::Sent {
                        rows,
                        transport: transport.name(),
                    });
                }
                outcome => {
                    warn!(transport = transport.name(), %outcome, "transport did not send");
                    reasons.push(format!("{}: {}", transport.name(), outcome));
                }
            }
        }

        if reasons.is_empty() {
            reasons.push("no transport configured".to_string());
        }
        Err(AppError::Network(format!("not sent: {}", reasons.join("; "))))
    }

    /// Waits until background sends have finished. Call before the process exits.
    pub async fn settle(&self) {
        for transport in &self.transports {
            transport.settle().await;
        }
    }
}
