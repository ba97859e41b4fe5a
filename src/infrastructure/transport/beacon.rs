use crate::application::ports::{SyncTransport, TransportOutcome, SYNC_CONTENT_TYPE};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_HANDOFF: Duration = Duration::from_millis(1500);

type InFlight = JoinHandle<Result<(), reqwest::Error>>;

/// Fire-and-forget POST. The request runs on a background task; `send` only waits for
/// the hand-off window. A request that fails inside the window (refused connection,
/// unresolvable host) is reported as failed. One still running when the window closes
/// is reported as sent and joined later by `settle`. The server's answer is never read.
pub struct BeaconTransport {
    client: reqwest::Client,
    max_body_bytes: usize,
    handoff: Duration,
    in_flight: Mutex<Vec<InFlight>>,
}

impl BeaconTransport {
    pub fn new(client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
            handoff: DEFAULT_HANDOFF,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn with_handoff(mut self, handoff: Duration) -> Self {
        self.handoff = handoff;
        self
    }

    fn refusal(&self, endpoint: &str, body: &str) -> Option<String> {
        if body.len() > self.max_body_bytes {
            return Some(format!(
                "body of {} bytes exceeds the {} byte beacon limit",
                body.len(),
                self.max_body_bytes
            ));
        }
        let lower = endpoint.trim().to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Some(format!("endpoint {} is not an http(s) URL", endpoint));
        }
        None
    }

    fn keep_in_flight(&self, task: InFlight) {
        match self.in_flight.lock() {
            Ok(mut guard) => guard.push(task),
            Err(poisoned) => poisoned.into_inner().push(task),
        }
    }

    fn take_in_flight(&self) -> Vec<InFlight> {
        match self.in_flight.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl SyncTransport for BeaconTransport {
    fn name(&self) -> &'static str {
        "beacon"
    }

    async fn send(&self, endpoint: &str, body: &str) -> TransportOutcome {
        if let Some(reason) = self.refusal(endpoint, body) {
            return TransportOutcome::NotAttempted(reason);
        }
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return TransportOutcome::NotAttempted("no async runtime".to_string()),
        };

        let request = self
            .client
            .post(endpoint.trim())
            .header(CONTENT_TYPE, SYNC_CONTENT_TYPE)
            .body(body.to_string());
        let mut task = handle.spawn(async move { request.send().await.map(|_| ()) });

        match tokio::time::timeout(self.handoff, &mut task).await {
            Ok(Ok(Ok(()))) => {
                debug!("beacon request handed off");
                TransportOutcome::DeliveredUnconfirmed
            }
            Ok(Ok(Err(err))) => TransportOutcome::Failed(err.to_string()),
            Ok(Err(err)) => TransportOutcome::Failed(format!("beacon task aborted: {}", err)),
            Err(_) => {
                debug!("beacon request still in flight after hand-off window");
                self.keep_in_flight(task);
                TransportOutcome::DeliveredUnconfirmed
            }
        }
    }

    async fn settle(&self) {
        for task in self.take_in_flight() {
            match task.await {
                Ok(Ok(())) => debug!("beacon request finished"),
                Ok(Err(err)) => warn!(error = %err, "beacon request failed after hand-off"),
                Err(err) => warn!(error = %err, "beacon task did not finish"),
            }
        }
    }
}
