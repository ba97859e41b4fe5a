use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verification state of the last sync attempt, persisted apart from the queue.
///
/// `pending_verify == true` means rows were handed to the network layer but nobody
/// has confirmed they reached the destination. Only an explicit operator action
/// (verify, or a confirmed clear) resets it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    #[serde(default)]
    pub last_sent_at: Option<i64>,
    #[serde(default)]
    pub pending_verify: bool,
}

impl SyncState {
    pub fn mark_sent(&mut self, sent_at: DateTime<Utc>) {
        self.last_sent_at = Some(sent_at.timestamp_millis());
        self.pending_verify = true;
    }

    pub fn mark_verified(&mut self) {
        self.pending_verify = false;
    }

    pub fn last_sent_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_sent_at
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Remote collection endpoint and the static bearer token sent with every batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SyncSettings {
    #[serde(default, rename = "url")]
    pub endpoint_url: String,
    #[serde(default)]
    pub token: String,
}

impl SyncSettings {
    pub fn new(endpoint_url: &str, token: &str) -> Self {
        Self {
            endpoint_url: endpoint_url.trim().to_string(),
            token: token.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.endpoint_url.trim().is_empty() && !self.token.trim().is_empty()
    }

    /// Token with all but the last four characters hidden, for display.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_sent_sets_pending_verify() {
        let mut state = SyncState::default();
        let now = Utc::now();
        state.mark_sent(now);
        assert!(state.pending_verify);
        assert_eq!(state.last_sent_at, Some(now.timestamp_millis()));

        state.mark_verified();
        assert!(!state.pending_verify);
        assert_eq!(state.last_sent_at, Some(now.timestamp_millis()));
    }

    #[test]
    fn state_reads_camel_case_keys() {
        let state: SyncState =
            serde_json::from_str(r#"{"lastSentAt":1718000000000,"pendingVerify":true}"#).unwrap();
        assert_eq!(state.last_sent_at, Some(1_718_000_000_000));
        assert!(state.pending_verify);
    }

    #[test]
    fn settings_require_url_and_token() {
        assert!(!SyncSettings::new("https://x.example", " ").is_complete());
        assert!(!SyncSettings::new("", "tok").is_complete());
        assert!(SyncSettings::new(" https://x.example ", " tok ").is_complete());
        assert_eq!(SyncSettings::new("u", "abcdefgh").masked_token(), "****efgh");
    }
}
