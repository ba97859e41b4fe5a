use super::Validate;
use crate::application::services::SyncOutcome;
use crate::domain::entities::SyncSettings;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct UpdateSettingsRequest {
    pub url: Option<String>,
    pub token: Option<String>,
}

impl Validate for UpdateSettingsRequest {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_none() && self.token.is_none() {
            return Err("nothing to update: pass --url and/or --token".to_string());
        }
        if let Some(url) = &self.url {
            let lower = url.trim().to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(format!("endpoint must be an http(s) URL, got '{}'", url));
            }
        }
        if let Some(token) = &self.token {
            if token.trim().is_empty() {
                return Err("token must not be blank".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub url: String,
    pub token: String,
    pub complete: bool,
}

impl From<&SyncSettings> for SettingsView {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            url: settings.endpoint_url.clone(),
            token: settings.masked_token(),
            complete: settings.is_complete(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub rows: usize,
    pub transport: Option<String>,
    pub message: String,
}

impl From<SyncOutcome> for SyncReport {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::NothingToSend => Self {
                rows: 0,
                transport: None,
                message: "Nothing to send.".to_string(),
            },
            SyncOutcome::Sent { rows, transport } => Self {
                rows,
                transport: Some(transport.to_string()),
                message: format!(
                    "Sent {} rows via {} (unconfirmed). Check the sheet, then run `verify` or `clear --yes`.",
                    rows, transport
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_request_requires_http_url_and_token() {
        let request = UpdateSettingsRequest {
            url: Some("https://script.example/exec".into()),
            token: Some("abc".into()),
        };
        assert!(request.validate().is_ok());

        let request = UpdateSettingsRequest {
            url: Some("script.example/exec".into()),
            token: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateSettingsRequest {
            url: None,
            token: Some("  ".into()),
        };
        assert!(request.validate().is_err());

        let request = UpdateSettingsRequest {
            url: None,
            token: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn settings_view_masks_token() {
        let view = SettingsView::from(&SyncSettings::new("https://x.test", "abcdef123"));
        assert_eq!(view.token, "*****f123");
        assert!(view.complete);
    }
}
