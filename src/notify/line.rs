//! LINE Messaging API push channel.
//!
//! One text message to one configured recipient per call. Missing
//! credentials are a degraded mode, not an error: the caller learns the
//! send was skipped and carries on, so pipelines on a box without secrets
//! still track state correctly.

use serde_json::json;

use crate::config::LineCredentials;
use crate::model::DeliveryError;

const PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// What happened to a push attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// No credentials configured; nothing was sent.
    SkippedNoCredentials,
}

/// Push client for the configured LINE channel.
pub struct LineNotifier {
    client: reqwest::blocking::Client,
    credentials: Option<LineCredentials>,
}

impl LineNotifier {
    pub fn new(client: reqwest::blocking::Client, credentials: Option<LineCredentials>) -> Self {
        LineNotifier {
            client,
            credentials,
        }
    }

    /// True when a push would actually reach the channel.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Pushes one text message. Exactly one attempt — failures are
    /// reported to the caller, never retried here.
    pub fn push(&self, text: &str) -> Result<DeliveryOutcome, DeliveryError> {
        let Some(credentials) = &self.credentials else {
            return Ok(DeliveryOutcome::SkippedNoCredentials);
        };

        let body = json!({
            "to": credentials.target_id,
            "messages": [{ "type": "text", "text": text }],
        });

        let response = self
            .client
            .post(PUSH_URL)
            .header(
                "Authorization",
                format!("Bearer {}", credentials.channel_access_token),
            )
            .json(&body)
            .send()
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(DeliveryOutcome::Sent)
        } else {
            // The API explains rejections (bad recipient, expired token)
            // in the body; keep it for the log.
            let detail = response.text().unwrap_or_default();
            Err(DeliveryError::Http(status.as_u16(), detail))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
