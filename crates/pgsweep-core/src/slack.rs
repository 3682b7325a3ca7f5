//! Best-effort Slack notification delivery.
//!
//! Notifications narrate the maintenance window but never gate it: every
//! delivery failure is reported as a `false` return (and logged by the
//! caller through [`notify`]), not as an error. The orchestrator keeps
//! going regardless of notifier health.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{MaintenanceError, Result};

const SLACK_BOT_API_URL: &str = "https://slack.com/api/chat.postMessage";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort notification sink.
///
/// Implementations return whether delivery succeeded and must never
/// propagate errors; the maintenance flow treats a failed notification
/// as a warning, not a fault.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a plain text message to a channel.
    async fn send_message(&self, channel: &str, text: &str) -> bool;

    /// Sends a Block Kit message with `text` as the fallback line.
    async fn send_blocks(&self, channel: &str, text: &str, blocks: Vec<Value>) -> bool;
}

/// Builds a single `mrkdwn` section block.
#[must_use]
pub fn mrkdwn_section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text },
    })
}

/// Sends a block message, logging (rather than propagating) delivery failure.
pub async fn notify(notifier: &dyn Notifier, channel: &str, text: &str, blocks: Vec<Value>) {
    if !notifier.send_blocks(channel, text, blocks).await {
        tracing::warn!(channel, message = text, "failed to deliver Slack notification");
    }
}

/// Slack notifier backed by an incoming webhook, falling back to the
/// Bot API (`chat.postMessage`) when only a bot token is configured.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    bot_token: Option<String>,
}

impl SlackNotifier {
    /// Creates a notifier from webhook/token settings.
    ///
    /// Either may be absent; a notifier with neither configured logs a
    /// warning and reports every send as failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(webhook_url: Option<String>, bot_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MaintenanceError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
            bot_token,
        })
    }

    async fn post(&self, payload: Value) -> bool {
        let (url, bearer) = match (&self.webhook_url, &self.bot_token) {
            (Some(url), _) => (url.as_str(), None),
            (None, Some(token)) => (SLACK_BOT_API_URL, Some(token.as_str())),
            (None, None) => {
                tracing::warn!("Slack is not configured; webhook URL and bot token are missing");
                return false;
            }
        };

        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Slack request failed");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Slack request rejected");
            return false;
        }

        // Webhooks answer with plain-text "ok"; the Bot API answers 200
        // even on logical failure and flags it in the body.
        if url == SLACK_BOT_API_URL {
            match response.json::<Value>().await {
                Ok(body) if body.get("ok").and_then(Value::as_bool) == Some(true) => true,
                Ok(body) => {
                    tracing::error!(response = %body, "Slack Bot API error");
                    false
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to parse Slack Bot API response");
                    false
                }
            }
        } else {
            true
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send_message(&self, channel: &str, text: &str) -> bool {
        self.post(json!({ "channel": channel, "text": text })).await
    }

    async fn send_blocks(&self, channel: &str, text: &str, blocks: Vec<Value>) -> bool {
        self.post(json!({ "channel": channel, "text": text, "blocks": blocks }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrkdwn_section_shape() {
        let block = mrkdwn_section("*Update*\n\nhello");
        assert_eq!(block["type"], "section");
        assert_eq!(block["text"]["type"], "mrkdwn");
        assert_eq!(block["text"]["text"], "*Update*\n\nhello");
    }

    #[tokio::test]
    async fn unconfigured_notifier_reports_failure() {
        let notifier = SlackNotifier::new(None, None).unwrap();
        assert!(!notifier.send_message("#general", "hello").await);
    }
}
