//! Webhook delivery of rendered messages.

use std::time::Duration;

use reqwest::Client;

use crate::error::NotifyError;

/// How much of a rejecting response body is kept in the error.
const BODY_SNIPPET_LEN: usize = 200;

/// Delivers rendered messages to a chat webhook as
/// `{"text": "..."}` JSON POSTs.
pub struct Notifier {
    client: Client,
    webhook_url: String,
}

impl Notifier {
    /// Creates a `Notifier` for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(webhook_url: &str, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.to_owned(),
        })
    }

    /// Posts one message.
    ///
    /// Delivery failures are errors for the caller to log; they must never
    /// block state persistence or the rest of the run.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::UnexpectedStatus`] — the webhook answered non-2xx.
    /// - [`NotifyError::Http`] — network, TLS, or timeout failure.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({ "text": text });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet = body.chars().take(BODY_SNIPPET_LEN).collect::<String>();
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        tracing::debug!("notification delivered");
        Ok(())
    }
}
