//! HTTP client for the courier's public tracking pages.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use shipwatch_core::{ScrapeFailure, Snapshot, TrackOutcome};

use crate::error::ScraperError;
use crate::parse::parse_tracking_page;

/// HTTP client for the courier tracking site.
///
/// One tracking number maps to one page at `<base_url>/<tracking_number>`.
/// Not-found (404) and other non-2xx responses surface as typed errors;
/// [`TrackingClient::track`] additionally folds every failure into
/// [`TrackOutcome::Failed`] so one bad package cannot abort a batch.
///
/// The client is an explicitly constructed value passed into each run —
/// there is no process-wide session. It owns its connection pool and
/// timeout policy; retries are deliberately absent because the monitoring
/// schedule itself is the retry loop.
pub struct TrackingClient {
    client: Client,
    base_url: String,
}

impl TrackingClient {
    /// Creates a `TrackingClient` with configured timeout and `User-Agent`.
    ///
    /// `base_url` is the tracking page root without a trailing tracking
    /// number, e.g. `https://trackcourier.io/track-and-trace/anjani-courier`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str, base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Public tracking page URL for a tracking number.
    #[must_use]
    pub fn tracking_url(&self, tracking_number: &str) -> String {
        format!("{}/{tracking_number}", self.base_url)
    }

    /// Fetches the raw tracking page body for a tracking number.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] — HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network, TLS, or timeout failure.
    pub async fn fetch_page(&self, tracking_number: &str) -> Result<String, ScraperError> {
        let url = self.tracking_url(tracking_number);

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound { url });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }

    /// Scrapes one tracking number into a [`TrackOutcome`].
    ///
    /// Transport and HTTP failures are folded into
    /// [`TrackOutcome::Failed`] rather than returned, so the caller's loop
    /// over many packages needs no per-item error handling. An empty page
    /// still yields `Ok` with an uninformative snapshot.
    pub async fn track(&self, tracking_number: &str) -> TrackOutcome {
        let fetched_at = Utc::now();

        match self.fetch_page(tracking_number).await {
            Ok(body) => {
                let page = parse_tracking_page(&body);
                tracing::debug!(
                    tracking_number,
                    status = %page.status,
                    checkpoints = page.checkpoints.len(),
                    "scraped tracking page"
                );
                TrackOutcome::Ok(Snapshot {
                    tracking_number: tracking_number.to_owned(),
                    status: page.status,
                    checkpoints: page.checkpoints,
                    url: self.tracking_url(tracking_number),
                    fetched_at,
                })
            }
            Err(err) => TrackOutcome::Failed(ScrapeFailure {
                tracking_number: tracking_number.to_owned(),
                fetched_at,
                error: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
