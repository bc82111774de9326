use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Chat webhook URL. Optional here; the monitor command requires it.
    pub webhook_url: Option<String>,
    /// Path of the JSON state file.
    pub state_path: PathBuf,
    /// Extra tracking identifiers from the environment, merged into the
    /// state file's key set by the monitor loop.
    pub tracking_ids: Vec<String>,
    /// Base URL of the courier tracking page; the tracking number is
    /// appended as the final path segment.
    pub base_url: String,
    pub log_level: String,
    pub scraper_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub inter_request_delay_ms: u64,
    pub webhook_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            // Webhook URLs embed an access token in the query string.
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[redacted]"))
            .field("state_path", &self.state_path)
            .field("tracking_ids", &self.tracking_ids)
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .finish()
    }
}
