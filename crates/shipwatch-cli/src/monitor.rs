//! The `monitor` subcommand: one pass of the monitoring loop.
//!
//! Fatal errors here are setup errors only — missing webhook, missing or
//! corrupt state file, empty tracked set. Per-package scrape and
//! notification failures are handled inside the loop and never flip the
//! exit code.

use std::path::PathBuf;
use std::time::Duration;

use shipwatch_core::{AppConfig, ConfigError};
use shipwatch_monitor::run_monitor;
use shipwatch_notify::Notifier;
use shipwatch_scraper::TrackingClient;
use shipwatch_store::StateStore;

pub async fn run(
    config: &AppConfig,
    state_file: Option<PathBuf>,
    webhook: Option<String>,
) -> anyhow::Result<()> {
    let webhook_url = webhook
        .or_else(|| config.webhook_url.clone())
        .ok_or(ConfigError::MissingEnvVar("SHIPWATCH_WEBHOOK_URL".to_owned()))?;
    let state_path = state_file.unwrap_or_else(|| config.state_path.clone());

    if !state_path.exists() {
        StateStore::write_template(&state_path)?;
        anyhow::bail!(
            "state file {} did not exist; created an empty template. \
             Add tracking numbers as keys, e.g. {{\"1566745519\": {{}}}}, and rerun",
            state_path.display()
        );
    }

    let mut store = StateStore::load(&state_path)?;
    for tracking_number in &config.tracking_ids {
        store.ensure_tracked(tracking_number);
    }

    if store.is_empty() {
        return Err(ConfigError::NoTrackingIds(format!(
            "add keys to {} or set SHIPWATCH_TRACKING_IDS",
            state_path.display()
        ))
        .into());
    }

    let client = TrackingClient::new(
        config.scraper_timeout_secs,
        &config.scraper_user_agent,
        &config.base_url,
    )?;
    let notifier = Notifier::new(&webhook_url, config.webhook_timeout_secs)?;

    run_monitor(
        &client,
        &notifier,
        &mut store,
        Duration::from_millis(config.inter_request_delay_ms),
    )
    .await?;

    Ok(())
}
