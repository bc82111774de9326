use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default base URL of the courier's tracking page. The tracking number is
/// appended as the final path segment.
pub const DEFAULT_BASE_URL: &str = "https://trackcourier.io/track-and-trace/anjani-courier";

/// The tracking site serves a reduced page to obvious bot user agents, so
/// the default mimics a desktop browser.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let webhook_url = lookup("SHIPWATCH_WEBHOOK_URL").ok().filter(|s| !s.is_empty());
    let state_path = PathBuf::from(or_default("SHIPWATCH_STATE_PATH", "./tracking_state.json"));
    let tracking_ids = match lookup("SHIPWATCH_TRACKING_IDS") {
        Ok(raw) => parse_tracking_ids(&raw)?,
        Err(_) => Vec::new(),
    };
    let base_url = or_default("SHIPWATCH_BASE_URL", DEFAULT_BASE_URL);
    let log_level = or_default("SHIPWATCH_LOG_LEVEL", "info");
    let scraper_timeout_secs = parse_u64("SHIPWATCH_SCRAPER_TIMEOUT_SECS", "60")?;
    let scraper_user_agent = or_default("SHIPWATCH_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("SHIPWATCH_INTER_REQUEST_DELAY_MS", "250")?;
    let webhook_timeout_secs = parse_u64("SHIPWATCH_WEBHOOK_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        webhook_url,
        state_path,
        tracking_ids,
        base_url,
        log_level,
        scraper_timeout_secs,
        scraper_user_agent,
        inter_request_delay_ms,
        webhook_timeout_secs,
    })
}

/// Parse `SHIPWATCH_TRACKING_IDS`: either a JSON array of strings/numbers
/// (`["1566745519","1234567890"]`) or a comma-separated list
/// (`1566745519,1234567890`). Surrounding whitespace and empty items are
/// discarded.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` when the value starts a JSON array
/// but does not parse as one.
fn parse_tracking_ids(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(trimmed).map_err(|e| ConfigError::InvalidEnvVar {
                var: "SHIPWATCH_TRACKING_IDS".to_string(),
                reason: format!("not a valid JSON array: {e}"),
            })?;
        return Ok(values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect());
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
