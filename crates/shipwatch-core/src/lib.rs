pub mod app_config;
pub mod config;
pub mod detect;
pub mod snapshot;

use thiserror::Error;

/// Display name of the single courier this system tracks.
pub const COURIER_NAME: &str = "Anjani Courier";

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use detect::{detect, ChangeReason, ChangeReport, Detection};
pub use snapshot::{Checkpoint, ScrapeFailure, Snapshot, TrackOutcome};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("no tracking identifiers configured: {0}")]
    NoTrackingIds(String),
}
