mod monitor;
mod track;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shipwatch")]
#[command(about = "Courier package tracker with chat notifications on change")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and print the current tracking state of one or more packages
    Track {
        /// Tracking numbers to look up
        #[arg(required = true)]
        tracking_numbers: Vec<String>,

        /// Send a notification for each successfully tracked package
        #[arg(long)]
        webhook: Option<String>,

        /// Save each snapshot to tracking_<number>_<timestamp>.json
        #[arg(long)]
        save_json: bool,

        /// Print the raw fetched page body instead of parsed output (debug)
        #[arg(long)]
        dump_page: bool,
    },
    /// Scrape every tracked package, notify the webhook on changes, and
    /// update the state file
    Monitor {
        /// State file path (default: SHIPWATCH_STATE_PATH or ./tracking_state.json)
        #[arg(long)]
        state_file: Option<PathBuf>,

        /// Webhook URL (default: SHIPWATCH_WEBHOOK_URL)
        #[arg(long)]
        webhook: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shipwatch_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Track {
            tracking_numbers,
            webhook,
            save_json,
            dump_page,
        } => track::run(&config, &tracking_numbers, webhook, save_json, dump_page).await,
        Commands::Monitor {
            state_file,
            webhook,
        } => monitor::run(&config, state_file, webhook).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_accepts_multiple_tracking_numbers_and_flags() {
        let cli = Cli::try_parse_from([
            "shipwatch",
            "track",
            "1566745519",
            "1234567890",
            "--save-json",
        ])
        .unwrap();
        let Commands::Track {
            tracking_numbers,
            save_json,
            dump_page,
            ..
        } = cli.command
        else {
            panic!("expected track command");
        };
        assert_eq!(tracking_numbers, vec!["1566745519", "1234567890"]);
        assert!(save_json);
        assert!(!dump_page);
    }

    #[test]
    fn track_requires_at_least_one_tracking_number() {
        assert!(Cli::try_parse_from(["shipwatch", "track"]).is_err());
    }

    #[test]
    fn monitor_accepts_state_file_and_webhook_overrides() {
        let cli = Cli::try_parse_from([
            "shipwatch",
            "monitor",
            "--state-file",
            "/tmp/state.json",
            "--webhook",
            "https://chat.example.com/hook",
        ])
        .unwrap();
        let Commands::Monitor {
            state_file,
            webhook,
        } = cli.command
        else {
            panic!("expected monitor command");
        };
        assert_eq!(state_file, Some(PathBuf::from("/tmp/state.json")));
        assert_eq!(webhook.as_deref(), Some("https://chat.example.com/hook"));
    }
}
