//! The `track` subcommand: one-off lookups with human-readable output.
//!
//! Each tracking number is fetched and printed independently; a failure
//! prints and moves on, matching the loop's isolation policy. The exit
//! code stays 0 as long as the run itself completes.

use shipwatch_core::{AppConfig, Snapshot, TrackOutcome, COURIER_NAME};
use shipwatch_notify::{render_update, Notifier};
use shipwatch_scraper::TrackingClient;

pub async fn run(
    config: &AppConfig,
    tracking_numbers: &[String],
    webhook: Option<String>,
    save_json: bool,
    dump_page: bool,
) -> anyhow::Result<()> {
    let client = TrackingClient::new(
        config.scraper_timeout_secs,
        &config.scraper_user_agent,
        &config.base_url,
    )?;

    let notifier = webhook
        .or_else(|| config.webhook_url.clone())
        .map(|url| Notifier::new(&url, config.webhook_timeout_secs))
        .transpose()?;

    for tracking_number in tracking_numbers {
        if dump_page {
            match client.fetch_page(tracking_number).await {
                Ok(body) => println!("{body}"),
                Err(err) => {
                    tracing::error!(tracking_number = %tracking_number, error = %err, "failed to fetch page");
                }
            }
            continue;
        }

        match client.track(tracking_number).await {
            TrackOutcome::Ok(snapshot) => {
                print_snapshot(&snapshot);

                if save_json {
                    save_snapshot(&snapshot)?;
                }
                if let Some(notifier) = &notifier {
                    let text = render_update(&snapshot, None);
                    if let Err(err) = notifier.send(&text).await {
                        tracing::error!(tracking_number = %tracking_number, error = %err, "notification delivery failed");
                    }
                }
            }
            TrackOutcome::Failed(failure) => {
                tracing::error!(tracking_number = %tracking_number, error = %failure.error, "tracking failed");
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("{}", "=".repeat(70));
    println!("Tracking Number: {}", snapshot.tracking_number);
    println!("Courier:         {COURIER_NAME}");
    if !snapshot.status.is_empty() {
        println!("Status:          {}", snapshot.status);
    }
    println!("URL:             {}", snapshot.url);
    println!("Fetched:         {}", snapshot.fetched_at.to_rfc3339());

    if snapshot.checkpoints.is_empty() {
        println!("\nNo tracking checkpoints found");
    } else {
        println!("\nTracking History ({} events):", snapshot.checkpoints.len());
        for (i, checkpoint) in snapshot.checkpoints.iter().enumerate() {
            if checkpoint.time.is_empty() {
                println!("\n[{}] {}", i + 1, checkpoint.date);
            } else {
                println!("\n[{}] {} at {}", i + 1, checkpoint.date, checkpoint.time);
            }
            if !checkpoint.activity.is_empty() {
                println!("    Activity: {}", checkpoint.activity);
            }
            if !checkpoint.location.is_empty() {
                println!("    Location: {}", checkpoint.location);
            }
        }
    }
    println!("{}", "=".repeat(70));
}

fn save_snapshot(snapshot: &Snapshot) -> anyhow::Result<()> {
    let filename = format!(
        "tracking_{}_{}.json",
        snapshot.tracking_number,
        snapshot.fetched_at.format("%Y%m%d_%H%M%S")
    );
    std::fs::write(&filename, serde_json::to_string_pretty(snapshot)?)?;
    println!("Saved tracking data to: {filename}");
    Ok(())
}
