//! The monitoring loop: scrape each tracked package, diff against stored
//! state, notify on meaningful change, persist the new state.
//!
//! One identifier's failure never stops the others; anything below the
//! whole-run level is converted to data and accounted for in
//! [`RunTotals`]. The only error this crate returns is a failed state
//! flush — losing a notification is acceptable, losing or corrupting
//! stored state is not.

use std::time::Duration;

use shipwatch_core::{detect, Detection, TrackOutcome};
use shipwatch_notify::{render_update, Notifier};
use shipwatch_scraper::TrackingClient;
use shipwatch_store::{StateStore, StoreError};

/// Aggregated totals for one monitoring run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    /// Identifiers processed.
    pub checked: usize,
    /// Notifications delivered.
    pub notified: usize,
    /// Scrapes that failed (stored state untouched for those ids).
    pub scrape_failures: usize,
    /// Notifications that failed to deliver (state persisted anyway).
    pub notify_failures: usize,
}

/// Runs one monitoring pass over every identifier in the store's tracked
/// set, sequentially, then flushes the store once.
///
/// Per identifier: scrape, diff against the last known-good snapshot,
/// notify when the change detector says so, and record the new snapshot —
/// but only when the scrape succeeded, so transient failures never regress
/// stored state. Sequential processing with `inter_request_delay` between
/// page fetches is deliberate: the site rate-limits, and a single scraping
/// session is the resource model.
///
/// # Errors
///
/// Returns [`StoreError`] only when the final state flush fails. Scrape
/// and notification failures are logged and counted, never returned.
pub async fn run_monitor(
    client: &TrackingClient,
    notifier: &Notifier,
    store: &mut StateStore,
    inter_request_delay: Duration,
) -> Result<RunTotals, StoreError> {
    let tracked = store.tracked_ids();
    tracing::info!(packages = tracked.len(), "monitoring run started");

    let mut totals = RunTotals::default();

    for (i, tracking_number) in tracked.iter().enumerate() {
        if i > 0 && !inter_request_delay.is_zero() {
            tokio::time::sleep(inter_request_delay).await;
        }

        tracing::info!(tracking_number = %tracking_number, "checking package");
        totals.checked += 1;

        let old = store.last_known(tracking_number);
        let outcome = client.track(tracking_number).await;
        let detection = detect(old.as_ref(), &outcome);

        if let Detection::Changed(report) = &detection {
            // Changed is only ever produced for successful scrapes.
            if let Some(snapshot) = outcome.snapshot() {
                let text = render_update(snapshot, store.label(tracking_number));
                match notifier.send(&text).await {
                    Ok(()) => {
                        totals.notified += 1;
                        tracing::info!(
                            tracking_number = %tracking_number,
                            reason = ?report.reason(),
                            "notification sent"
                        );
                    }
                    Err(err) => {
                        // Never block persistence on delivery.
                        totals.notify_failures += 1;
                        tracing::error!(
                            tracking_number = %tracking_number,
                            error = %err,
                            "notification delivery failed"
                        );
                    }
                }
            }
        } else {
            tracing::info!(tracking_number = %tracking_number, "no change detected");
        }

        match &outcome {
            TrackOutcome::Ok(snapshot) => store.record(snapshot),
            TrackOutcome::Failed(failure) => {
                totals.scrape_failures += 1;
                tracing::warn!(
                    tracking_number = %tracking_number,
                    error = %failure.error,
                    "scrape failed; keeping previous state"
                );
            }
        }
    }

    store.flush()?;

    tracing::info!(
        checked = totals.checked,
        notified = totals.notified,
        scrape_failures = totals.scrape_failures,
        notify_failures = totals.notify_failures,
        "monitoring run finished"
    );

    Ok(totals)
}
