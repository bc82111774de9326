//! Data model for captured package-tracking state.
//!
//! A [`Snapshot`] is created fresh on every scrape and is immutable in
//! intent; the state store persists at most one known-good snapshot per
//! tracking number. Scrape failures are their own variant of
//! [`TrackOutcome`] rather than an error field on the snapshot, so a failed
//! scrape cannot reach the diff path or the store by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracking-history event as published by the courier site.
///
/// All four fields are opaque free text. The site does not guarantee a
/// parseable calendar format for `date`, and `time` is frequently empty, so
/// no chronological interpretation is attempted anywhere in the pipeline.
/// Equality is structural across all four fields; checkpoints have no
/// identity of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Calendar date as printed on the site, e.g. `"29-Jan-2026"`.
    pub date: String,

    /// Clock time as printed, e.g. `"11:26 AM"`. Often empty.
    #[serde(default)]
    pub time: String,

    /// Free-text activity description, e.g. `"IN Anjani Courier"`.
    #[serde(default)]
    pub activity: String,

    /// Free-text location, e.g. `"BANDRA-EAST"`.
    #[serde(default)]
    pub location: String,
}

/// Captured state of one package at one scrape moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The identifier the package is tracked under. Unique key across the
    /// whole tracked set; never changes once a snapshot exists for it.
    pub tracking_number: String,

    /// Coarse status label (`"IN TRANSIT"`, `"DELIVERED"`, ...). Empty when
    /// the page showed no recognizable status — that is still a valid
    /// snapshot, not a failure.
    #[serde(default)]
    pub status: String,

    /// Tracking history, newest-first.
    ///
    /// Newest-first is the source site's ordering convention and the
    /// scraper preserves it by appending checkpoints in page order. The
    /// change detector relies on index 0 being the latest event.
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,

    /// Public tracking page for this package.
    pub url: String,

    /// When this snapshot was captured.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// The newest checkpoint, if any.
    #[must_use]
    pub fn latest_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints.first()
    }
}

/// A scrape attempt that produced no usable snapshot.
///
/// Failures exist for logging and run accounting only; they never overwrite
/// stored state and never count as a package update.
#[derive(Debug, Clone)]
pub struct ScrapeFailure {
    pub tracking_number: String,

    /// When the failed attempt happened.
    pub fetched_at: DateTime<Utc>,

    /// Human-readable cause, typically the transport error chain.
    pub error: String,
}

/// Outcome of scraping one tracking number.
///
/// A page that loads but yields neither status nor checkpoints is `Ok`
/// with an uninformative snapshot; only transport- and HTTP-level failures
/// produce `Failed`.
#[derive(Debug, Clone)]
pub enum TrackOutcome {
    Ok(Snapshot),
    Failed(ScrapeFailure),
}

impl TrackOutcome {
    #[must_use]
    pub fn tracking_number(&self) -> &str {
        match self {
            TrackOutcome::Ok(snapshot) => &snapshot.tracking_number,
            TrackOutcome::Failed(failure) => &failure.tracking_number,
        }
    }

    /// The snapshot, when the scrape succeeded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            TrackOutcome::Ok(snapshot) => Some(snapshot),
            TrackOutcome::Failed(_) => None,
        }
    }
}
