//! Flat-file JSON state: the tracked set and the last known-good snapshot
//! per tracking number.
//!
//! The file is a single JSON object keyed by tracking number. The keys ARE
//! the tracked set: adding a key with an empty object `{}` starts tracking
//! that number, deleting the key stops it. A key's value holds the most
//! recent snapshot that scraped cleanly — never a history log, never an
//! errored scrape.
//!
//! The store is read once at startup and flushed once at the end of a run
//! (write-to-temp then rename). Concurrent runs are not supported; the
//! external scheduler must guarantee at most one invocation in flight.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipwatch_core::{Checkpoint, Snapshot};

use crate::error::StoreError;

/// One entry in the state file.
///
/// All fields are optional so that `{}` — "track this number, no state
/// yet" — round-trips unchanged. `fetched_at` doubles as the marker for
/// "a snapshot has been recorded": entries without it diff as first
/// observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredEntry {
    /// User-maintained display name, e.g. `"Birthday present"`. Written by
    /// hand into the state file; survives snapshot overwrites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checkpoints: Vec<Checkpoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    /// Reconstructs the last known-good [`Snapshot`], or `None` when the
    /// entry has never recorded one.
    #[must_use]
    pub fn last_known(&self, tracking_number: &str) -> Option<Snapshot> {
        let fetched_at = self.fetched_at?;
        Some(Snapshot {
            tracking_number: tracking_number.to_owned(),
            status: self.status.clone().unwrap_or_default(),
            checkpoints: self.checkpoints.clone(),
            url: self.url.clone().unwrap_or_default(),
            fetched_at,
        })
    }
}

/// In-memory view of the state file, flushed back atomically at end of run.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredEntry>,
}

impl StateStore {
    /// Loads the state file at `path`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Read`] — the file is missing or unreadable.
    /// - [`StoreError::Corrupt`] — the file exists but is not a JSON object
    ///   of entries. Corruption is fatal by policy: without trustworthy old
    ///   state, nothing can be diffed safely, and auto-repair would
    ///   silently discard history.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_owned(),
            source,
        })?;
        let entries: BTreeMap<String, StoredEntry> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self {
            path: path.to_owned(),
            entries,
        })
    }

    /// Creates an empty store bound to `path` without touching the disk.
    #[must_use]
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
            entries: BTreeMap::new(),
        }
    }

    /// Writes an empty `{}` state file, for first-run bootstrap.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the file cannot be created.
    pub fn write_template(path: &Path) -> Result<(), StoreError> {
        fs::write(path, "{}\n").map_err(|source| StoreError::Write {
            path: path.to_owned(),
            source,
        })
    }

    /// The tracked set: every key in the file, whether or not it has
    /// recorded state yet.
    #[must_use]
    pub fn tracked_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The user-assigned label for a tracking number, if any.
    #[must_use]
    pub fn label(&self, tracking_number: &str) -> Option<&str> {
        self.entries
            .get(tracking_number)?
            .label
            .as_deref()
            .filter(|label| !label.is_empty())
    }

    /// The last known-good snapshot for a tracking number, or `None` when
    /// the number was never successfully tracked.
    #[must_use]
    pub fn last_known(&self, tracking_number: &str) -> Option<Snapshot> {
        self.entries
            .get(tracking_number)?
            .last_known(tracking_number)
    }

    /// Starts tracking a number if it is not already in the set.
    pub fn ensure_tracked(&mut self, tracking_number: &str) {
        self.entries.entry(tracking_number.to_owned()).or_default();
    }

    /// Records a known-good snapshot, overwriting the previous one in
    /// place. The entry's label is preserved.
    ///
    /// Callers must only pass snapshots from successful scrapes; failed
    /// scrapes have no snapshot to pass, so stored state cannot regress.
    pub fn record(&mut self, snapshot: &Snapshot) {
        let entry = self
            .entries
            .entry(snapshot.tracking_number.clone())
            .or_default();
        entry.status = Some(snapshot.status.clone());
        entry.checkpoints = snapshot.checkpoints.clone();
        entry.url = Some(snapshot.url.clone());
        entry.fetched_at = Some(snapshot.fetched_at);
    }

    /// Flushes the store to disk in one durable step: serialize, write to a
    /// sibling temp file, rename over the target.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the temp file cannot be written
    /// or the rename fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StoreError::Write {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json + "\n").map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "state flushed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
