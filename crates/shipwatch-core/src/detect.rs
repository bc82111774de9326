//! Change detection between the stored snapshot and a fresh scrape.
//!
//! [`detect`] is a pure function over its two inputs: calling it any number
//! of times with the same `(old, new)` pair yields the same result and
//! touches nothing else, so the surrounding loop can be retried safely.

use crate::snapshot::{Checkpoint, Snapshot, TrackOutcome};

/// Why a transition was classified as notification-worthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// No prior state existed for this tracking number; the first
    /// successful scrape is itself news.
    FirstObservation,

    /// The coarse status label differs.
    StatusChanged,

    /// The checkpoint count differs. A decrease reports under the same
    /// reason: it means the site changed its data, which is worth surfacing
    /// rather than hiding.
    NewCheckpoints,

    /// Same count, but the newest checkpoint's fields differ.
    LatestCheckpointUpdated,

    /// More than one of the above fired at once.
    Combination,
}

/// Structured facts about a detected change, for the notifier to render.
///
/// The detector decides and reports; it never formats message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub first_observation: bool,
    pub status_changed: bool,
    pub checkpoint_count_changed: bool,
    pub latest_checkpoint_changed: bool,

    /// `None` on first observation.
    pub old_status: Option<String>,
    pub new_status: String,
    pub old_checkpoint_count: usize,
    pub new_checkpoint_count: usize,
    pub old_latest: Option<Checkpoint>,
    pub new_latest: Option<Checkpoint>,
}

impl ChangeReport {
    /// Collapses the predicate flags into a single [`ChangeReason`],
    /// `Combination` when more than one fired.
    #[must_use]
    pub fn reason(&self) -> ChangeReason {
        if self.first_observation {
            return ChangeReason::FirstObservation;
        }
        let fired = usize::from(self.status_changed)
            + usize::from(self.checkpoint_count_changed)
            + usize::from(self.latest_checkpoint_changed);
        if fired > 1 {
            ChangeReason::Combination
        } else if self.status_changed {
            ChangeReason::StatusChanged
        } else if self.checkpoint_count_changed {
            ChangeReason::NewCheckpoints
        } else {
            ChangeReason::LatestCheckpointUpdated
        }
    }

    /// Checkpoint delta, negative when the history shrank.
    #[must_use]
    pub fn checkpoint_delta(&self) -> i64 {
        // Counts come from in-memory Vec lengths, far below i64 range.
        #[allow(clippy::cast_possible_wrap)]
        {
            self.new_checkpoint_count as i64 - self.old_checkpoint_count as i64
        }
    }
}

/// Result of diffing old vs new state for one tracking number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    NoChange,
    Changed(ChangeReport),
}

impl Detection {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Detection::Changed(_))
    }
}

/// Decides whether `new` is a notification-worthy transition from `old`.
///
/// Policy, in order:
///
/// 1. A failed scrape is never a change, no matter how the stored state
///    looks. Scrape noise must not masquerade as package news, and a
///    missed notification is preferred over a false one.
/// 2. A valid snapshot with no stored predecessor is always
///    [`ChangeReason::FirstObservation`].
/// 3. Otherwise three independent predicates are OR'd together: status
///    inequality (exact string compare; empty vs non-empty counts),
///    checkpoint-count inequality (decreases report too), and structural
///    inequality of the newest checkpoint. When exactly one side has no
///    checkpoints at all, that asymmetry alone counts as a change.
///
/// The newest-checkpoint comparison deliberately ignores everything past
/// index 0: an edit buried deeper in history that leaves both the count
/// and the head untouched is not detected.
#[must_use]
pub fn detect(old: Option<&Snapshot>, new: &TrackOutcome) -> Detection {
    let new = match new {
        TrackOutcome::Ok(snapshot) => snapshot,
        TrackOutcome::Failed(_) => return Detection::NoChange,
    };

    let Some(old) = old else {
        return Detection::Changed(ChangeReport {
            first_observation: true,
            status_changed: false,
            checkpoint_count_changed: false,
            latest_checkpoint_changed: false,
            old_status: None,
            new_status: new.status.clone(),
            old_checkpoint_count: 0,
            new_checkpoint_count: new.checkpoints.len(),
            old_latest: None,
            new_latest: new.latest_checkpoint().cloned(),
        });
    };

    let status_changed = old.status != new.status;
    let checkpoint_count_changed = old.checkpoints.len() != new.checkpoints.len();
    let latest_checkpoint_changed =
        latest_differs(old.latest_checkpoint(), new.latest_checkpoint());

    if !(status_changed || checkpoint_count_changed || latest_checkpoint_changed) {
        return Detection::NoChange;
    }

    Detection::Changed(ChangeReport {
        first_observation: false,
        status_changed,
        checkpoint_count_changed,
        latest_checkpoint_changed,
        old_status: Some(old.status.clone()),
        new_status: new.status.clone(),
        old_checkpoint_count: old.checkpoints.len(),
        new_checkpoint_count: new.checkpoints.len(),
        old_latest: old.latest_checkpoint().cloned(),
        new_latest: new.latest_checkpoint().cloned(),
    })
}

/// Newest-checkpoint predicate: structural inequality when both sides have
/// history; presence/absence counts only when exactly one side is empty.
fn latest_differs(old: Option<&Checkpoint>, new: Option<&Checkpoint>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => old != new,
        (None, None) => false,
        _ => true,
    }
}

#[cfg(test)]
#[path = "detect_test.rs"]
mod tests;
