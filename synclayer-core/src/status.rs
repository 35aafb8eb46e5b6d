//! Per-record synchronization status.
//!
//! When a store has synchronization enabled, every record it touches carries a
//! [`SyncStatus`] describing how the local copy differs from the remote source
//! of truth. A record with no status has never been touched by a sync-aware
//! operation and is considered clean.
//!
//! All status changes go through [`SyncStatus::next`]:
//!
//! | Current  | Event                          | Next       |
//! |----------|--------------------------------|------------|
//! | absent   | save, no existing match        | `NEW`      |
//! | any      | save, matches existing         | `MODIFIED` |
//! | any      | remove                         | `REMOVED`  |
//!
//! Purging `REMOVED` records is a reconciliation step owned by the store, not a transition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The synchronization state of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Created locally and not yet known to the remote source.
    New,
    /// Replaced locally or by incoming data since the record was first seen.
    Modified,
    /// Removed; invisible to reads until purged.
    Removed,
}

/// A sync-aware store operation applied to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// Save of a record with no existing identity match.
    Inserted,
    /// Save of a record replacing an existing one, including a removed one.
    Replaced,
    /// Removal of an existing record.
    Removed,
}

impl SyncStatus {
    /// Returns the status a record moves to when `event` is applied to it.
    pub fn next(current: Option<SyncStatus>, event: SyncEvent) -> SyncStatus {
        match (current, event) {
            (None, SyncEvent::Inserted) => SyncStatus::New,
            // an insert never targets an existing record; treat it as a replacement
            (Some(_), SyncEvent::Inserted) => SyncStatus::Modified,
            (_, SyncEvent::Replaced) => SyncStatus::Modified,
            (_, SyncEvent::Removed) => SyncStatus::Removed,
        }
    }

    /// Whether a record with this status is visible to reads and filters.
    pub fn is_visible(status: Option<SyncStatus>) -> bool {
        status != Some(SyncStatus::Removed)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncStatus::New => "NEW",
            SyncStatus::Modified => "MODIFIED",
            SyncStatus::Removed => "REMOVED",
        })
    }
}
