//! Cross-process sync bridge.
//!
//! One-way projection out (today's total and limit config for the widget),
//! one-way queue in (logs recorded by a process that cannot reach the event
//! store directly, folded in by [`crate::Tracker::merge_pending`]).

mod pending;
mod shared_store;

pub use pending::PendingLog;
pub use shared_store::SharedStore;

use serde::Serialize;

/// Result of folding the inbound queue into the event store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Entries validated and inserted.
    pub merged: usize,
    /// Malformed entries dropped.
    pub skipped: usize,
}
