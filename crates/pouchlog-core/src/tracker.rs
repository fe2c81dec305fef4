//! Aggregation engine over the event store.
//!
//! Stateless derivations (day buckets, rolling windows, averages) plus the
//! one piece of session state: the undo token for the most recent log.
//! Nothing here caches a materialized view; every query recomputes against
//! the store at call time.
//!
//! Mutations take `&mut self` and reads take `&self`, which pins the
//! single-writer model at compile time. `rusqlite::Connection` is not
//! `Sync`, so sharing a tracker across threads requires an external lock
//! around the whole value.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::bridge::{MergeOutcome, PendingLog, SharedStore};
use crate::clock::{day_bucket, next_day_start, prev_day_start, Clock};
use crate::entry::LogEntry;
use crate::error::Result;
use crate::export;
use crate::limits::LimitConfig;
use crate::notify::{Notifier, NullNotifier};
use crate::storage::Database;

/// How long after a log the undo affordance stays live. Hard-coded;
/// evaluated against the injected clock at call time, no timer scheduled.
pub const UNDO_WINDOW_SECS: i64 = 30;

/// Reference to the most recently logged entry. Session-only: never
/// persisted, gone after a restart.
#[derive(Debug, Clone, Copy)]
struct UndoToken {
    entry_id: Uuid,
    logged_at: DateTime<Utc>,
}

/// One point of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayCount {
    pub date: DateTime<Utc>,
    pub count: i64,
}

/// One calendar day of grouped history, newest entries first.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    pub day: DateTime<Utc>,
    pub total: i64,
    pub entries: Vec<LogEntry>,
}

/// The aggregation and limit-tracking engine.
pub struct Tracker {
    db: Database,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    bridge: Option<SharedStore>,
    undo: Option<UndoToken>,
}

impl Tracker {
    pub fn new(db: Database, clock: Box<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            notifier: Box::new(NullNotifier),
            bridge: None,
            undo: None,
        }
    }

    /// Replace the no-op notifier.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Attach the shared widget store; every mutation refreshes its
    /// projection from then on.
    pub fn with_bridge(mut self, bridge: SharedStore) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    // --- Logging & undo ---

    /// Record a consumption event at the clock's now.
    ///
    /// Sets the undo token, evaluates limit triggers against the before and
    /// after counts, and refreshes the widget projection. Triggers fire only
    /// here -- never from queries or background re-evaluation.
    ///
    /// # Errors
    /// Returns an error if the durable insert fails. A failed projection
    /// write is swallowed; the log itself has already committed.
    pub fn log(
        &mut self,
        quantity: i64,
        source: &str,
        note: Option<&str>,
        limits: &LimitConfig,
    ) -> Result<LogEntry> {
        let now = self.clock.now();
        let before = self.today_count()?;

        let mut entry = LogEntry::at(now, quantity, Some(source));
        if let Some(note) = note {
            entry = entry.with_note(note);
        }
        self.db.insert(&entry)?;
        self.undo = Some(UndoToken {
            entry_id: entry.id,
            logged_at: now,
        });

        let after = self.today_count()?;
        if limits.enabled {
            if !limits.is_approaching(before) && limits.is_approaching(after) {
                self.notifier.schedule_approaching(after, limits.limit);
            }
            if after == limits.limit {
                self.notifier.schedule_limit_reached(limits.limit);
            }
        }

        self.push_projection();
        Ok(entry)
    }

    /// Whether the last log is still inside the undo window.
    pub fn can_undo(&self) -> bool {
        match self.undo {
            Some(token) => {
                self.clock.now() - token.logged_at < Duration::seconds(UNDO_WINDOW_SECS)
            }
            None => false,
        }
    }

    /// Delete the last-logged entry if still undoable. Returns whether an
    /// entry was removed; calling again is a no-op because the first call
    /// cleared the token.
    pub fn undo_last(&mut self) -> Result<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        // can_undo checked the token exists
        let token = self.undo.take();
        let removed = match token {
            Some(token) => self.db.delete(&token.entry_id)?,
            None => false,
        };
        self.push_projection();
        Ok(removed)
    }

    /// Delete an arbitrary entry. Clears the undo token first when it
    /// references the same entry, so a later undo cannot resurrect the id.
    pub fn delete_entry(&mut self, id: &Uuid) -> Result<bool> {
        if self.undo.map(|t| t.entry_id) == Some(*id) {
            self.undo = None;
        }
        let removed = self.db.delete(id)?;
        self.push_projection();
        Ok(removed)
    }

    /// Move an entry to a new timestamp. Returns false when the id is absent.
    pub fn retime_entry(&mut self, id: &Uuid, timestamp: DateTime<Utc>) -> Result<bool> {
        let moved = self.db.retime(id, timestamp)?;
        self.push_projection();
        Ok(moved)
    }

    // --- Queries ---

    /// Sum of quantities in `[start, end)`. Building block for every
    /// windowed count.
    pub fn count_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        Ok(self.db.sum_in_range(start, end)?)
    }

    pub fn today_count(&self) -> Result<i64> {
        self.count_for_day(self.clock.now())
    }

    /// Total for the calendar day containing `instant`. Past and future
    /// days take the same path as today.
    pub fn count_for_day(&self, instant: DateTime<Utc>) -> Result<i64> {
        let (start, end) = day_bucket(self.clock.as_ref(), instant);
        self.count_in_range(start, end)
    }

    /// Per-day counts for the `days` calendar days ending today, oldest
    /// first. Always exactly `days` entries; zero-event days count as zero.
    pub fn daily_series(&self, days: u32) -> Result<Vec<DayCount>> {
        // walk calendar days through the clock rather than subtracting
        // 24-hour multiples, so DST-length days stay aligned to midnight
        let mut starts = Vec::with_capacity(days as usize);
        let mut start = self.clock.start_of_day(self.clock.now());
        for _ in 0..days {
            starts.push(start);
            start = prev_day_start(self.clock.as_ref(), start);
        }

        let mut series = Vec::with_capacity(days as usize);
        for start in starts.into_iter().rev() {
            let end = next_day_start(self.clock.as_ref(), start);
            let count = self.count_in_range(start, end)?;
            series.push(DayCount { date: start, count });
        }
        Ok(series)
    }

    /// Mean daily count over the window. The denominator is always `days`,
    /// so zero-event days pull the average down.
    pub fn average(&self, days: u32) -> Result<f64> {
        let total: i64 = self.daily_series(days)?.iter().map(|d| d.count).sum();
        Ok(total as f64 / f64::from(days))
    }

    pub fn all_time_total(&self) -> Result<i64> {
        Ok(self.db.total()?)
    }

    /// Every entry, newest first.
    pub fn all_entries(&self) -> Result<Vec<LogEntry>> {
        Ok(self.db.all_entries()?)
    }

    /// Entries at or after `cutoff`, bucketed by calendar day: days newest
    /// first, entries within a day newest first.
    pub fn grouped_history(&self, cutoff: DateTime<Utc>) -> Result<Vec<DayGroup>> {
        let mut groups: Vec<DayGroup> = Vec::new();
        for entry in self.all_entries()? {
            if entry.timestamp < cutoff {
                continue;
            }
            let day = self.clock.start_of_day(entry.timestamp);
            match groups.last_mut() {
                // all_entries is timestamp-descending, so same-day entries
                // are contiguous
                Some(group) if group.day == day => {
                    group.total += entry.quantity;
                    group.entries.push(entry);
                }
                _ => groups.push(DayGroup {
                    day,
                    total: entry.quantity,
                    entries: vec![entry],
                }),
            }
        }
        Ok(groups)
    }

    /// Full history as CSV, oldest first.
    pub fn export_csv(&self) -> Result<String> {
        Ok(export::to_csv(&self.all_entries()?))
    }

    // --- Sync bridge ---

    /// Fold the externally queued pending logs into the event store.
    ///
    /// Each queue entry is validated individually; malformed entries are
    /// dropped and counted, never blocking the rest. The queue is cleared
    /// only after every valid entry has been inserted.
    ///
    /// # Errors
    /// Returns an error if the queue cannot be read/cleared or an insert
    /// fails. Malformed entries are not errors.
    pub fn merge_pending(&mut self, store: &SharedStore) -> Result<MergeOutcome> {
        let queued = store.pending()?;
        if queued.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let mut outcome = MergeOutcome::default();
        for raw in &queued {
            match PendingLog::parse(raw) {
                Ok(pending) => {
                    self.db.insert(&pending.into_entry())?;
                    outcome.merged += 1;
                }
                Err(_) => outcome.skipped += 1,
            }
        }
        store.clear_pending()?;
        self.push_projection();
        Ok(outcome)
    }

    /// Recompute today's count into the shared store.
    ///
    /// # Errors
    /// Returns an error if the count query or the store write fails.
    pub fn refresh_projection(&self) -> Result<()> {
        if let Some(bridge) = &self.bridge {
            bridge.write_projection(self.today_count()?, self.clock.now())?;
        }
        Ok(())
    }

    /// Best-effort projection push after a mutation. A widget that briefly
    /// shows a stale count is acceptable; failing the originating mutation
    /// is not.
    fn push_projection(&self) {
        let _ = self.refresh_projection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingNotifier {
        approaching: AtomicUsize,
        reached: AtomicUsize,
    }

    impl Notifier for Arc<RecordingNotifier> {
        fn schedule_approaching(&self, _current_count: i64, _limit: i64) {
            self.approaching.fetch_add(1, Ordering::SeqCst);
        }
        fn schedule_limit_reached(&self, _limit: i64) {
            self.reached.fetch_add(1, Ordering::SeqCst);
        }
        fn schedule_daily_summary(&self, _hour: u32, _minute: u32) {}
        fn cancel(&self, _kind: crate::notify::NotificationKind) {}
    }

    fn tracker_at(now: &str) -> Tracker {
        let clock = ManualClock::new(now.parse().unwrap());
        Tracker::new(Database::open_memory().unwrap(), Box::new(clock))
    }

    fn limits(limit: i64, threshold: f64) -> LimitConfig {
        LimitConfig {
            enabled: true,
            limit,
            approach_threshold: threshold,
        }
    }

    #[test]
    fn approaching_fires_once_on_crossing() {
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = ManualClock::new("2026-01-13T10:00:00Z".parse().unwrap());
        let mut tracker = Tracker::new(Database::open_memory().unwrap(), Box::new(clock))
            .with_notifier(Box::new(Arc::clone(&notifier)));
        let cfg = limits(10, 0.8);

        for _ in 0..7 {
            tracker.log(1, "home_button", None, &cfg).unwrap();
        }
        assert_eq!(notifier.approaching.load(Ordering::SeqCst), 0);

        // 8 of 10 crosses the 0.8 threshold
        tracker.log(1, "home_button", None, &cfg).unwrap();
        assert_eq!(notifier.approaching.load(Ordering::SeqCst), 1);

        // still approaching, but not a crossing
        tracker.log(1, "home_button", None, &cfg).unwrap();
        assert_eq!(notifier.approaching.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.reached.load(Ordering::SeqCst), 0);

        // landing exactly on the limit
        tracker.log(1, "home_button", None, &cfg).unwrap();
        assert_eq!(notifier.reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn limit_reached_requires_exact_landing() {
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = ManualClock::new("2026-01-13T10:00:00Z".parse().unwrap());
        let mut tracker = Tracker::new(Database::open_memory().unwrap(), Box::new(clock))
            .with_notifier(Box::new(Arc::clone(&notifier)));
        let cfg = limits(10, 0.8);

        // 9 then a batch of 2 jumps over the limit without landing on it
        tracker.log(9, "home_button", None, &cfg).unwrap();
        tracker.log(2, "home_button", None, &cfg).unwrap();
        assert_eq!(notifier.reached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disabled_limit_never_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = ManualClock::new("2026-01-13T10:00:00Z".parse().unwrap());
        let mut tracker = Tracker::new(Database::open_memory().unwrap(), Box::new(clock))
            .with_notifier(Box::new(Arc::clone(&notifier)));
        let cfg = LimitConfig {
            enabled: false,
            ..limits(10, 0.8)
        };

        tracker.log(10, "home_button", None, &cfg).unwrap();
        assert_eq!(notifier.approaching.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.reached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn delete_of_tokened_entry_disarms_undo() {
        let mut tracker = tracker_at("2026-01-13T10:00:00Z");
        let entry = tracker
            .log(1, "home_button", None, &LimitConfig::default())
            .unwrap();
        assert!(tracker.can_undo());

        tracker.delete_entry(&entry.id).unwrap();
        assert!(!tracker.can_undo());
        assert!(!tracker.undo_last().unwrap());
        assert_eq!(tracker.all_time_total().unwrap(), 0);
    }
}
