//! # Pouchlog Core Library
//!
//! Core business logic for Pouchlog, a local-only pouch consumption
//! tracker. All operations are available via a standalone CLI binary; any
//! richer surface (widget, GUI) is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Event Store**: SQLite-backed append/delete log of quantity events,
//!   the single source of truth
//! - **Tracker**: derivations over the store (day buckets, rolling windows,
//!   averages, limit classification, CSV export) plus a 30-second
//!   single-step undo
//! - **Sync Bridge**: mirrors a minimal projection into a shared JSON store
//!   for a widget process, and folds that process's queued logs back in
//!
//! There is no remote state: no networking, no sync service, no accounts.
//!
//! ## Key Components
//!
//! - [`Tracker`]: the aggregation and limit-tracking engine
//! - [`Database`]: durable event storage
//! - [`Settings`]: user preferences (TOML)
//! - [`SharedStore`]: cross-process widget store
//! - [`Clock`] / [`Notifier`]: injected time and notification capabilities

pub mod bridge;
pub mod clock;
pub mod entry;
pub mod error;
pub mod export;
pub mod limits;
pub mod notify;
pub mod storage;
pub mod tracker;

pub use bridge::{MergeOutcome, PendingLog, SharedStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::LogEntry;
pub use error::{BridgeError, CoreError, MalformedEntry, SettingsError, StorageError};
pub use limits::{LimitConfig, LimitStatus};
pub use notify::{sync_daily_summary, NotificationKind, Notifier, NullNotifier};
pub use storage::{Database, Settings};
pub use tracker::{DayCount, DayGroup, Tracker, UNDO_WINDOW_SECS};
