//! Notification triggers exposed by the core.
//!
//! The core never schedules platform notifications itself; it invokes an
//! injected [`Notifier`] when a log event crosses a limit boundary. Triggers
//! fire only immediately after a log event, never from a timer or a
//! background re-evaluation.

use crate::storage::NotificationSettings;

/// Identifier for a scheduled notification, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Approaching,
    LimitReached,
    DailySummary,
}

/// External notification scheduler, injected into the tracker.
pub trait Notifier {
    /// The day's count entered the approaching band for the first time.
    fn schedule_approaching(&self, current_count: i64, limit: i64);

    /// The day's count landed exactly on the configured limit.
    fn schedule_limit_reached(&self, limit: i64);

    /// Recurring end-of-day summary at the given local time.
    fn schedule_daily_summary(&self, hour: u32, minute: u32);

    fn cancel(&self, kind: NotificationKind);
}

/// No-op notifier for headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn schedule_approaching(&self, _current_count: i64, _limit: i64) {}
    fn schedule_limit_reached(&self, _limit: i64) {}
    fn schedule_daily_summary(&self, _hour: u32, _minute: u32) {}
    fn cancel(&self, _kind: NotificationKind) {}
}

/// Reconcile the recurring daily-summary schedule with the user's
/// notification preferences.
///
/// Called after a settings change: schedules the summary at the configured
/// local time when summaries are enabled, cancels it otherwise.
pub fn sync_daily_summary(notifier: &dyn Notifier, settings: &NotificationSettings) {
    if settings.enabled && settings.daily_summary_enabled {
        notifier.schedule_daily_summary(settings.daily_summary_hour, settings.daily_summary_minute);
    } else {
        notifier.cancel(NotificationKind::DailySummary);
    }
}
