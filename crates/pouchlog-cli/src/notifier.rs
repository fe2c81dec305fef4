//! Console notifier: prints notification lines instead of scheduling
//! platform notifications, gated by the user's notification settings.

use pouchlog_core::storage::NotificationSettings;
use pouchlog_core::{NotificationKind, Notifier};

pub struct ConsoleNotifier {
    settings: NotificationSettings,
}

impl ConsoleNotifier {
    pub fn new(settings: NotificationSettings) -> Self {
        Self { settings }
    }
}

impl Notifier for ConsoleNotifier {
    fn schedule_approaching(&self, current_count: i64, limit: i64) {
        if self.settings.enabled && self.settings.approaching_limit {
            println!("notice: approaching daily limit ({current_count} of {limit})");
        }
    }

    fn schedule_limit_reached(&self, limit: i64) {
        if self.settings.enabled && self.settings.limit_reached {
            println!("notice: daily limit of {limit} reached");
        }
    }

    fn schedule_daily_summary(&self, hour: u32, minute: u32) {
        if self.settings.enabled && self.settings.daily_summary_enabled {
            println!("notice: daily summary scheduled for {hour:02}:{minute:02}");
        }
    }

    fn cancel(&self, _kind: NotificationKind) {}
}
