pub mod config;
pub mod entry;
pub mod export;
pub mod history;
pub mod limit;
pub mod log;
pub mod stats;
pub mod sync;

use pouchlog_core::{Database, Settings, SharedStore, SystemClock, Tracker};

use crate::notifier::ConsoleNotifier;

/// Open the event store and wire it to the system clock, the console
/// notifier and the widget shared store.
pub fn open_tracker(settings: &Settings) -> Result<Tracker, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bridge = SharedStore::open_default()?;
    Ok(Tracker::new(db, Box::new(SystemClock))
        .with_notifier(Box::new(ConsoleNotifier::new(settings.notifications.clone())))
        .with_bridge(bridge))
}
