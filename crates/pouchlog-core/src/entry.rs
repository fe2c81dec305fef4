use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged consumption record.
///
/// The timestamp is the point in time the entry is *attributed* to, not
/// necessarily when it was created -- entries can be backdated or retimed.
/// `quantity` is not validated at this layer: aggregation arithmetic has to
/// stay correct for zero and negative values because nothing upstream
/// rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub quantity: i64,
    pub source: Option<String>,
    pub note: Option<String>,
}

impl LogEntry {
    /// Build an entry at an explicit timestamp.
    ///
    /// `Tracker::log` is the normal entry point (it stamps the injected
    /// clock's now); this constructor serves backdated inserts, the pending
    /// queue merge, and tests.
    pub fn at(timestamp: DateTime<Utc>, quantity: i64, source: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            quantity,
            source: source.map(str::to_string),
            note: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}
