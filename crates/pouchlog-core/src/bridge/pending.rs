//! Typed validation of externally queued log entries.
//!
//! The widget/shortcut process appends loosely-typed JSON objects to the
//! shared store's `pendingLogs` queue. Each object is parsed into a
//! [`PendingLog`] before it is allowed anywhere near the event store; a
//! malformed object is skipped individually and never blocks the rest of
//! the queue.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entry::LogEntry;
use crate::error::MalformedEntry;

/// A validated inbound queue entry: `{timestamp, quantity, source}` with
/// the timestamp in fractional epoch seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLog {
    pub timestamp: DateTime<Utc>,
    pub quantity: i64,
    pub source: String,
}

impl PendingLog {
    /// Parse one queued object, checking presence and type of every field.
    pub fn parse(value: &Value) -> Result<Self, MalformedEntry> {
        let obj = value.as_object().ok_or(MalformedEntry {
            field: "entry",
            reason: "is not an object",
        })?;

        let epoch = obj
            .get("timestamp")
            .ok_or(MalformedEntry {
                field: "timestamp",
                reason: "is missing",
            })?
            .as_f64()
            .ok_or(MalformedEntry {
                field: "timestamp",
                reason: "is not a number",
            })?;
        let timestamp = DateTime::from_timestamp_millis((epoch * 1000.0).round() as i64)
            .ok_or(MalformedEntry {
                field: "timestamp",
                reason: "is out of range",
            })?;

        let quantity = obj
            .get("quantity")
            .ok_or(MalformedEntry {
                field: "quantity",
                reason: "is missing",
            })?
            .as_i64()
            .ok_or(MalformedEntry {
                field: "quantity",
                reason: "is not an integer",
            })?;

        let source = obj
            .get("source")
            .ok_or(MalformedEntry {
                field: "source",
                reason: "is missing",
            })?
            .as_str()
            .ok_or(MalformedEntry {
                field: "source",
                reason: "is not a string",
            })?
            .to_string();

        Ok(Self {
            timestamp,
            quantity,
            source,
        })
    }

    pub fn into_entry(self) -> LogEntry {
        LogEntry::at(self.timestamp, self.quantity, Some(&self.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_entry_parses() {
        let parsed =
            PendingLog::parse(&json!({"timestamp": 1773661200.5, "quantity": 2, "source": "widget"}))
                .unwrap();
        assert_eq!(parsed.quantity, 2);
        assert_eq!(parsed.source, "widget");
        assert_eq!(parsed.timestamp.timestamp_millis(), 1_773_661_200_500);
    }

    #[test]
    fn missing_and_mistyped_fields_are_rejected() {
        let missing = PendingLog::parse(&json!({"quantity": 1, "source": "widget"}));
        assert_eq!(missing.unwrap_err().field, "timestamp");

        let mistyped =
            PendingLog::parse(&json!({"timestamp": 1.0, "quantity": "two", "source": "widget"}));
        assert_eq!(mistyped.unwrap_err().field, "quantity");

        let not_object = PendingLog::parse(&json!([1, 2, 3]));
        assert_eq!(not_object.unwrap_err().field, "entry");
    }

    #[test]
    fn fractional_quantity_is_not_an_integer() {
        let parsed =
            PendingLog::parse(&json!({"timestamp": 1.0, "quantity": 1.5, "source": "widget"}));
        assert!(parsed.is_err());
    }
}
