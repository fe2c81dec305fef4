//! CSV history export.

use crate::entry::LogEntry;

/// Header row of the export format.
pub const CSV_HEADER: &str = "timestamp,quantity,source,note";

/// Render entries as CSV, oldest first.
///
/// This is the one place that orders chronologically ascending; every
/// display query orders newest-first. Timestamps serialize as ISO-8601 UTC
/// with millisecond precision. Absent `source`/`note` render as empty
/// strings; `note` is always double-quoted, with embedded quotes doubled.
pub fn to_csv(entries: &[LogEntry]) -> String {
    let mut rows: Vec<&LogEntry> = entries.iter().collect();
    rows.sort_by_key(|e| e.timestamp);

    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for entry in rows {
        let timestamp = entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let source = entry.source.as_deref().unwrap_or("");
        let note = entry.note.as_deref().unwrap_or("").replace('"', "\"\"");
        csv.push_str(&format!(
            "{timestamp},{quantity},{source},\"{note}\"\n",
            quantity = entry.quantity,
        ));
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn rows_are_chronological_regardless_of_insert_order() {
        let entries = vec![
            LogEntry::at(ts("2026-01-13T12:00:00Z"), 2, Some("widget")),
            LogEntry::at(ts("2026-01-13T08:00:00Z"), 1, Some("home_button")),
            LogEntry::at(ts("2026-01-13T10:00:00Z"), 3, None),
        ];
        let csv = to_csv(&entries);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,quantity,source,note");
        assert_eq!(lines[1], "2026-01-13T08:00:00.000Z,1,home_button,\"\"");
        assert_eq!(lines[2], "2026-01-13T10:00:00.000Z,3,,\"\"");
        assert_eq!(lines[3], "2026-01-13T12:00:00.000Z,2,widget,\"\"");
    }

    #[test]
    fn note_quotes_are_escaped() {
        let entries = vec![
            LogEntry::at(ts("2026-01-13T08:00:00Z"), 1, None).with_note("said \"enough\""),
        ];
        let csv = to_csv(&entries);
        assert!(csv.ends_with(",1,,\"said \"\"enough\"\"\"\n"));
    }

    #[test]
    fn empty_store_exports_header_only() {
        assert_eq!(to_csv(&[]), "timestamp,quantity,source,note\n");
    }

    #[test]
    fn fractional_seconds_are_fixed_precision() {
        let entries = vec![LogEntry::at(ts("2026-01-13T08:00:00.123456Z"), 1, None)];
        let csv = to_csv(&entries);
        assert!(csv.contains("2026-01-13T08:00:00.123Z,1"));
    }
}
