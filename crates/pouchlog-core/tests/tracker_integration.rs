//! Integration tests for the aggregation engine.
//!
//! Exercises logging, undo, day bucketing and rolling windows end to end
//! against an in-memory event store with an injected clock.

use chrono::{DateTime, Duration, Utc};
use pouchlog_core::{Database, LimitConfig, LogEntry, ManualClock, Tracker};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn tracker_at(now: &str) -> (Tracker, ManualClock) {
    let clock = ManualClock::new(ts(now));
    let tracker = Tracker::new(Database::open_memory().unwrap(), Box::new(clock.clone()));
    (tracker, clock)
}

fn no_limit() -> LimitConfig {
    LimitConfig::default()
}

#[test]
fn today_count_sums_quantities() {
    let (mut tracker, clock) = tracker_at("2026-01-13T10:00:00Z");

    tracker.log(2, "home_button", None, &no_limit()).unwrap();
    clock.advance(Duration::seconds(1));
    tracker.log(3, "home_button", None, &no_limit()).unwrap();

    // an entry from yesterday must not leak into today
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-01-12T22:00:00Z"), 7, None))
        .unwrap();

    assert_eq!(tracker.today_count().unwrap(), 5);
    assert_eq!(tracker.all_time_total().unwrap(), 12);
}

#[test]
fn undo_within_window_removes_only_last_log() {
    // Scenario: qty 2 at T0, qty 3 at T0+1s, undo removes the qty 3 entry
    let (mut tracker, clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(2, "home_button", None, &no_limit()).unwrap();
    clock.advance(Duration::seconds(1));
    tracker.log(3, "home_button", None, &no_limit()).unwrap();
    assert_eq!(tracker.today_count().unwrap(), 5);

    clock.advance(Duration::seconds(10));
    assert!(tracker.can_undo());
    assert!(tracker.undo_last().unwrap());
    assert_eq!(tracker.today_count().unwrap(), 2);
}

#[test]
fn undo_twice_is_a_no_op_the_second_time() {
    let (mut tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(1, "home_button", None, &no_limit()).unwrap();

    assert!(tracker.undo_last().unwrap());
    let count_after_first = tracker.today_count().unwrap();
    assert!(!tracker.undo_last().unwrap());
    assert_eq!(tracker.today_count().unwrap(), count_after_first);
    assert_eq!(count_after_first, 0);
}

#[test]
fn undo_expires_after_thirty_seconds() {
    let (mut tracker, clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(1, "home_button", None, &no_limit()).unwrap();

    clock.advance(Duration::seconds(29));
    assert!(tracker.can_undo());
    clock.advance(Duration::seconds(1));
    assert!(!tracker.can_undo());
    assert!(!tracker.undo_last().unwrap());
    assert_eq!(tracker.today_count().unwrap(), 1);
}

#[test]
fn day_boundary_is_exact() {
    // Scenario: 23:59:59 yesterday vs 00:00:00 today
    let (tracker, _clock) = tracker_at("2026-01-13T08:00:00Z");
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-01-12T23:59:59Z"), 5, None))
        .unwrap();
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-01-13T00:00:00Z"), 3, None))
        .unwrap();

    assert_eq!(tracker.count_for_day(ts("2026-01-12T12:00:00Z")).unwrap(), 5);
    assert_eq!(tracker.today_count().unwrap(), 3);
}

#[test]
fn count_for_day_handles_past_and_future_alike() {
    let (tracker, _clock) = tracker_at("2026-01-13T08:00:00Z");
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-02-01T12:00:00Z"), 4, None))
        .unwrap();

    assert_eq!(tracker.count_for_day(ts("2026-02-01T00:00:00Z")).unwrap(), 4);
    assert_eq!(tracker.count_for_day(ts("2025-06-01T00:00:00Z")).unwrap(), 0);
}

#[test]
fn daily_series_covers_exact_window() {
    let (mut tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(2, "home_button", None, &no_limit()).unwrap();
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-01-07T12:00:00Z"), 9, None))
        .unwrap();
    // just outside a 7-day window
    tracker
        .db()
        .insert(&LogEntry::at(ts("2026-01-06T12:00:00Z"), 100, None))
        .unwrap();

    let series = tracker.daily_series(7).unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].date, ts("2026-01-07T00:00:00Z"));
    assert_eq!(series[0].count, 9);
    assert_eq!(series[6].date, ts("2026-01-13T00:00:00Z"));
    assert_eq!(series[6].count, 2);
    assert!(series.windows(2).all(|w| w[1].date - w[0].date == Duration::days(1)));
}

#[test]
fn average_divides_by_full_window() {
    let (mut tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(7, "home_button", None, &no_limit()).unwrap();

    // one day with 7, six empty days
    assert!((tracker.average(7).unwrap() - 1.0).abs() < f64::EPSILON);
    let expected_30 = 7.0 / 30.0;
    assert!((tracker.average(30).unwrap() - expected_30).abs() < f64::EPSILON);
}

#[test]
fn grouped_history_orders_days_and_entries_descending() {
    let (tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    let db = tracker.db();
    db.insert(&LogEntry::at(ts("2026-01-12T09:00:00Z"), 1, None)).unwrap();
    db.insert(&LogEntry::at(ts("2026-01-12T21:00:00Z"), 2, None)).unwrap();
    db.insert(&LogEntry::at(ts("2026-01-13T08:00:00Z"), 3, None)).unwrap();
    // older than the cutoff
    db.insert(&LogEntry::at(ts("2026-01-01T08:00:00Z"), 50, None)).unwrap();

    let groups = tracker.grouped_history(ts("2026-01-10T00:00:00Z")).unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].day, ts("2026-01-13T00:00:00Z"));
    assert_eq!(groups[0].total, 3);

    assert_eq!(groups[1].day, ts("2026-01-12T00:00:00Z"));
    assert_eq!(groups[1].total, 3);
    assert_eq!(groups[1].entries[0].quantity, 2);
    assert_eq!(groups[1].entries[1].quantity, 1);
}

#[test]
fn export_orders_chronologically_oldest_first() {
    let (tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    let db = tracker.db();
    // inserted out of order
    db.insert(&LogEntry::at(ts("2026-01-13T09:00:00Z"), 3, Some("widget"))).unwrap();
    db.insert(&LogEntry::at(ts("2026-01-11T09:00:00Z"), 1, Some("home_button"))).unwrap();
    db.insert(&LogEntry::at(ts("2026-01-12T09:00:00Z"), 2, None)).unwrap();

    let csv = tracker.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "timestamp,quantity,source,note");
    assert!(lines[1].starts_with("2026-01-11T09:00:00.000Z,1,home_button"));
    assert!(lines[2].starts_with("2026-01-12T09:00:00.000Z,2,"));
    assert!(lines[3].starts_with("2026-01-13T09:00:00.000Z,3,widget"));
}

#[test]
fn zero_and_negative_quantities_are_absorbed() {
    let (mut tracker, _clock) = tracker_at("2026-01-13T10:00:00Z");
    tracker.log(5, "home_button", None, &no_limit()).unwrap();
    tracker.log(0, "home_button", None, &no_limit()).unwrap();
    tracker.log(-2, "correction", None, &no_limit()).unwrap();

    assert_eq!(tracker.today_count().unwrap(), 3);
    assert_eq!(tracker.all_time_total().unwrap(), 3);
}
