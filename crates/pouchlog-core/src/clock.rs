//! Injected wall-clock and calendar abstraction.
//!
//! "Today" is always computed at query time against a [`Clock`], never
//! cached and never read from ambient global state, so day-boundary
//! behavior is deterministic under test.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};

/// Capability providing the current instant and calendar day boundaries.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// First instant of the calendar day containing `t`.
    fn start_of_day(&self, t: DateTime<Utc>) -> DateTime<Utc>;
}

/// Half-open `[start, end)` interval of the day containing `t`.
///
/// The end is the *next day's* start, not start + 24 h: a DST transition
/// makes a local calendar day 23 or 25 hours long, and a fixed-width bucket
/// would drop or double-count the shifted hour.
pub fn day_bucket(clock: &dyn Clock, t: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = clock.start_of_day(t);
    (start, next_day_start(clock, start))
}

/// Start of the day after the day beginning at `start`.
///
/// 36 hours past a day's start lands strictly inside the following day for
/// any day length between 23 and 25 hours.
pub fn next_day_start(clock: &dyn Clock, start: DateTime<Utc>) -> DateTime<Utc> {
    clock.start_of_day(start + Duration::hours(36))
}

/// Start of the day before the day beginning at `start`.
pub fn prev_day_start(clock: &dyn Clock, start: DateTime<Utc>) -> DateTime<Utc> {
    clock.start_of_day(start - Duration::seconds(1))
}

/// Real wall clock. Day boundaries follow the local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn start_of_day(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = t.with_timezone(&Local).date_naive().and_time(NaiveTime::MIN);
        // DST can make local midnight ambiguous or nonexistent; take the
        // earliest valid interpretation.
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    }
}

/// Settable clock with UTC day boundaries (for tests).
///
/// Clones share state, so a test can hand one clone to a tracker and keep
/// another to advance time.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn start_of_day(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        t.date_naive().and_time(NaiveTime::MIN).and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_day_bucket_is_half_open() {
        let clock = ManualClock::new("2026-03-10T15:30:00Z".parse().unwrap());
        let (start, end) = day_bucket(&clock, clock.now());
        assert_eq!(start, "2026-03-10T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2026-03-11T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn manual_clock_advance() {
        let clock = ManualClock::new("2026-03-10T23:59:59Z".parse().unwrap());
        clock.advance(Duration::seconds(1));
        assert_eq!(
            clock.start_of_day(clock.now()),
            "2026-03-11T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
