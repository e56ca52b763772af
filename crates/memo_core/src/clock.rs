//! Time sources for note timestamps.
//!
//! # Responsibility
//! - Produce ISO-8601 UTC timestamps in one fixed-width format.
//! - Provide the calendar date used for backup file names.
//! - Let callers inject deterministic time for tests.
//!
//! # Invariants
//! - Every timestamp has the shape `YYYY-MM-DDTHH:MM:SS.sssZ`, so string
//!   comparison matches chronological order.

use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, Utc};
use std::cell::Cell;

/// Source of "now" for note lifecycle timestamps.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current instant as a fixed-width ISO-8601 string.
    fn now_iso(&self) -> String {
        format_timestamp(self.now())
    }

    /// Calendar date in the user's zone.
    fn local_date(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall-clock implementation backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Each call returns a strictly later timestamp, which keeps
/// `updatedAt` ordering observable in tests without sleeping. Its local
/// zone is UTC.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Creates a clock starting at `start` that advances by `step_ms` per read.
    pub fn new(start: DateTime<Utc>, step_ms: i64) -> Self {
        Self {
            next: Cell::new(start),
            step: Duration::milliseconds(step_ms),
        }
    }

    /// Starts at 2024-01-01T00:00:00.000Z and steps one second per read.
    pub fn starting_at_epoch_2024() -> Self {
        let start = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.000Z")
            .map(|value| value.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Self::new(start, 1_000)
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }

    /// Date of the next reading, without advancing.
    fn local_date(&self) -> NaiveDate {
        self.next.get().date_naive()
    }
}

/// Formats a UTC instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, Clock, SteppingClock, SystemClock};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn format_is_fixed_width_millis_utc() {
        let value = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(value), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn stepping_clock_is_strictly_increasing() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let first = clock.now_iso();
        let second = clock.now_iso();
        assert_eq!(first, "2024-01-01T00:00:00.000Z");
        assert!(second > first);
    }

    #[test]
    fn stepping_clock_date_does_not_advance() {
        let start = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        let clock = SteppingClock::new(start, 1_000);
        assert_eq!(clock.local_date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(clock.local_date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        let _ = clock.now();
        assert_eq!(clock.local_date(), NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }

    #[test]
    fn system_clock_matches_format_length() {
        assert_eq!(SystemClock.now_iso().len(), "2024-01-01T00:00:00.000Z".len());
    }
}
