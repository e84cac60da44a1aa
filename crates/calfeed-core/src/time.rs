//! Time windows for recurrence expansion and range queries.
//!
//! [`TimeWindow`] is a half-open UTC interval. [`ExpansionWindow`] describes
//! the `± N months` span a feed is expanded over and resolves it against the
//! current time.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a new time window, returning `None` if `start` is after `end`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a window covering whole UTC days, from midnight of `first`
    /// up to midnight after `last`.
    pub fn for_days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        let end = last.succ_opt()?;
        Self::try_new(start_of_day(first), start_of_day(end))
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }
}

/// The `± months` span around "now" that recurring events are expanded over.
///
/// Both bounds are aligned to UTC midnight so that a zero-month window still
/// covers the whole current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpansionWindow {
    /// Number of months on either side of the reference date.
    pub months: u32,
}

impl ExpansionWindow {
    /// Creates an expansion window of `months` on either side of now.
    pub fn new(months: u32) -> Self {
        Self { months }
    }

    /// Resolves the window against the current time.
    pub fn resolve_now(&self) -> TimeWindow {
        self.resolve(Utc::now())
    }

    /// Resolves the window against a reference instant.
    ///
    /// Yields `[midnight(now - months), midnight(now + months) + 1 day)`.
    /// Month arithmetic saturates at the limits of the calendar.
    pub fn resolve(&self, now: DateTime<Utc>) -> TimeWindow {
        let today = now.date_naive();
        let span = Months::new(self.months);
        let first = today.checked_sub_months(span).unwrap_or(NaiveDate::MIN);
        let last = today.checked_add_months(span).unwrap_or(NaiveDate::MAX);
        let end = last
            .succ_opt()
            .map(start_of_day)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        TimeWindow {
            start: start_of_day(first),
            end,
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
