//! Business-day calendar and time window models.
//!
//! Every worker shares one fixed daily working window (e.g. 09:00–17:00).
//! Tasks may start only inside the window. There are no holidays or
//! per-worker absences.
//!
//! # Time Model
//! All timestamps are naive local date-times. The consumer decides which
//! time zone they are expressed in.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Duration of this window in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Fixed daily working window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// Opening time of every business day.
    pub day_start: NaiveTime,
    /// Closing time of every business day.
    pub day_end: NaiveTime,
}

impl WorkCalendar {
    /// Creates a calendar with the given opening and closing times.
    pub fn new(day_start: NaiveTime, day_end: NaiveTime) -> Self {
        Self { day_start, day_end }
    }

    /// Length of one working day in minutes. Zero or negative when the
    /// window is misconfigured.
    pub fn day_length_minutes(&self) -> i64 {
        (self.day_end - self.day_start).num_minutes()
    }

    /// Opening timestamp on a date.
    #[inline]
    pub fn opening(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.day_start)
    }

    /// Closing timestamp on a date.
    #[inline]
    pub fn closing(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.day_end)
    }

    /// Working window of a date.
    pub fn window(&self, date: NaiveDate) -> TimeWindow {
        TimeWindow::new(self.opening(date), self.closing(date))
    }

    /// Opening of the calendar day following `at`. `None` past the last
    /// representable date.
    pub fn next_opening(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        at.date().succ_opt().map(|date| self.opening(date))
    }

    /// Whether a timestamp is within working time.
    pub fn is_working_time(&self, at: NaiveDateTime) -> bool {
        self.window(at.date()).contains(at)
    }

    /// Whether `[start, end)` starts before closing and ends no later than
    /// closing, both on the calendar day of `start`.
    pub fn fits_same_day(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let closing = self.closing(start.date());
        start < closing && end <= closing
    }
}

impl Default for WorkCalendar {
    /// 09:00–17:00.
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}
