//! Time slot calculation.
//!
//! Computes the next start and end for a worker, given the end of its last
//! committed task, the inter-task gap and the working day.
//!
//! # Algorithm
//! 1. A worker with no committed task starts at the opening of the anchor
//!    date.
//! 2. Otherwise the candidate start is `last_end + gap`, clamped up to that
//!    day's opening.
//! 3. If the task starts before closing and ends no later than closing on
//!    the candidate's day, keep the candidate.
//! 4. Otherwise roll over to the next calendar day's opening.
//!
//! A task longer than the whole working day never fits; it is placed at an
//! opening and overflows past closing in calendar time. It is not split.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{TimeWindow, WorkCalendar};

/// Slot calculator for one planning policy.
#[derive(Debug, Clone, Copy)]
pub struct SlotCalculator {
    calendar: WorkCalendar,
    gap_minutes: i64,
}

impl SlotCalculator {
    /// Creates a calculator.
    pub fn new(calendar: WorkCalendar, gap_minutes: i64) -> Self {
        Self {
            calendar,
            gap_minutes,
        }
    }

    /// Working day used for placement.
    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Next slot of `duration_minutes` for a worker.
    ///
    /// `anchor` is the date used when the worker has no committed task.
    /// Returns `None` when the slot falls outside the representable
    /// date range.
    pub fn next_slot(
        &self,
        last_end: Option<NaiveDateTime>,
        duration_minutes: i64,
        anchor: NaiveDate,
    ) -> Option<TimeWindow> {
        let duration = Duration::try_minutes(duration_minutes)?;

        let start = match last_end {
            None => self.calendar.opening(anchor),
            Some(last) => {
                let candidate = last.checked_add_signed(Duration::try_minutes(self.gap_minutes)?)?;
                let opening = self.calendar.opening(candidate.date());
                let candidate = candidate.max(opening);
                let fits = candidate
                    .checked_add_signed(duration)
                    .is_some_and(|end| self.calendar.fits_same_day(candidate, end));
                let longer_than_day = duration_minutes > self.calendar.day_length_minutes();

                if fits || (candidate == opening && longer_than_day) {
                    candidate
                } else {
                    self.calendar.next_opening(candidate)?
                }
            }
        };

        Some(TimeWindow::new(start, start.checked_add_signed(duration)?))
    }
}
