use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PastYearsWindow;

/// How far into the future a printed expiry date may plausibly lie.
pub const FUTURE_YEARS: u32 = 10;

/// Two-digit years above this pivot belong to the 1900s, the rest to the 2000s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The reasonableness window around `today`: from `past` calendar years
    /// back up to [`FUTURE_YEARS`] ahead, both ends inclusive.
    pub fn reasonable_expiry(today: NaiveDate, past: PastYearsWindow) -> Self {
        let start = today
            .checked_sub_months(Months::new(12 * past.get()))
            .unwrap_or(NaiveDate::MIN);
        let end = today
            .checked_add_months(Months::new(12 * FUTURE_YEARS))
            .unwrap_or(NaiveDate::MAX);
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Builds a calendar date from loose numeric parts and accepts it only if
    /// the parts round-trip exactly and the date lies inside this range.
    pub fn accept(self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        // from_ymd_opt never rolls over: Feb 31 is None, not Mar 3.
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        if !self.contains(date) {
            tracing::trace!(%date, window = %self, "date outside reasonableness window");
            return None;
        }
        Some(date)
    }

    /// Same as [`DateRange::accept`] for layouts that only print a month:
    /// the date is the last day of that month.
    pub fn accept_month_end(self, year: i32, month: u32) -> Option<NaiveDate> {
        let last = end_of_month(year, month)?;
        self.accept(last.year(), last.month(), last.day())
    }
}

/// Expands a printed year: values already >= 100 pass through, 51..=99 map
/// to the 1900s and 0..=50 to the 2000s.
pub fn expand_year(year: i32) -> i32 {
    match year {
        y if y >= 100 => y,
        y if y > TWO_DIGIT_YEAR_PIVOT => 1900 + y,
        y => 2000 + y,
    }
}

/// Last calendar day of the given month, or `None` if the month is invalid.
pub fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Days from `today` until `expiry` (negative once expired).
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}
