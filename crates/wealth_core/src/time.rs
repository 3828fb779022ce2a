//! Month-granular time axis.
//!
//! The simulation steps month by month, never day by day, so this axis
//! only needs a dense, monotone integer key and a handful of
//! calendar-free operations on it. No date library is needed at all;
//! ISO rendering is a plain format string.

use serde::{Deserialize, Serialize};

/// `year * 100 + month`. Monotone across months; total-ordered by value.
pub type MonthKey = i32;

/// Build a month key from calendar year/month. `month` is clamped to
/// `[1, 12]` so malformed input cannot desync the ordering.
pub fn month_key(year: i32, month: u32) -> MonthKey {
    let month = month.clamp(1, 12) as i32;
    year * 100 + month
}

/// Split a month key back into `(year, month)`.
pub fn split(key: MonthKey) -> (i32, u32) {
    (key.div_euclid(100), key.rem_euclid(100) as u32)
}

/// The month key immediately following `key`, rolling December into
/// January of the next year.
pub fn next(key: MonthKey) -> MonthKey {
    let (year, month) = split(key);
    if month >= 12 {
        month_key(year + 1, 1)
    } else {
        month_key(year, month + 1)
    }
}

/// Number of whole months between `from` and `to` (may be negative).
/// `months_between(202401, 202403) == 2`.
pub fn months_between(from: MonthKey, to: MonthKey) -> i64 {
    let (fy, fm) = split(from);
    let (ty, tm) = split(to);
    (ty as i64 - fy as i64) * 12 + (tm as i64 - fm as i64)
}

/// Render a month key as an ISO-8601 date string with `day = 1`.
pub fn to_iso_date(key: MonthKey) -> String {
    let (year, month) = split(key);
    format!("{year:04}-{month:02}-01")
}

/// An inclusive, optionally open-ended span of month keys.
///
/// A `None` bound means "unbounded on that side" — this is the "window"
/// primitive reused by account active-windows, transaction windows, and
/// schedule entry windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Option<MonthKey>,
    pub end: Option<MonthKey>,
}

impl Window {
    pub fn new(start: Option<MonthKey>, end: Option<MonthKey>) -> Self {
        Window { start, end }
    }

    pub fn unbounded() -> Self {
        Window {
            start: None,
            end: None,
        }
    }

    pub fn closed(start: MonthKey, end: MonthKey) -> Self {
        Window {
            start: Some(start),
            end: Some(end),
        }
    }

    /// `(start is None or key >= start) and (end is None or key <= end)`.
    ///
    /// A window whose bounds are inverted (`end < start`) is treated as
    /// empty — the transaction it gates is never applicable.
    pub fn contains(&self, key: MonthKey) -> bool {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && end < start
        {
            return false;
        }
        self.start.is_none_or(|s| key >= s) && self.end.is_none_or(|e| key <= e)
    }

    /// Number of months in a closed window, inclusive on both ends.
    /// `None` if either bound is open.
    pub fn month_count(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => {
                Some(months_between(start, end) + 1)
            }
            (Some(start), Some(end)) if end < start => Some(0),
            _ => None,
        }
    }
}
