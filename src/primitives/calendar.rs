//! Calendar helpers for analog exclusion windows.
//!
//! ## Purpose
//!
//! Daily analog searches restrict candidates to a window of calendar days
//! around the target's date in other years. This module answers "is this
//! candidate date inside the window" while handling the December/January
//! wraparound and leap years.
//!
//! ## Key concepts
//!
//! * **Anniversary**: the target's month/day placed in another year. The
//!   anniversary of 29 February in a common year is 28 February.
//! * **Window**: all dates within `half_width` days of an anniversary, so every
//!   window spans exactly `2 * half_width + 1` calendar days whether or not it
//!   contains a 29 February.
//!
//! ## Invariants
//!
//! * `half_width` is at most [`MAX_HALF_WIDTH`], so the windows of two
//!   consecutive anniversaries never overlap.

use chrono::{Datelike, NaiveDate};

/// Largest admissible half-width (days) of a day-of-year window.
pub const MAX_HALF_WIDTH: u32 = 182;

/// The target's month/day placed in `year`.
///
/// Returns `None` only for years outside chrono's supported range.
pub fn anniversary(target: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, target.month(), target.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, target.month(), target.day() - 1))
}

/// Whether `candidate` lies within `half_width` days of the target's
/// anniversary in the candidate's year or one of its neighbours.
///
/// Neighbouring years are checked so that a window around 28 December also
/// catches early January of the following year, and vice versa.
pub fn within_day_window(target: NaiveDate, candidate: NaiveDate, half_width: u32) -> bool {
    let year = candidate.year();
    [year - 1, year, year + 1].into_iter().any(|y| {
        anniversary(target, y)
            .map(|anchor| (candidate - anchor).num_days().unsigned_abs() <= u64::from(half_width))
            .unwrap_or(false)
    })
}

/// Whether two dates fall in the same calendar month (any year).
#[inline]
pub fn same_calendar_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.month() == b.month()
}

/// Whether two dates fall in the same calendar year.
#[inline]
pub fn same_year(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year()
}
