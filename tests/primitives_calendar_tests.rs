#![cfg(feature = "dev")]

use chrono::{Datelike, NaiveDate};
use dynadj_rs::internals::primitives::calendar::{
    anniversary, same_calendar_month, same_year, within_day_window,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every day of `year` inside the window around `target`.
fn window_days(target: NaiveDate, year: i32, half_width: u32) -> usize {
    let mut day = date(year, 1, 1);
    let mut count = 0;
    while day.year() == year {
        if within_day_window(target, day, half_width) {
            count += 1;
        }
        day = day.succ_opt().unwrap();
    }
    count
}

#[test]
fn test_anniversary() {
    assert_eq!(anniversary(date(2001, 7, 4), 1987), Some(date(1987, 7, 4)));
    assert_eq!(anniversary(date(2000, 2, 29), 2001), Some(date(2001, 2, 28)));
    assert_eq!(anniversary(date(2000, 2, 29), 2004), Some(date(2004, 2, 29)));
}

#[test]
fn test_window_wraps_year_boundary() {
    let target = date(2001, 12, 28);
    assert!(within_day_window(target, date(2002, 1, 2), 5));
    assert!(!within_day_window(target, date(2002, 1, 3), 5));
    assert!(within_day_window(target, date(1999, 12, 23), 5));
    assert!(!within_day_window(target, date(1999, 12, 22), 5));

    let target = date(2001, 1, 2);
    assert!(within_day_window(target, date(1995, 12, 28), 5));
    assert!(!within_day_window(target, date(1995, 12, 27), 5));
}

#[test]
fn test_window_spans_fixed_number_of_days() {
    // A year-boundary window covers 2 * 5 + 1 = 11 days split across two
    // calendar years; each inner year sees 9 + 2 of them.
    for year in [1999, 2000, 2001] {
        assert_eq!(window_days(date(2010, 12, 28), year, 5), 11);
    }
}

#[test]
fn test_leap_day_window() {
    // Feb 29 falls back to Feb 28 in common years: 26 Feb .. 2 Mar.
    let target = date(2000, 2, 29);
    assert_eq!(window_days(target, 2001, 2), 5);
    assert!(within_day_window(target, date(2001, 3, 2), 2));
    assert!(!within_day_window(target, date(2001, 3, 3), 2));

    // In a leap year the window keeps its width.
    let target = date(2001, 3, 1);
    assert_eq!(window_days(target, 2004, 1), 3);
    assert!(within_day_window(target, date(2004, 2, 29), 1));
}

#[test]
fn test_month_and_year_helpers() {
    assert!(same_calendar_month(date(1990, 3, 1), date(2020, 3, 31)));
    assert!(!same_calendar_month(date(1990, 3, 1), date(1990, 4, 1)));
    assert!(same_year(date(1990, 1, 1), date(1990, 12, 31)));
    assert!(!same_year(date(1990, 12, 31), date(1991, 1, 1)));
}
