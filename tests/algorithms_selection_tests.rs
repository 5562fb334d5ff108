#![cfg(feature = "dev")]

use chrono::{Datelike, NaiveDate};
use dynadj_rs::internals::algorithms::selection::{
    AnalogSelector, DistanceRecord, ExclusionPolicy, SearchTarget,
};
use dynadj_rs::internals::primitives::errors::AdjustmentError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Mid-month dates for `years` consecutive years starting at `start`.
fn monthly(start: i32, years: i32) -> Vec<NaiveDate> {
    (0..years * 12)
        .map(|k| date(start + k / 12, (k % 12) as u32 + 1, 15))
        .collect()
}

/// Every day from `start` to `end` inclusive.
fn daily(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Distance table scoring candidate `j` as `score(j)`.
fn table(indices: &[usize], score: impl Fn(usize) -> f64) -> Vec<DistanceRecord<f64>> {
    indices
        .iter()
        .map(|&index| DistanceRecord {
            index,
            distance: score(index),
        })
        .collect()
}

// ============================================================================
// Exclusion Policy Tests
// ============================================================================

#[test]
fn test_monthly_exclusion_drops_target_year() {
    // 3-year monthly series, target in year 2.
    let dates = monthly(2000, 3);
    let t = 12 + 4; // May 2001
    let target = SearchTarget::in_series(t, dates[t]);
    let selector = AnalogSelector::new(2, ExclusionPolicy::SameYearAndMonth);

    let eligible = selector.eligible(&target, &dates);
    assert_eq!(eligible, vec![4, 28]);

    let all: Vec<usize> = (0..dates.len()).collect();
    let mut records = table(&all, |j| j as f64);
    let pool = selector.select(&target, &dates, &mut records).unwrap();

    assert!(pool.indices().iter().all(|&j| dates[j].year() != 2001));
    assert!(pool.indices().iter().all(|&j| dates[j].month() == 5));
    assert_eq!(pool.indices(), vec![4, 28]);
}

#[test]
fn test_same_year_policy() {
    let dates = monthly(2000, 3);
    let target = SearchTarget::in_series(0, dates[0]);
    let selector = AnalogSelector::new(24, ExclusionPolicy::SameYear);
    let eligible = selector.eligible(&target, &dates);
    assert_eq!(eligible, (12..36).collect::<Vec<_>>());
}

#[test]
fn test_self_exclusion_in_same_series() {
    // One date per year: only self-exclusion and year exclusion apply.
    let dates: Vec<NaiveDate> = (0..5).map(|y| date(1990 + y, 6, 1)).collect();
    let target = SearchTarget::in_series(2, dates[2]);
    let selector = AnalogSelector::new(4, ExclusionPolicy::SameYear);

    let mut records = table(&[0, 1, 2, 3, 4], |_| 0.0);
    let pool = selector.select(&target, &dates, &mut records).unwrap();
    assert_eq!(pool.len(), 4);
    assert!(!pool.indices().contains(&2));
}

#[test]
fn test_external_target_has_no_self_exclusion() {
    let dates: Vec<NaiveDate> = (0..5).map(|y| date(1990 + y, 6, 1)).collect();
    let target = SearchTarget::external(date(2050, 6, 1));
    let selector = AnalogSelector::new(5, ExclusionPolicy::SameYear);
    assert_eq!(selector.eligible(&target, &dates), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_daily_window_at_year_boundary() {
    let dates = daily(date(2000, 1, 1), date(2002, 12, 31));
    let t = dates.iter().position(|d| *d == date(2001, 12, 28)).unwrap();
    let target = SearchTarget::in_series(t, dates[t]);
    let selector = AnalogSelector::new(22, ExclusionPolicy::DayOfYearWindow { half_width: 5 });

    let eligible = selector.eligible(&target, &dates);
    // 2000: Jan 1-2 and Dec 23-31; 2002: the same. No 2001 entries.
    assert_eq!(eligible.len(), 22);
    assert!(eligible.iter().all(|&j| dates[j].year() != 2001));
    assert!(eligible.contains(&dates.iter().position(|d| *d == date(2002, 1, 2)).unwrap()));
    assert!(!eligible.contains(&dates.iter().position(|d| *d == date(2002, 1, 3)).unwrap()));

    let mut records = table(&eligible, |j| j as f64);
    let pool = selector.select(&target, &dates, &mut records).unwrap();
    assert_eq!(pool.len(), 22);
}

#[test]
fn test_daily_pool_size_independent_of_leap_years() {
    let half_width = 5;
    let selector = AnalogSelector::new(1, ExclusionPolicy::DayOfYearWindow { half_width });

    // Same relative target, once with a leap year in the record and once without.
    let with_leap = daily(date(2000, 1, 1), date(2002, 12, 31));
    let t = with_leap.iter().position(|d| *d == date(2001, 12, 28)).unwrap();
    let n_with_leap = selector
        .eligible(&SearchTarget::in_series(t, with_leap[t]), &with_leap)
        .len();

    let without_leap = daily(date(2001, 1, 1), date(2003, 12, 31));
    let t = without_leap.iter().position(|d| *d == date(2002, 12, 28)).unwrap();
    let n_without_leap = selector
        .eligible(&SearchTarget::in_series(t, without_leap[t]), &without_leap)
        .len();

    assert_eq!(n_with_leap, n_without_leap);

    // A window containing 29 February keeps its 2 * N_d + 1 width.
    let dates = daily(date(1999, 1, 1), date(2001, 12, 31));
    let t = dates.iter().position(|d| *d == date(2000, 2, 29)).unwrap();
    let eligible = AnalogSelector::new(1, ExclusionPolicy::DayOfYearWindow { half_width: 2 })
        .eligible(&SearchTarget::in_series(t, dates[t]), &dates);
    assert_eq!(eligible.len(), 2 * 5);
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn test_pool_sorted_with_index_tie_break() {
    let dates: Vec<NaiveDate> = (0..6).map(|y| date(1980 + y, 1, 1)).collect();
    let target = SearchTarget::external(date(2000, 1, 1));
    let selector = AnalogSelector::new(4, ExclusionPolicy::SameYear);

    let distances = [3.0, 1.5, 0.5, 1.5, 9.0, 0.7];
    let mut records = table(&[5, 4, 3, 2, 1, 0], |j| distances[j]);
    let pool = selector.select(&target, &dates, &mut records).unwrap();

    assert_eq!(pool.indices(), vec![2, 5, 1, 3]);
    assert_eq!(pool.closest_distance(), 0.5);
    assert!((pool.mean_distance() - (0.5 + 0.7 + 1.5 + 1.5) / 4.0).abs() < 1e-12);
}

#[test]
fn test_select_reapplies_policy() {
    // A table that still contains a forbidden candidate.
    let dates = vec![date(2000, 1, 1), date(2001, 1, 1), date(2002, 1, 1)];
    let target = SearchTarget::in_series(1, dates[1]);
    let selector = AnalogSelector::new(2, ExclusionPolicy::SameYear);

    let mut records = table(&[0, 1, 2], |j| if j == 1 { 0.0 } else { 1.0 });
    let pool = selector.select(&target, &dates, &mut records).unwrap();
    assert_eq!(pool.indices(), vec![0, 2]);
}

#[test]
fn test_insufficient_candidates() {
    let dates = monthly(2000, 3);
    let t = 12;
    let target = SearchTarget::in_series(t, dates[t]);
    let selector = AnalogSelector::new(3, ExclusionPolicy::SameYearAndMonth);

    let eligible = selector.eligible(&target, &dates);
    let mut records = table(&eligible, |_| 1.0);
    let err = selector.select(&target, &dates, &mut records).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::InsufficientCandidates {
            date: dates[t],
            available: 2,
            required: 3,
        }
    );
}
