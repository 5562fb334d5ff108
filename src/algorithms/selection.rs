//! Analog selection and exclusion policies.
//!
//! ## Purpose
//!
//! This module turns a table of candidate distances into the pool of the
//! `N_a` closest analogues of one target step, after removing candidates the
//! active exclusion policy forbids.
//!
//! ## Design notes
//!
//! * **One engine, several cadences**: Monthly and daily searches differ only
//!   in their [`ExclusionPolicy`]; ranking and truncation are shared.
//! * **Two-phase**: [`AnalogSelector::eligible_into`] lets the caller skip
//!   distance computations for forbidden candidates; [`AnalogSelector::select`]
//!   re-applies the policy so a table built by other means is still safe.
//! * **Deterministic ranking**: Ties are broken by chronological index, so the
//!   pool never depends on evaluation order.
//!
//! ## Invariants
//!
//! * A pool holds exactly `N_a` entries sorted by ascending distance.
//! * A pool never contains the target itself (same-series search) nor any
//!   candidate the policy excludes.
//!
//! ## Non-goals
//!
//! * This module does not compute distances.

use core::cmp::Ordering;

use chrono::NaiveDate;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::primitives::calendar;
use crate::primitives::errors::AdjustmentError;

// ============================================================================
// Exclusion Policy
// ============================================================================

/// Rule deciding which training steps may serve as analogues of a target.
///
/// Independently of the variant, a same-series search never admits the
/// target step itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionPolicy {
    /// Exclude every candidate from the target's calendar year.
    SameYear,

    /// Monthly search: only candidates from the target's calendar month,
    /// excluding the target's calendar year.
    #[default]
    SameYearAndMonth,

    /// Daily search: exclude the target's year and keep candidates within
    /// `half_width` calendar days of the target's day of year, wrapping
    /// across the year boundary.
    DayOfYearWindow {
        /// Half-width of the window in days (`N_d`).
        half_width: u32,
    },
}

/// The target step an analog search is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTarget {
    /// Date of the target step.
    pub date: NaiveDate,
    /// Index of the target in the training series, when both are the same
    /// series.
    pub self_index: Option<usize>,
}

impl SearchTarget {
    /// Target drawn from the training series itself.
    pub fn in_series(index: usize, date: NaiveDate) -> Self {
        Self {
            date,
            self_index: Some(index),
        }
    }

    /// Target from a separate series (e.g. an ensemble member).
    pub fn external(date: NaiveDate) -> Self {
        Self {
            date,
            self_index: None,
        }
    }
}

impl ExclusionPolicy {
    /// Whether training step `index` dated `date` may be an analogue of
    /// `target`.
    pub fn admits(&self, target: &SearchTarget, index: usize, date: NaiveDate) -> bool {
        if target.self_index == Some(index) {
            return false;
        }
        if calendar::same_year(target.date, date) {
            return false;
        }
        match *self {
            Self::SameYear => true,
            Self::SameYearAndMonth => calendar::same_calendar_month(target.date, date),
            Self::DayOfYearWindow { half_width } => {
                calendar::within_day_window(target.date, date, half_width)
            }
        }
    }
}

// ============================================================================
// Distance Table and Pool
// ============================================================================

/// Distance of one training step from the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRecord<T> {
    /// Index of the training step.
    pub index: usize,
    /// Distance from the target field.
    pub distance: T,
}

/// Ranking order: ascending distance, then chronological index.
fn rank<T: Float>(a: &DistanceRecord<T>, b: &DistanceRecord<T>) -> Ordering {
    a.distance
        .partial_cmp(&b.distance)
        .unwrap_or(Ordering::Equal)
        .then(a.index.cmp(&b.index))
}

/// The `N_a` nearest admissible analogues of one target step.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogPool<T> {
    records: Vec<DistanceRecord<T>>,
}

impl<T: Float> AnalogPool<T> {
    /// Number of analogues in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Training index at `position` (0 is the closest).
    #[inline]
    pub fn index(&self, position: usize) -> usize {
        self.records[position].index
    }

    /// Ranked records.
    pub fn records(&self) -> &[DistanceRecord<T>] {
        &self.records
    }

    /// Training indices in rank order.
    pub fn indices(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.index).collect()
    }

    /// Distance of the closest analogue.
    pub fn closest_distance(&self) -> T {
        self.records.first().map_or_else(T::zero, |r| r.distance)
    }

    /// Mean distance over the pool.
    pub fn mean_distance(&self) -> T {
        if self.records.is_empty() {
            return T::zero();
        }
        let sum = self
            .records
            .iter()
            .fold(T::zero(), |acc, r| acc + r.distance);
        sum / T::from(self.records.len()).unwrap_or_else(T::one)
    }
}

// ============================================================================
// Analog Selector
// ============================================================================

/// Ranks candidate distances into an [`AnalogPool`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogSelector {
    n_analogs: usize,
    policy: ExclusionPolicy,
}

impl AnalogSelector {
    /// Selector keeping `n_analogs` analogues under `policy`.
    pub fn new(n_analogs: usize, policy: ExclusionPolicy) -> Self {
        Self { n_analogs, policy }
    }

    /// Pool size (`N_a`).
    pub fn n_analogs(&self) -> usize {
        self.n_analogs
    }

    /// Active exclusion policy.
    pub fn policy(&self) -> ExclusionPolicy {
        self.policy
    }

    /// Collect the admissible training indices for `target` into `out`.
    pub fn eligible_into(&self, target: &SearchTarget, dates: &[NaiveDate], out: &mut Vec<usize>) {
        out.clear();
        out.extend(
            dates
                .iter()
                .enumerate()
                .filter(|&(j, &d)| self.policy.admits(target, j, d))
                .map(|(j, _)| j),
        );
    }

    /// Admissible training indices for `target`.
    pub fn eligible(&self, target: &SearchTarget, dates: &[NaiveDate]) -> Vec<usize> {
        let mut out = Vec::new();
        self.eligible_into(target, dates, &mut out);
        out
    }

    /// Rank `table` and return the `N_a` nearest admissible analogues.
    ///
    /// `dates` are the training timestamps the table indices refer to. The
    /// table is reordered in place.
    ///
    /// # Errors
    ///
    /// [`AdjustmentError::InsufficientCandidates`] if fewer than `N_a`
    /// admissible candidates remain.
    pub fn select<T: Float>(
        &self,
        target: &SearchTarget,
        dates: &[NaiveDate],
        table: &mut Vec<DistanceRecord<T>>,
    ) -> Result<AnalogPool<T>, AdjustmentError> {
        table.retain(|r| self.policy.admits(target, r.index, dates[r.index]));

        let n = self.n_analogs;
        if table.len() < n {
            return Err(AdjustmentError::InsufficientCandidates {
                date: target.date,
                available: table.len(),
                required: n,
            });
        }

        // Partial selection first; the comparator is a total order so the
        // result does not depend on the input order.
        if n > 0 && table.len() > n {
            table.select_nth_unstable_by(n - 1, rank);
        }
        table[..n].sort_by(rank);

        Ok(AnalogPool {
            records: table[..n].to_vec(),
        })
    }
}
