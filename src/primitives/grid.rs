//! Gridded field containers.
//!
//! ## Purpose
//!
//! This module provides the in-memory representation of the two gridded
//! variables the engine works on: a fixed latitude/longitude [`Grid`], single
//! dated fields, and time-ordered [`FieldSeries`] paired into a
//! [`PairedSeries`].
//!
//! ## Design notes
//!
//! * **Flat storage**: Values are stored as one flat vector per series
//!   (`time × lat × lon`, row-major) with separate coordinate metadata, so the
//!   engine never depends on an array library's indexing semantics.
//! * **Validated once**: Constructors run the data-contract checks; every
//!   instance is therefore well-formed and the per-step code does not re-check.
//!
//! ## Invariants
//!
//! * Latitudes are strictly ascending within [-90, 90].
//! * Longitudes are strictly increasing within [0, 360].
//! * Dates are strictly ascending; paired series share identical dates.
//! * All values are finite.

use chrono::NaiveDate;
use num_traits::Float;

use crate::engine::validator::Validator;
use crate::primitives::errors::AdjustmentError;

// ============================================================================
// Grid
// ============================================================================

/// Fixed latitude/longitude coordinates of a gridded variable.
///
/// Point `p` of a flattened field maps to `(p / n_lon, p % n_lon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl Grid {
    /// Create a grid, validating the coordinate conventions.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, AdjustmentError> {
        Validator::validate_coordinates(&lats, &lons)?;
        Ok(Self { lats, lons })
    }

    /// Latitudes in degrees, ascending.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitudes in degrees, increasing within [0, 360].
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Number of latitude rows.
    #[inline]
    pub fn n_lat(&self) -> usize {
        self.lats.len()
    }

    /// Number of longitude columns.
    #[inline]
    pub fn n_lon(&self) -> usize {
        self.lons.len()
    }

    /// Number of grid points (`n_lat * n_lon`).
    #[inline]
    pub fn n_points(&self) -> usize {
        self.lats.len() * self.lons.len()
    }
}

// ============================================================================
// GridField
// ============================================================================

/// One dated field on a grid, flattened row-major (latitude outer).
#[derive(Debug, Clone, PartialEq)]
pub struct GridField<T> {
    /// Timestamp of the field.
    pub date: NaiveDate,
    /// Flattened values.
    pub values: Vec<T>,
}

impl<T> GridField<T> {
    /// Create a dated field.
    pub fn new(date: NaiveDate, values: Vec<T>) -> Self {
        Self { date, values }
    }
}

// ============================================================================
// FieldSeries
// ============================================================================

/// Time-ordered sequence of fields of one variable on one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSeries<T> {
    grid: Grid,
    dates: Vec<NaiveDate>,
    values: Vec<T>,
}

impl<T: Float> FieldSeries<T> {
    /// Create a series from flat `time × lat × lon` values.
    pub fn new(grid: Grid, dates: Vec<NaiveDate>, values: Vec<T>) -> Result<Self, AdjustmentError> {
        Validator::validate_series(&grid, &dates, &values)?;
        Ok(Self {
            grid,
            dates,
            values,
        })
    }

    /// Create a series from individual dated fields.
    pub fn from_fields(grid: Grid, fields: Vec<GridField<T>>) -> Result<Self, AdjustmentError> {
        let n_points = grid.n_points();
        let mut dates = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len() * n_points);
        for field in fields {
            if field.values.len() != n_points {
                return Err(AdjustmentError::ShapeMismatch {
                    series: "grid field",
                    expected: n_points,
                    got: field.values.len(),
                });
            }
            dates.push(field.date);
            values.extend(field.values);
        }
        Self::new(grid, dates, values)
    }

    /// Number of time steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the series has no time step.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Grid shared by all fields.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Timestamps, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Timestamp of step `t`.
    #[inline]
    pub fn date(&self, t: usize) -> NaiveDate {
        self.dates[t]
    }

    /// Flattened field of step `t`.
    #[inline]
    pub fn field(&self, t: usize) -> &[T] {
        let n = self.grid.n_points();
        &self.values[t * n..(t + 1) * n]
    }

    /// All values, `time × lat × lon`.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

// ============================================================================
// PairedSeries
// ============================================================================

/// Circulation and response series aligned 1:1 in time.
///
/// The two variables may live on different grids.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSeries<T> {
    circulation: FieldSeries<T>,
    response: FieldSeries<T>,
}

impl<T: Float> PairedSeries<T> {
    /// Pair two series, checking equal length and identical timestamps.
    pub fn new(
        circulation: FieldSeries<T>,
        response: FieldSeries<T>,
    ) -> Result<Self, AdjustmentError> {
        Validator::validate_alignment(circulation.dates(), response.dates())?;
        Ok(Self {
            circulation,
            response,
        })
    }

    /// Circulation-variable series (analog search variable).
    pub fn circulation(&self) -> &FieldSeries<T> {
        &self.circulation
    }

    /// Response-variable series.
    pub fn response(&self) -> &FieldSeries<T> {
        &self.response
    }

    /// Number of time steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.circulation.len()
    }

    /// Returns true if the series has no time step.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.circulation.is_empty()
    }

    /// Shared timestamps.
    pub fn dates(&self) -> &[NaiveDate] {
        self.circulation.dates()
    }
}
