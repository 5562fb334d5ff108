//! Input validation for adjustment configuration and data.
//!
//! ## Purpose
//!
//! This module provides the validation functions run once at entry, before
//! any per-step work: grid coordinate conventions, series shapes and
//! alignment, compatibility between training and target series, and
//! configuration bounds.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy the data contract of the engine.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not sort, flip, infill or otherwise repair inputs.

use chrono::NaiveDate;
use num_traits::Float;

use crate::algorithms::selection::ExclusionPolicy;
use crate::engine::executor::AdjustmentConfig;
use crate::math::linalg::SingularValuePolicy;
use crate::primitives::calendar::MAX_HALF_WIDTH;
use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::{Grid, PairedSeries};

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for adjustment configuration and input data.
///
/// All methods return `Result<(), AdjustmentError>` and fail fast upon
/// identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Data Contract
    // ========================================================================

    /// Validate grid coordinates.
    pub fn validate_coordinates(lats: &[f64], lons: &[f64]) -> Result<(), AdjustmentError> {
        if lats.is_empty() || lons.is_empty() {
            return Err(AdjustmentError::EmptyInput("grid coordinates"));
        }

        for (i, &lat) in lats.iter().enumerate() {
            let ascending = i == 0 || lat > lats[i - 1];
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) || !ascending {
                return Err(AdjustmentError::InvalidLatitude {
                    index: i,
                    value: lat,
                });
            }
        }

        for (i, &lon) in lons.iter().enumerate() {
            let increasing = i == 0 || lon > lons[i - 1];
            if !lon.is_finite() || !(0.0..=360.0).contains(&lon) || !increasing {
                return Err(AdjustmentError::InvalidLongitude {
                    index: i,
                    value: lon,
                });
            }
        }

        Ok(())
    }

    /// Validate a series: value count, date order, finiteness.
    pub fn validate_series<T: Float>(
        grid: &Grid,
        dates: &[NaiveDate],
        values: &[T],
    ) -> Result<(), AdjustmentError> {
        // Check 1: Non-empty
        if dates.is_empty() {
            return Err(AdjustmentError::EmptyInput("field series"));
        }

        // Check 2: Shape
        let expected = dates.len() * grid.n_points();
        if values.len() != expected {
            return Err(AdjustmentError::ShapeMismatch {
                series: "field series",
                expected,
                got: values.len(),
            });
        }

        // Check 3: Chronological order
        if let Some(index) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AdjustmentError::UnorderedDates {
                index: index + 1,
                date: dates[index + 1],
            });
        }

        // Check 4: Complete fields
        if let Some(offset) = values.iter().position(|v| !v.is_finite()) {
            return Err(AdjustmentError::NonFiniteValue {
                series: "field series",
                offset,
            });
        }

        Ok(())
    }

    /// Validate that two paired series share their time axis.
    pub fn validate_alignment(
        circulation: &[NaiveDate],
        response: &[NaiveDate],
    ) -> Result<(), AdjustmentError> {
        if circulation.len() != response.len() {
            return Err(AdjustmentError::LengthMismatch {
                circulation: circulation.len(),
                response: response.len(),
            });
        }
        if let Some(index) = circulation
            .iter()
            .zip(response.iter())
            .position(|(c, r)| c != r)
        {
            return Err(AdjustmentError::TimestampMismatch {
                index,
                circulation: circulation[index],
                response: response[index],
            });
        }
        Ok(())
    }

    /// Validate that targets live on the training grids.
    pub fn validate_compatible<T: Float>(
        training: &PairedSeries<T>,
        targets: &PairedSeries<T>,
    ) -> Result<(), AdjustmentError> {
        if training.circulation().grid() != targets.circulation().grid() {
            return Err(AdjustmentError::GridMismatch {
                variable: "circulation",
            });
        }
        if training.response().grid() != targets.response().grid() {
            return Err(AdjustmentError::GridMismatch {
                variable: "response",
            });
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the analog pool, sub-sample and iteration sizes.
    pub fn validate_sizes(
        n_analogs: usize,
        n_subsample: usize,
        n_iterations: usize,
    ) -> Result<(), AdjustmentError> {
        for (value, parameter) in [
            (n_analogs, "analogs"),
            (n_subsample, "subsample"),
            (n_iterations, "iterations"),
        ] {
            if value == 0 {
                return Err(AdjustmentError::ZeroParameter { parameter });
            }
        }
        if n_subsample > n_analogs {
            return Err(AdjustmentError::SubsampleExceedsPool {
                n_subsample,
                n_analogs,
            });
        }
        Ok(())
    }

    /// Validate the exclusion policy parameters.
    pub fn validate_exclusion(policy: &ExclusionPolicy) -> Result<(), AdjustmentError> {
        match *policy {
            ExclusionPolicy::DayOfYearWindow { half_width } if half_width > MAX_HALF_WIDTH => {
                Err(AdjustmentError::DayWindowTooWide(half_width))
            }
            _ => Ok(()),
        }
    }

    /// Validate the singular value policy.
    pub fn validate_singular_values(policy: &SingularValuePolicy) -> Result<(), AdjustmentError> {
        match *policy {
            SingularValuePolicy::RelativeFloor(r) if !r.is_finite() || !(0.0..1.0).contains(&r) => {
                Err(AdjustmentError::InvalidSingularValueFloor(r))
            }
            _ => Ok(()),
        }
    }

    /// Validate an inclusive analysis period.
    pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), AdjustmentError> {
        if start > end {
            return Err(AdjustmentError::InvalidAnalysisPeriod { start, end });
        }
        Ok(())
    }

    /// Validate a complete configuration.
    pub fn validate_config(config: &AdjustmentConfig) -> Result<(), AdjustmentError> {
        Self::validate_sizes(config.n_analogs, config.n_subsample, config.n_iterations)?;
        Self::validate_exclusion(&config.exclusion)?;
        Self::validate_singular_values(&config.singular_values)?;
        if let Some(period) = config.period {
            Self::validate_period(period.start, period.end)?;
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), AdjustmentError> {
        if let Some(parameter) = duplicate_param {
            return Err(AdjustmentError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
