//! Error types for dynamical adjustment.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation of the crate, together with a coarse classification used by
//! callers that only care about the failure family.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Every error is surfaced to the caller immediately. All
//!   computations are deterministic given their inputs and seed, so nothing
//!   is retried.
//! * **Comparable**: Errors are `Clone + PartialEq` so tests can match them
//!   exactly.
//!
//! ## Key concepts
//!
//! * **Configuration**: Parameters that can never produce a valid run.
//! * **Data contract**: Inputs that violate grid or alignment conventions.
//! * **Numerical**: Failures of the pseudo-inverse solve.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure family of an [`AdjustmentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or unsatisfiable configuration.
    Configuration,
    /// Input data violating the grid/alignment contract.
    DataContract,
    /// Numerical breakdown in the reconstruction step.
    Numerical,
}

/// Errors produced by the analog engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdjustmentError {
    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------
    /// Distance method name not recognised.
    #[error("Unknown distance method: '{0}' (expected EUCLIDE or TEWELES)")]
    UnknownDistanceMethod(String),

    /// A size parameter was zero.
    #[error("Invalid {parameter}: 0 (must be at least 1)")]
    ZeroParameter {
        /// Offending parameter name.
        parameter: &'static str,
    },

    /// Sub-sample larger than the analog pool.
    #[error("Invalid subsample: {n_subsample} (must not exceed analogs {n_analogs})")]
    SubsampleExceedsPool {
        /// Requested sub-sample size (N_b).
        n_subsample: usize,
        /// Analog pool size (N_a).
        n_analogs: usize,
    },

    /// Day-of-year window wider than half a year.
    #[error("Invalid day window: {0} (must be at most 182 days)")]
    DayWindowTooWide(u32),

    /// Singular value floor outside `[0, 1)`.
    #[error("Invalid singular value floor: {0} (must be >= 0 and < 1)")]
    InvalidSingularValueFloor(f64),

    /// Analysis period with start after end.
    #[error("Invalid analysis period: {start} is after {end}")]
    InvalidAnalysisPeriod {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },

    /// Builder parameter configured twice.
    #[error(
        "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
    )]
    DuplicateParameter {
        /// Offending parameter name.
        parameter: &'static str,
    },

    /// Configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fewer admissible analog candidates than the pool size.
    #[error(
        "Insufficient analog candidates for {date}: {available} remain after exclusion, need {required}"
    )]
    InsufficientCandidates {
        /// Date of the target step.
        date: NaiveDate,
        /// Candidates left after the exclusion policy.
        available: usize,
        /// Required pool size (N_a).
        required: usize,
    },

    // ------------------------------------------------------------------
    // Data contract
    // ------------------------------------------------------------------
    /// Empty grid, series or ensemble.
    #[error("Input is empty: {0}")]
    EmptyInput(&'static str),

    /// Latitudes not strictly ascending or outside [-90, 90].
    #[error("Invalid latitude at index {index}: {value} (must be ascending within [-90, 90])")]
    InvalidLatitude {
        /// Coordinate index.
        index: usize,
        /// Coordinate value.
        value: f64,
    },

    /// Longitudes not strictly increasing or outside [0, 360].
    #[error("Invalid longitude at index {index}: {value} (must be increasing within [0, 360])")]
    InvalidLongitude {
        /// Coordinate index.
        index: usize,
        /// Coordinate value.
        value: f64,
    },

    /// Value count inconsistent with grid and time axis.
    #[error("Shape mismatch in {series}: expected {expected} values, got {got}")]
    ShapeMismatch {
        /// Which series.
        series: &'static str,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        got: usize,
    },

    /// Paired series with different lengths.
    #[error("Length mismatch: circulation has {circulation} steps, response has {response}")]
    LengthMismatch {
        /// Circulation series length.
        circulation: usize,
        /// Response series length.
        response: usize,
    },

    /// Paired series with different timestamps.
    #[error("Timestamp mismatch at step {index}: {circulation} vs {response}")]
    TimestampMismatch {
        /// Step index.
        index: usize,
        /// Circulation date.
        circulation: NaiveDate,
        /// Response date.
        response: NaiveDate,
    },

    /// Dates not strictly ascending.
    #[error("Dates not strictly ascending at step {index}: {date}")]
    UnorderedDates {
        /// Step index.
        index: usize,
        /// Offending date.
        date: NaiveDate,
    },

    /// Training and target grids differ.
    #[error("Grid mismatch for {variable} between training and target series")]
    GridMismatch {
        /// Variable name.
        variable: &'static str,
    },

    /// NaN or infinite value in an input field.
    #[error("Invalid numeric value in {series} at offset {offset}")]
    NonFiniteValue {
        /// Which series.
        series: &'static str,
        /// Flat offset of the value.
        offset: usize,
    },

    /// Grid too small for centered gradients.
    #[error("Grid too small for Teweles-Wobus: {n_lat}x{n_lon} (need at least 3x3)")]
    GridTooSmall {
        /// Number of latitudes.
        n_lat: usize,
        /// Number of longitudes.
        n_lon: usize,
    },

    /// No target step falls inside the analysis period.
    #[error("No target step between {start} and {end}")]
    EmptyAnalysisPeriod {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },

    // ------------------------------------------------------------------
    // Numerical
    // ------------------------------------------------------------------
    /// The SVD did not converge.
    #[error("SVD did not converge for {date}")]
    SvdFailure {
        /// Date of the target step.
        date: NaiveDate,
    },

    /// The pseudo-inverse produced NaN or infinite coefficients.
    #[error("Non-finite reconstruction coefficients for {date} (near-singular analog set)")]
    NonFiniteCoefficients {
        /// Date of the target step.
        date: NaiveDate,
    },
}

impl AdjustmentError {
    /// Classify the error into its failure family.
    pub fn kind(&self) -> ErrorKind {
        use AdjustmentError::*;
        match self {
            UnknownDistanceMethod(_)
            | ZeroParameter { .. }
            | SubsampleExceedsPool { .. }
            | DayWindowTooWide(_)
            | InvalidSingularValueFloor(_)
            | InvalidAnalysisPeriod { .. }
            | DuplicateParameter { .. }
            | InvalidConfig(_)
            | InsufficientCandidates { .. } => ErrorKind::Configuration,
            EmptyInput(_)
            | InvalidLatitude { .. }
            | InvalidLongitude { .. }
            | ShapeMismatch { .. }
            | LengthMismatch { .. }
            | TimestampMismatch { .. }
            | UnorderedDates { .. }
            | GridMismatch { .. }
            | NonFiniteValue { .. }
            | GridTooSmall { .. }
            | EmptyAnalysisPeriod { .. } => ErrorKind::DataContract,
            SvdFailure { .. } | NonFiniteCoefficients { .. } => ErrorKind::Numerical,
        }
    }
}
