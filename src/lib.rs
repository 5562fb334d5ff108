//! # dynadj-rs — Dynamical adjustment by constructed circulation analogues
//!
//! Dynamical adjustment estimates the part of a climate variable's
//! variability that is explained by the atmospheric circulation alone. For
//! every target time step the crate finds the historical circulation states
//! closest to the target (the *analogues*), builds the linear combination of
//! them that best reproduces the target circulation, and applies the same
//! combination to the analogues' response fields (e.g. temperature or
//! precipitation).
//!
//! **How it works:**
//!
//! 1. Score every admissible training step against the target circulation
//!    (Euclidean or Teweles–Wobus distance).
//! 2. Keep the `N_a` closest steps as the analog pool, after removing
//!    candidates the exclusion policy forbids (the target itself, its year,
//!    other months or days too far from the target's day of year).
//! 3. `niter` times: draw `N_b` analogues from the pool, solve the least
//!    squares problem with an SVD pseudo-inverse, and reconstruct both the
//!    circulation and the response with the same coefficients.
//! 4. Return every iteration and the per-grid-point mean.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dynadj_rs::prelude::*;
//!
//! let grid = Grid::new(vec![10.0, 20.0], vec![0.0, 10.0])?;
//! let dates: Vec<NaiveDate> = (0..6)
//!     .map(|y| NaiveDate::from_ymd_opt(2000 + y, 1, 15).unwrap())
//!     .collect();
//!
//! // Six monthly circulation fields and the response they drive
//! let slp: Vec<f64> = (0..24).map(|k| ((k * 7 % 11) as f64) - 5.0).collect();
//! let tas: Vec<f64> = slp.iter().map(|p| 0.5 * p + 1.0).collect();
//!
//! let series = PairedSeries::new(
//!     FieldSeries::new(grid.clone(), dates.clone(), slp)?,
//!     FieldSeries::new(grid, dates, tas)?,
//! )?;
//!
//! let adjuster = DynAdj::new()
//!     .distance(Euclidean)
//!     .analogs(4)
//!     .subsample(3)
//!     .iterations(5)
//!     .exclusion(SameYear)
//!     .seed(42)
//!     .adapter(Series)
//!     .build()?;
//!
//! let result = adjuster.adjust(&series)?;
//!
//! assert_eq!(result.response.shape(), (5, 6, 2, 2));
//! assert_eq!(result.residual.len(), 6 * 4);
//! # Result::<(), AdjustmentError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! `adjust` returns a `Result<AdjustmentResult<T>, AdjustmentError>`.
//!
//! - **`Ok(AdjustmentResult<T>)`**: Reconstructions of both variables (every
//!   iteration and their mean), the residual, diagnostics and the run seed.
//! - **`Err(AdjustmentError)`**: A configuration, data contract or numerical
//!   failure. [`AdjustmentError::kind`](prelude::AdjustmentError::kind)
//!   tells the three apart.
//!
//! ## Parameters
//!
//! | Parameter           | Default             | Description                                   |
//! |---------------------|---------------------|-----------------------------------------------|
//! | **distance**        | `Euclidean`         | Circulation distance (`Euclidean`, `TewelesWobus`) |
//! | **analogs**         | 150                 | Analog pool size `N_a`                        |
//! | **subsample**       | 100                 | Analogues per iteration `N_b` (≤ `N_a`)       |
//! | **iterations**      | 100                 | Reconstructions per step `niter`              |
//! | **exclusion**       | `SameYearAndMonth`  | Candidate exclusion policy                    |
//! | **seed**            | random              | Run seed, reported in the result              |
//! | **singular_values** | `MachinePrecision`  | Small singular value treatment                |
//! | **analysis_period** | all steps           | Inclusive range of target dates               |
//! | **parallel**        | `true`              | Process steps on the rayon pool               |
//!
//! ### Exclusion policies
//!
//! | Policy                            | Admits                                                       |
//! |-----------------------------------|--------------------------------------------------------------|
//! | `SameYear`                        | Every step outside the target's year                         |
//! | `SameYearAndMonth`                | Same calendar month, other years (monthly data)              |
//! | `DayOfYearWindow { half_width }`  | Within `±half_width` days of the target's anniversary, other years (daily data) |
//!
//! ## Execution adapters
//!
//! | Adapter    | Use case                                                                |
//! |------------|-------------------------------------------------------------------------|
//! | `Series`   | Training and targets are the same series; the target is never its own analogue |
//! | `Ensemble` | Model members adjusted against an external training series              |
//!
//! ## Configuration files
//!
//! [`AdjustmentConfig`](prelude::AdjustmentConfig) is serde-serialisable.
//! Distance names accept the `EUCLIDE` and `TEWELES` spellings:
//!
//! ```rust
//! use dynadj_rs::prelude::*;
//!
//! let config = AdjustmentConfig::from_json_str(
//!     r#"{ "method": "TEWELES", "n_analogs": 40, "n_subsample": 20,
//!          "exclusion": { "kind": "day_of_year_window", "half_width": 15 } }"#,
//! )?;
//! let adjuster = DynAdj::from_config(config).adapter(Ensemble).build()?;
//! assert_eq!(adjuster.config().n_iterations, 100);
//! # Result::<(), AdjustmentError>::Ok(())
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (run start and end, per-step pool
//! statistics at `debug`, per-iteration solves at `trace`) and never installs
//! a subscriber.

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains grid metadata, field series, calendar arithmetic and the error
// type.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains circulation distance metrics and the pseudo-inverse solver.
mod math;

// Layer 3: Algorithms - the constructed-analogue method.
//
// Contains analog selection, sub-sampling, reconstruction and aggregation.
mod algorithms;

// Layer 4: Evaluation - post-processing and diagnostics.
//
// Contains residuals and explained variance.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains validation, the step executor, workspaces and result assembly.
mod engine;

// Layer 6: Adapters - execution mode adapters.
//
// Contains same-series and ensemble adjustment.
mod adapters;

// High-level fluent API.
//
// Provides the `DynAdj` builder for configuring and running adjustments.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard dynamical adjustment prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use dynadj_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Adapter::{Ensemble, Series},
        AdjustmentAdapter, AdjustmentConfig, AdjustmentDiagnostics, AdjustmentError,
        AdjustmentResult, AnalysisPeriod, DistanceMethod,
        DistanceMethod::{Euclidean, TewelesWobus},
        DynAdjBuilder as DynAdj, EnsembleAdjuster, ErrorKind, ExclusionPolicy,
        ExclusionPolicy::{DayOfYearWindow, SameYear, SameYearAndMonth},
        FieldSeries, Grid, GridField, PairedSeries, Reconstruction, SeriesAdjuster,
        SingularValuePolicy,
        SingularValuePolicy::{MachinePrecision, RelativeFloor, Unconditional},
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation and diagnostics.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
