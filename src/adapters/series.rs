//! Series adapter for same-series dynamical adjustment.
//!
//! ## Purpose
//!
//! This module provides the execution adapter for the common case where the
//! training pool and the targets are the same paired series: every step of an
//! observational record is reconstructed from analogues found elsewhere in the
//! same record.
//!
//! ## Design notes
//!
//! * **Self-exclusion**: The target step is never its own analogue, on top of
//!   whatever the exclusion policy removes.
//! * **Delegation**: Delegates computation to the execution engine.
//!
//! ## Invariants
//!
//! * The configuration is validated once, in `build()`.
//! * The run seed is resolved once per `adjust` call and reported in the
//!   result.
//!
//! ## Non-goals
//!
//! * This adapter does not adjust series against an external pool (use the
//!   ensemble adapter).

use chrono::NaiveDate;

use crate::engine::executor::{AdjustmentConfig, AnalogExecutor, AnalysisPeriod, resolve_run_seed};
use crate::engine::output::AdjustmentResult;
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::PairedSeries;

// ============================================================================
// Series Adjuster Builder
// ============================================================================

/// Builder for the same-series adjuster.
#[derive(Debug, Clone, Default)]
pub struct SeriesAdjusterBuilder {
    /// Run configuration.
    pub config: AdjustmentConfig,

    /// Deferred error from adapter conversion
    pub(crate) deferred_error: Option<AdjustmentError>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl SeriesAdjusterBuilder {
    /// Set the run seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Restrict adjusted steps to an inclusive date range.
    pub fn analysis_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.config.period = Some(AnalysisPeriod { start, end });
        self
    }

    /// Enable or disable parallel processing of target steps.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build the series adjuster.
    pub fn build(self) -> Result<SeriesAdjuster, AdjustmentError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        Validator::validate_config(&self.config)?;

        Ok(SeriesAdjuster {
            config: self.config,
        })
    }
}

// ============================================================================
// Series Adjuster
// ============================================================================

/// Adjusts a paired series against itself.
#[derive(Debug, Clone)]
pub struct SeriesAdjuster {
    config: AdjustmentConfig,
}

impl SeriesAdjuster {
    /// Validated configuration.
    pub fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Reconstruct every step of `series` (within the analysis period) from
    /// analogues in the rest of `series`.
    pub fn adjust<T>(&self, series: &PairedSeries<T>) -> Result<AdjustmentResult<T>, AdjustmentError>
    where
        T: FloatLinalg + Send + Sync,
    {
        let seed = resolve_run_seed(self.config.seed);
        let executor = AnalogExecutor::new(&self.config, series, seed)?;
        executor.run(series, true, 0)
    }
}
