//! Ensemble adapter for adjustment against an external analog pool.
//!
//! ## Purpose
//!
//! This module provides the execution adapter for model ensembles: each member
//! is adjusted using analogues drawn from a separate training series, such as
//! a control run or an observational record.
//!
//! ## Design notes
//!
//! * **No self-exclusion**: Targets are not part of the training pool. The
//!   exclusion policy still applies, by calendar.
//! * **Seeding**: One run seed per call; the member index enters the per-step
//!   seed, so members draw independent sub-samples and any single member can
//!   be replayed with [`EnsembleAdjuster::adjust_member`].
//!
//! ## Invariants
//!
//! * Every member lives on the training grids.
//! * Results are returned in member order.

use chrono::NaiveDate;

use crate::engine::executor::{AdjustmentConfig, AnalogExecutor, AnalysisPeriod, resolve_run_seed};
use crate::engine::output::AdjustmentResult;
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::PairedSeries;

// ============================================================================
// Ensemble Adjuster Builder
// ============================================================================

/// Builder for the ensemble adjuster.
#[derive(Debug, Clone, Default)]
pub struct EnsembleAdjusterBuilder {
    /// Run configuration.
    pub config: AdjustmentConfig,

    /// Deferred error from adapter conversion
    pub(crate) deferred_error: Option<AdjustmentError>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl EnsembleAdjusterBuilder {
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

    /// Build the ensemble adjuster.
    pub fn build(self) -> Result<EnsembleAdjuster, AdjustmentError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }
        Validator::validate_no_duplicates(self.duplicate_param)?;
        Validator::validate_config(&self.config)?;

        Ok(EnsembleAdjuster {
            config: self.config,
        })
    }
}

// ============================================================================
// Ensemble Adjuster
// ============================================================================

/// Adjusts ensemble members against an external training series.
#[derive(Debug, Clone)]
pub struct EnsembleAdjuster {
    config: AdjustmentConfig,
}

impl EnsembleAdjuster {
    /// Validated configuration.
    pub fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Adjust every member against `training`.
    pub fn adjust<T>(
        &self,
        training: &PairedSeries<T>,
        members: &[PairedSeries<T>],
    ) -> Result<Vec<AdjustmentResult<T>>, AdjustmentError>
    where
        T: FloatLinalg + Send + Sync,
    {
        if members.is_empty() {
            return Err(AdjustmentError::EmptyInput("ensemble members"));
        }
        for member in members {
            Validator::validate_compatible(training, member)?;
        }

        let seed = resolve_run_seed(self.config.seed);
        let executor = AnalogExecutor::new(&self.config, training, seed)?;
        members
            .iter()
            .enumerate()
            .map(|(k, member)| executor.run(member, false, k))
            .collect()
    }

    /// Adjust a single member, identified by its position in the ensemble.
    ///
    /// With a fixed seed this reproduces the corresponding entry of
    /// [`EnsembleAdjuster::adjust`].
    pub fn adjust_member<T>(
        &self,
        training: &PairedSeries<T>,
        member_index: usize,
        member: &PairedSeries<T>,
    ) -> Result<AdjustmentResult<T>, AdjustmentError>
    where
        T: FloatLinalg + Send + Sync,
    {
        Validator::validate_compatible(training, member)?;
        let seed = resolve_run_seed(self.config.seed);
        let executor = AnalogExecutor::new(&self.config, training, seed)?;
        executor.run(member, false, member_index)
    }
}
