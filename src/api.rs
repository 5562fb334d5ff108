//! High-level API for dynamical adjustment.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for configuring the analog search and reconstruction, and
//! for choosing an execution adapter (Series or Ensemble).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to adapter builders.
//! * **Validated**: Parameters are validated when `.build()` is called on the
//!   adapter builder.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`DynAdjBuilder`] via `DynAdj::new()`.
//! 2. Chain configuration methods (`.distance()`, `.analogs()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Series)` to get an execution
//!    builder, then call `.build()`.

use chrono::NaiveDate;

// Internal dependencies
use crate::adapters::ensemble::EnsembleAdjusterBuilder;
use crate::adapters::series::SeriesAdjusterBuilder;

// Publicly re-exported types
pub use crate::adapters::ensemble::EnsembleAdjuster;
pub use crate::adapters::series::SeriesAdjuster;
pub use crate::algorithms::selection::ExclusionPolicy;
pub use crate::engine::executor::{AdjustmentConfig, AnalysisPeriod};
pub use crate::engine::output::{AdjustmentResult, Reconstruction};
pub use crate::evaluation::diagnostics::AdjustmentDiagnostics;
pub use crate::math::distance::DistanceMethod;
pub use crate::math::linalg::SingularValuePolicy;
pub use crate::primitives::errors::{AdjustmentError, ErrorKind};
pub use crate::primitives::grid::{FieldSeries, Grid, GridField, PairedSeries};

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Ensemble, Series};
}

/// Fluent builder for configuring an adjustment and its execution mode.
#[derive(Debug, Clone, Default)]
pub struct DynAdjBuilder {
    /// Circulation distance metric.
    pub distance: Option<DistanceMethod>,

    /// Analog pool size (`N_a`).
    pub analogs: Option<usize>,

    /// Analogues drawn per iteration (`N_b`).
    pub subsample: Option<usize>,

    /// Reconstruction iterations per step (`niter`).
    pub iterations: Option<usize>,

    /// Candidate exclusion rule.
    pub exclusion: Option<ExclusionPolicy>,

    /// Run seed.
    pub seed: Option<u64>,

    /// Treatment of small singular values.
    pub singular_values: Option<SingularValuePolicy>,

    /// Inclusive range of target dates.
    pub analysis_period: Option<AnalysisPeriod>,

    /// Parallel execution switch.
    pub parallel: Option<bool>,

    /// Base configuration the individual setters override.
    pub(crate) base: Option<AdjustmentConfig>,

    /// Error raised by a setter, reported at `build()`.
    pub(crate) deferred_error: Option<AdjustmentError>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl DynAdjBuilder {
    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: AdjustmentAdapter,
    {
        A::convert(self)
    }

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: AdjustmentConfig) -> Self {
        Self {
            base: Some(config),
            ..Self::default()
        }
    }

    /// Set the circulation distance metric.
    pub fn distance(mut self, method: DistanceMethod) -> Self {
        if self.distance.is_some() {
            self.duplicate_param = Some("distance");
        }
        self.distance = Some(method);
        self
    }

    /// Set the distance metric by name (`EUCLIDE` or `TEWELES`).
    ///
    /// An unknown name is reported by `build()`.
    pub fn distance_name(self, name: &str) -> Self {
        match name.parse::<DistanceMethod>() {
            Ok(method) => self.distance(method),
            Err(err) => Self {
                deferred_error: Some(err),
                ..self
            },
        }
    }

    /// Set the analog pool size (`N_a`).
    pub fn analogs(mut self, n_analogs: usize) -> Self {
        if self.analogs.is_some() {
            self.duplicate_param = Some("analogs");
        }
        self.analogs = Some(n_analogs);
        self
    }

    /// Set the number of analogues drawn per iteration (`N_b`).
    pub fn subsample(mut self, n_subsample: usize) -> Self {
        if self.subsample.is_some() {
            self.duplicate_param = Some("subsample");
        }
        self.subsample = Some(n_subsample);
        self
    }

    /// Set the number of reconstruction iterations per step (`niter`).
    pub fn iterations(mut self, n_iterations: usize) -> Self {
        if self.iterations.is_some() {
            self.duplicate_param = Some("iterations");
        }
        self.iterations = Some(n_iterations);
        self
    }

    /// Set the candidate exclusion rule.
    pub fn exclusion(mut self, policy: ExclusionPolicy) -> Self {
        if self.exclusion.is_some() {
            self.duplicate_param = Some("exclusion");
        }
        self.exclusion = Some(policy);
        self
    }

    /// Set the run seed.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.seed = Some(seed);
        self
    }

    /// Set the singular value policy of the pseudo-inverse.
    pub fn singular_values(mut self, policy: SingularValuePolicy) -> Self {
        if self.singular_values.is_some() {
            self.duplicate_param = Some("singular_values");
        }
        self.singular_values = Some(policy);
        self
    }

    /// Restrict adjusted target steps to `start..=end`.
    pub fn analysis_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        if self.analysis_period.is_some() {
            self.duplicate_param = Some("analysis_period");
        }
        self.analysis_period = Some(AnalysisPeriod { start, end });
        self
    }

    /// Enable or disable parallel processing of target steps.
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Resolve the configuration: base (or defaults) overridden by setters.
    fn into_config(self) -> AdjustmentConfig {
        let mut config = self.base.unwrap_or_default();

        // Override with user-provided values
        if let Some(method) = self.distance {
            config.method = method;
        }
        if let Some(n) = self.analogs {
            config.n_analogs = n;
        }
        if let Some(n) = self.subsample {
            config.n_subsample = n;
        }
        if let Some(n) = self.iterations {
            config.n_iterations = n;
        }
        if let Some(policy) = self.exclusion {
            config.exclusion = policy;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(policy) = self.singular_values {
            config.singular_values = policy;
        }
        if let Some(period) = self.analysis_period {
            config.period = Some(period);
        }
        if let Some(parallel) = self.parallel {
            config.parallel = parallel;
        }
        config
    }
}

// ============================================================================
// Adapters
// ============================================================================

/// Trait for transitioning from a generic builder to an execution builder.
pub trait AdjustmentAdapter {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`DynAdjBuilder`] into a specialized execution builder.
    fn convert(builder: DynAdjBuilder) -> Self::Output;
}

/// Marker for same-series adjustment.
#[derive(Debug, Clone, Copy)]
pub struct Series;

impl AdjustmentAdapter for Series {
    type Output = SeriesAdjusterBuilder;

    fn convert(mut builder: DynAdjBuilder) -> Self::Output {
        let deferred_error = builder.deferred_error.take();
        let duplicate_param = builder.duplicate_param;
        SeriesAdjusterBuilder {
            config: builder.into_config(),
            deferred_error,
            duplicate_param,
        }
    }
}

/// Marker for ensemble adjustment against an external training series.
#[derive(Debug, Clone, Copy)]
pub struct Ensemble;

impl AdjustmentAdapter for Ensemble {
    type Output = EnsembleAdjusterBuilder;

    fn convert(mut builder: DynAdjBuilder) -> Self::Output {
        let deferred_error = builder.deferred_error.take();
        let duplicate_param = builder.duplicate_param;
        EnsembleAdjusterBuilder {
            config: builder.into_config(),
            deferred_error,
            duplicate_param,
        }
    }
}
