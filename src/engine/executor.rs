//! Execution engine for dynamical adjustment.
//!
//! ## Purpose
//!
//! This module orchestrates the analog search and reconstruction over the
//! target steps of one series: for each step it gathers the admissible
//! candidates, fills the distance table, selects the analog pool, runs the
//! iteration aggregator and stores the result in the step's output slot.
//!
//! ## Design notes
//!
//! * **Independent steps**: No state is carried between target steps besides
//!   the immutable inputs, so steps may run in any order or in parallel.
//! * **Per-step generators**: Each step seeds its own generator from
//!   `(run seed, member, step)`; the sequential and parallel paths produce the
//!   same arrays.
//! * **Workspaces**: Each worker reuses one [`AnalogWorkspace`] for its
//!   candidate list and distance table.
//! * Generic over `Float` types to support f32 and f64.
//!
//! ## Key concepts
//!
//! * **Run seed**: Either configured or drawn once from the thread-local
//!   generator, then reported in the result so a run can be replayed.
//! * **Analysis period**: Optional inclusive date range restricting which
//!   target steps are adjusted. It never restricts the training pool.
//!
//! ## Invariants
//!
//! * Output step `s` holds the adjustment of target step `steps[s]`.
//! * Every admissible training step is scored exactly once per target step.
//!
//! ## Non-goals
//!
//! * This module does not validate input data (handled by `validator`).
//! * This module does not read or write files.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::algorithms::aggregation::{AggregateOutput, IterationAggregator};
use crate::algorithms::reconstruction::PseudoInverseReconstructor;
use crate::algorithms::sampling::step_rng;
use crate::algorithms::selection::{AnalogSelector, DistanceRecord, ExclusionPolicy, SearchTarget};
use crate::engine::output::{AdjustmentResult, Reconstruction};
use crate::engine::validator::Validator;
use crate::engine::workspace::AnalogWorkspace;
use crate::evaluation::diagnostics::{self, AdjustmentDiagnostics};
use crate::math::distance::{AnalogDistanceCalculator, DistanceMethod, FieldDistance};
use crate::math::linalg::{FloatLinalg, SingularValuePolicy};
use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::PairedSeries;

// ============================================================================
// Configuration
// ============================================================================

/// Inclusive range of target dates to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    /// First date to adjust.
    pub start: NaiveDate,
    /// Last date to adjust.
    pub end: NaiveDate,
}

impl AnalysisPeriod {
    /// Create a period, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AdjustmentError> {
        Validator::validate_period(start, end)?;
        Ok(Self { start, end })
    }

    /// Returns true if `date` lies inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Complete configuration of an adjustment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustmentConfig {
    /// Circulation distance metric.
    pub method: DistanceMethod,

    /// Analog pool size (`N_a`).
    pub n_analogs: usize,

    /// Analogues drawn per iteration (`N_b`).
    pub n_subsample: usize,

    /// Reconstruction iterations per step (`niter`).
    pub n_iterations: usize,

    /// Candidate exclusion rule.
    pub exclusion: ExclusionPolicy,

    /// Run seed; drawn at random when absent.
    pub seed: Option<u64>,

    /// Treatment of small singular values.
    pub singular_values: SingularValuePolicy,

    /// Target dates to adjust; all when absent.
    pub period: Option<AnalysisPeriod>,

    /// Process target steps in parallel when the `parallel` feature is on.
    pub parallel: bool,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            method: DistanceMethod::default(),
            n_analogs: 150,
            n_subsample: 100,
            n_iterations: 100,
            exclusion: ExclusionPolicy::default(),
            seed: None,
            singular_values: SingularValuePolicy::default(),
            period: None,
            parallel: true,
        }
    }
}

impl AdjustmentConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AdjustmentError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AdjustmentError::InvalidConfig(e.to_string()))?;
        Validator::validate_config(&config)?;
        Ok(config)
    }

    /// Serialise to a JSON document.
    pub fn to_json_string(&self) -> Result<String, AdjustmentError> {
        serde_json::to_string_pretty(self).map_err(|e| AdjustmentError::InvalidConfig(e.to_string()))
    }
}

/// Configured seed, or a fresh one from the thread-local generator.
pub fn resolve_run_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

// ============================================================================
// Executor
// ============================================================================

/// Output of one target step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput<T> {
    /// Iteration stack and means.
    pub aggregate: AggregateOutput<T>,
    /// Distance of the closest analogue.
    pub closest_distance: T,
    /// Mean distance over the pool.
    pub mean_distance: T,
}

/// Runs the per-step pipeline against one training series.
#[derive(Debug)]
pub struct AnalogExecutor<'a, T: FloatLinalg> {
    config: &'a AdjustmentConfig,
    training: &'a PairedSeries<T>,
    calculator: AnalogDistanceCalculator<T>,
    selector: AnalogSelector,
    reconstructor: PseudoInverseReconstructor<'a, T>,
    aggregator: IterationAggregator,
    run_seed: u64,
}

impl<'a, T> AnalogExecutor<'a, T>
where
    T: FloatLinalg + Send + Sync,
{
    /// Prepare an executor for `training` with an already resolved seed.
    pub fn new(
        config: &'a AdjustmentConfig,
        training: &'a PairedSeries<T>,
        run_seed: u64,
    ) -> Result<Self, AdjustmentError> {
        let calculator = AnalogDistanceCalculator::new(config.method, training.circulation().grid())?;
        Ok(Self {
            config,
            training,
            calculator,
            selector: AnalogSelector::new(config.n_analogs, config.exclusion),
            reconstructor: PseudoInverseReconstructor::new(
                training,
                config.n_subsample,
                config.singular_values,
            ),
            aggregator: IterationAggregator::new(config.n_iterations),
            run_seed,
        })
    }

    /// Seed the per-step generators derive from.
    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    /// Indices of the target steps inside the analysis period.
    pub fn target_steps(&self, targets: &PairedSeries<T>) -> Result<Vec<usize>, AdjustmentError> {
        let dates = targets.dates();
        match self.config.period {
            None => Ok((0..dates.len()).collect()),
            Some(period) => {
                let steps: Vec<usize> = dates
                    .iter()
                    .enumerate()
                    .filter(|&(_, &d)| period.contains(d))
                    .map(|(t, _)| t)
                    .collect();
                if steps.is_empty() {
                    return Err(AdjustmentError::EmptyAnalysisPeriod {
                        start: period.start,
                        end: period.end,
                    });
                }
                Ok(steps)
            }
        }
    }

    /// Adjust one target step.
    ///
    /// `same_series` activates self-exclusion; `member` only enters the seed.
    pub fn adjust_step(
        &self,
        targets: &PairedSeries<T>,
        step: usize,
        same_series: bool,
        member: usize,
        ws: &mut AnalogWorkspace<T>,
    ) -> Result<StepOutput<T>, AdjustmentError> {
        let date = targets.circulation().date(step);
        let target_field = targets.circulation().field(step);
        let search = if same_series {
            SearchTarget::in_series(step, date)
        } else {
            SearchTarget::external(date)
        };

        // 1. Distance table over admissible candidates only
        let training_dates = self.training.dates();
        let circulation = self.training.circulation();
        ws.clear();
        self.selector
            .eligible_into(&search, training_dates, &mut ws.candidates);
        ws.table.extend(ws.candidates.iter().map(|&j| DistanceRecord {
            index: j,
            distance: self.calculator.distance(target_field, circulation.field(j)),
        }));

        // 2. Analog pool
        let pool = self.selector.select(&search, training_dates, &mut ws.table)?;
        let closest_distance = pool.closest_distance();
        let mean_distance = pool.mean_distance();
        debug!(
            %date,
            candidates = ws.candidates.len(),
            closest = closest_distance.to_f64().unwrap_or(f64::NAN),
            mean = mean_distance.to_f64().unwrap_or(f64::NAN),
            "analog pool selected"
        );

        // 3. Reconstruction iterations
        let mut rng = step_rng(self.run_seed, member, step);
        let aggregate = self
            .aggregator
            .aggregate(&self.reconstructor, date, target_field, &pool, &mut rng)?;

        Ok(StepOutput {
            aggregate,
            closest_distance,
            mean_distance,
        })
    }

    /// Adjust every target step in the analysis period.
    #[tracing::instrument(skip_all, fields(member = member, seed = self.run_seed))]
    pub fn run(
        &self,
        targets: &PairedSeries<T>,
        same_series: bool,
        member: usize,
    ) -> Result<AdjustmentResult<T>, AdjustmentError> {
        let steps = self.target_steps(targets)?;
        info!(
            n_steps = steps.len(),
            n_training = self.training.len(),
            method = %self.config.method,
            n_analogs = self.config.n_analogs,
            n_subsample = self.config.n_subsample,
            n_iterations = self.config.n_iterations,
            "adjustment started"
        );

        let outputs = self.process_steps(targets, &steps, same_series, member)?;
        let result = self.assemble(targets, steps, outputs);

        if result.diagnostics.truncated_singular_values > 0 {
            warn!(
                truncated = result.diagnostics.truncated_singular_values,
                policy = ?self.config.singular_values,
                "singular values below the floor were treated as zero"
            );
        }
        info!(n_steps = result.len(), "adjustment finished");
        Ok(result)
    }

    /// Run `adjust_step` over `steps`, in parallel when enabled.
    fn process_steps(
        &self,
        targets: &PairedSeries<T>,
        steps: &[usize],
        same_series: bool,
        member: usize,
    ) -> Result<Vec<StepOutput<T>>, AdjustmentError> {
        let capacity = self.training.len();

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return steps
                .par_iter()
                .map_init(
                    || AnalogWorkspace::with_capacity(capacity),
                    |ws, &step| self.adjust_step(targets, step, same_series, member, ws),
                )
                .collect();
        }

        let mut ws = AnalogWorkspace::with_capacity(capacity);
        steps
            .iter()
            .map(|&step| self.adjust_step(targets, step, same_series, member, &mut ws))
            .collect()
    }

    /// Write step outputs into the result arrays.
    fn assemble(
        &self,
        targets: &PairedSeries<T>,
        steps: Vec<usize>,
        outputs: Vec<StepOutput<T>>,
    ) -> AdjustmentResult<T> {
        let n_steps = steps.len();
        let n_iterations = self.aggregator.n_iterations();
        let mut circulation = Reconstruction::zeros(
            self.training.circulation().grid().clone(),
            n_iterations,
            n_steps,
        );
        let mut response = Reconstruction::zeros(
            self.training.response().grid().clone(),
            n_iterations,
            n_steps,
        );

        let mut diag = AdjustmentDiagnostics {
            closest_distance: Vec::with_capacity(n_steps),
            mean_distance: Vec::with_capacity(n_steps),
            truncated_singular_values: 0,
        };

        for (s, out) in outputs.iter().enumerate() {
            let aggregate = &out.aggregate;
            circulation.store(
                s,
                aggregate.iterations.iter().map(|it| it.circulation.as_slice()),
                &aggregate.circulation_mean,
            );
            response.store(
                s,
                aggregate.iterations.iter().map(|it| it.response.as_slice()),
                &aggregate.response_mean,
            );
            diag.closest_distance.push(out.closest_distance);
            diag.mean_distance.push(out.mean_distance);
            diag.truncated_singular_values += aggregate.truncated();
        }

        let residual = diagnostics::residual(targets.response(), &steps, response.mean());
        let dates = steps.iter().map(|&t| targets.dates()[t]).collect();

        AdjustmentResult {
            dates,
            steps,
            circulation,
            response,
            residual,
            diagnostics: diag,
            seed: self.run_seed,
        }
    }
}
