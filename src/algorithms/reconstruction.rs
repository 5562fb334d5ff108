//! Pseudo-inverse reconstruction from constructed analogues.
//!
//! ## Purpose
//!
//! This module performs one reconstruction iteration: draw `N_b` analogues
//! from the pool, find the linear combination of their circulation fields
//! closest to the target circulation, and apply the same coefficients to
//! their response fields.
//!
//! ## Design notes
//!
//! * **Shared coefficients**: The coefficient vector solved on the circulation
//!   variable is applied unchanged to the response variable. This is the
//!   physical assumption of dynamical adjustment.
//! * **Solver**: The least-squares solve goes through the thin-SVD
//!   pseudo-inverse in `math::linalg`; small singular values follow the
//!   configured `SingularValuePolicy`.
//!
//! ## Key concepts
//!
//! * **Design matrix**: `N_b × P` matrix whose rows are the analogues'
//!   flattened circulation fields.
//! * **Coefficients**: `x = f · A⁺`, one weight per analogue.
//!
//! ## Invariants
//!
//! * Both reconstructions use the same coefficients.
//! * Coefficients are finite, or the iteration fails.

use chrono::NaiveDate;
use rand::Rng;
use tracing::trace;

use crate::algorithms::sampling::draw_subsample;
use crate::algorithms::selection::AnalogPool;
use crate::math::linalg::{FloatLinalg, SingularValuePolicy, nalgebra_backend::combine_rows};
use crate::primitives::errors::AdjustmentError;
use crate::primitives::grid::{FieldSeries, PairedSeries};

// ============================================================================
// Iteration Result
// ============================================================================

/// Output of one reconstruction iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult<T> {
    /// Training indices of the analogues used, in draw order.
    pub analogs: Vec<usize>,
    /// Reconstruction coefficient of each analogue.
    pub coefficients: Vec<T>,
    /// Reconstructed circulation field.
    pub circulation: Vec<T>,
    /// Reconstructed response field.
    pub response: Vec<T>,
    /// Singular values treated as zero in the solve.
    pub truncated: usize,
}

// ============================================================================
// Reconstructor
// ============================================================================

/// Solves analog reconstructions against a training series.
#[derive(Debug, Clone, Copy)]
pub struct PseudoInverseReconstructor<'a, T> {
    training: &'a PairedSeries<T>,
    n_subsample: usize,
    policy: SingularValuePolicy,
}

impl<'a, T: FloatLinalg> PseudoInverseReconstructor<'a, T> {
    /// Reconstructor drawing `n_subsample` analogues per iteration.
    pub fn new(training: &'a PairedSeries<T>, n_subsample: usize, policy: SingularValuePolicy) -> Self {
        Self {
            training,
            n_subsample,
            policy,
        }
    }

    /// Sub-sample size (`N_b`).
    pub fn n_subsample(&self) -> usize {
        self.n_subsample
    }

    /// Run one iteration: draw a fresh sub-sample of `pool` and reconstruct.
    ///
    /// `date` only labels errors.
    pub fn reconstruct<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        target: &[T],
        pool: &AnalogPool<T>,
        rng: &mut R,
    ) -> Result<IterationResult<T>, AdjustmentError> {
        let analogs = draw_subsample(rng, pool.len(), self.n_subsample)
            .into_iter()
            .map(|position| pool.index(position))
            .collect();
        self.reconstruct_from(date, target, analogs)
    }

    /// Reconstruct `target` from an explicit set of training analogues.
    pub fn reconstruct_from(
        &self,
        date: NaiveDate,
        target: &[T],
        analogs: Vec<usize>,
    ) -> Result<IterationResult<T>, AdjustmentError> {
        let circulation = self.training.circulation();
        let n_points = circulation.grid().n_points();
        let design = stack_fields(circulation, &analogs);

        let solve = T::pseudo_inverse_solve(&design, analogs.len(), n_points, target, self.policy)
            .ok_or(AdjustmentError::SvdFailure { date })?;
        if solve.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AdjustmentError::NonFiniteCoefficients { date });
        }
        trace!(
            %date,
            n_analogs = analogs.len(),
            truncated = solve.truncated,
            "pseudo-inverse solved"
        );

        let circulation_rec = combine_rows(&solve.coefficients, &design, n_points);

        let response = self.training.response();
        let response_rows = stack_fields(response, &analogs);
        let response_rec = combine_rows(
            &solve.coefficients,
            &response_rows,
            response.grid().n_points(),
        );

        Ok(IterationResult {
            analogs,
            coefficients: solve.coefficients,
            circulation: circulation_rec,
            response: response_rec,
            truncated: solve.truncated,
        })
    }
}

/// Row-major stack of the fields at `indices`.
fn stack_fields<T: FloatLinalg>(series: &FieldSeries<T>, indices: &[usize]) -> Vec<T> {
    let n_points = series.grid().n_points();
    let mut rows = Vec::with_capacity(indices.len() * n_points);
    for &j in indices {
        rows.extend_from_slice(series.field(j));
    }
    rows
}
