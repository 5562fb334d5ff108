//! Output types for dynamical adjustment.
//!
//! ## Purpose
//!
//! This module defines the arrays handed to output writers: for each
//! variable, every iteration's reconstruction (`niter × time × lat × lon`) and
//! their mean (`time × lat × lon`), plus the residual and run diagnostics.
//!
//! ## Invariants
//!
//! * Arrays are flat and row-major in the documented axis order.
//! * Step `s` of the output refers to `steps[s]` of the target series.

use chrono::NaiveDate;
use num_traits::Float;

use crate::evaluation::diagnostics::{self, AdjustmentDiagnostics};
use crate::primitives::grid::{Grid, PairedSeries};

// ============================================================================
// Reconstruction
// ============================================================================

/// Reconstructed fields of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction<T> {
    grid: Grid,
    n_iterations: usize,
    n_steps: usize,
    iterations: Vec<T>,
    mean: Vec<T>,
}

impl<T: Float> Reconstruction<T> {
    /// Zero-filled arrays for `n_iterations × n_steps` fields on `grid`.
    pub(crate) fn zeros(grid: Grid, n_iterations: usize, n_steps: usize) -> Self {
        let n_points = grid.n_points();
        Self {
            grid,
            n_iterations,
            n_steps,
            iterations: vec![T::zero(); n_iterations * n_steps * n_points],
            mean: vec![T::zero(); n_steps * n_points],
        }
    }

    /// Write one step's iteration stack and mean into its slot.
    pub(crate) fn store<'a>(
        &mut self,
        step: usize,
        iterations: impl Iterator<Item = &'a [T]>,
        mean: &[T],
    ) where
        T: 'a,
    {
        let n_points = self.grid.n_points();
        for (k, field) in iterations.enumerate() {
            let offset = (k * self.n_steps + step) * n_points;
            self.iterations[offset..offset + n_points].copy_from_slice(field);
        }
        self.mean[step * n_points..(step + 1) * n_points].copy_from_slice(mean);
    }

    /// Grid of the variable.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// `(niter, time, lat, lon)`.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (
            self.n_iterations,
            self.n_steps,
            self.grid.n_lat(),
            self.grid.n_lon(),
        )
    }

    /// All iterations, `niter × time × lat × lon`.
    pub fn iterations(&self) -> &[T] {
        &self.iterations
    }

    /// Iteration means, `time × lat × lon`.
    pub fn mean(&self) -> &[T] {
        &self.mean
    }

    /// Field of iteration `k` at output step `s`.
    pub fn iteration(&self, k: usize, s: usize) -> &[T] {
        let n_points = self.grid.n_points();
        let offset = (k * self.n_steps + s) * n_points;
        &self.iterations[offset..offset + n_points]
    }

    /// Mean field at output step `s`.
    pub fn mean_at(&self, s: usize) -> &[T] {
        let n_points = self.grid.n_points();
        &self.mean[s * n_points..(s + 1) * n_points]
    }
}

// ============================================================================
// Adjustment Result
// ============================================================================

/// Result of adjusting one target series.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentResult<T> {
    /// Dates of the analysed steps.
    pub dates: Vec<NaiveDate>,

    /// Indices of the analysed steps in the target series.
    pub steps: Vec<usize>,

    /// Circulation reconstructions.
    pub circulation: Reconstruction<T>,

    /// Response reconstructions (the dynamically induced component).
    pub response: Reconstruction<T>,

    /// Observed response minus the mean response reconstruction,
    /// `time × lat × lon`.
    pub residual: Vec<T>,

    /// Per-step and run-level diagnostics.
    pub diagnostics: AdjustmentDiagnostics<T>,

    /// Run seed the per-step generators were derived from.
    pub seed: u64,
}

impl<T: Float> AdjustmentResult<T> {
    /// Number of analysed steps.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if no step was analysed.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Residual field at output step `s`.
    pub fn residual_at(&self, s: usize) -> &[T] {
        let n_points = self.response.grid().n_points();
        &self.residual[s * n_points..(s + 1) * n_points]
    }

    /// Fraction of the response variance explained by circulation, per grid
    /// point, over the analysed steps of `targets`.
    pub fn explained_variance(&self, targets: &PairedSeries<T>) -> Vec<T> {
        diagnostics::explained_variance(targets.response(), &self.steps, &self.residual)
    }
}
