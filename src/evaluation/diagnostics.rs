//! Residuals and diagnostics of an adjustment run.
//!
//! ## Purpose
//!
//! The mean response reconstruction is the circulation-induced part of the
//! response; what is left over is attributed to other forcings. This module
//! computes that residual and a few summaries of analog quality.
//!
//! ## Key concepts
//!
//! * **Residual**: observed response minus mean response reconstruction.
//! * **Explained variance**: `1 − var(residual) / var(observed)` per grid
//!   point over the analysed steps.

use num_traits::Float;

use crate::primitives::grid::FieldSeries;

/// Diagnostics collected while adjusting one target series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdjustmentDiagnostics<T> {
    /// Distance of the closest analogue, per analysed step.
    pub closest_distance: Vec<T>,
    /// Mean distance over the analog pool, per analysed step.
    pub mean_distance: Vec<T>,
    /// Singular values treated as zero over the whole run.
    pub truncated_singular_values: usize,
}

/// Observed response at `steps` minus the reconstructed mean.
pub fn residual<T: Float>(observed: &FieldSeries<T>, steps: &[usize], mean: &[T]) -> Vec<T> {
    let n_points = observed.grid().n_points();
    debug_assert_eq!(mean.len(), steps.len() * n_points);

    steps
        .iter()
        .zip(mean.chunks_exact(n_points))
        .flat_map(|(&t, rec)| {
            observed
                .field(t)
                .iter()
                .zip(rec.iter())
                .map(|(&o, &r)| o - r)
        })
        .collect()
}

/// Per-point `1 − var(residual) / var(observed)` over `steps`.
///
/// Points whose observed variance is zero yield NaN.
pub fn explained_variance<T: Float>(
    observed: &FieldSeries<T>,
    steps: &[usize],
    residual: &[T],
) -> Vec<T> {
    let n_points = observed.grid().n_points();
    if steps.is_empty() {
        return vec![T::nan(); n_points];
    }

    (0..n_points)
        .map(|p| {
            let obs = steps.iter().map(|&t| observed.field(t)[p]);
            let res = (0..steps.len()).map(|s| residual[s * n_points + p]);
            let var_obs = variance(obs);
            if var_obs <= T::zero() {
                return T::nan();
            }
            T::one() - variance(res) / var_obs
        })
        .collect()
}

/// Population variance of an iterator.
fn variance<T: Float>(values: impl Iterator<Item = T> + Clone) -> T {
    let (sum, count) = values
        .clone()
        .fold((T::zero(), 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return T::zero();
    }
    let n = T::from(count).unwrap_or_else(T::one);
    let mean = sum / n;
    values.map(|v| (v - mean) * (v - mean)).fold(T::zero(), |a, b| a + b) / n
}
