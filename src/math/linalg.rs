//! Linear algebra backend for the pseudo-inverse solve.
//!
//! ## Purpose
//!
//! This module solves the analog reconstruction problem: find the row vector
//! `x` minimising `‖x·A − f‖` where the rows of `A` are analog fields and `f` is
//! the target field, through the Moore-Penrose pseudo-inverse `A⁺ = V·S⁻¹·Uᵗ`
//! built from a thin singular value decomposition.
//!
//! ## Design notes
//!
//! * Delegates the SVD to nalgebra; generic `Float` code reaches it through the
//!   `FloatLinalg` bridge implemented for f32 and f64.
//! * The pseudo-inverse is never materialised: `x = ((f·V) ⊘ S)·Uᵗ`.
//! * Small singular values are handled by an explicit `SingularValuePolicy`.

use nalgebra::{DMatrix, DVector, RealField};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// ============================================================================
// Singular Value Policy
// ============================================================================

/// Treatment of small singular values when inverting `S`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularValuePolicy {
    /// Invert every singular value, however small.
    Unconditional,

    /// Zero singular values `≤ max(rows, cols) · ε · s_max`.
    #[default]
    MachinePrecision,

    /// Zero singular values `≤ r · s_max`.
    RelativeFloor(f64),
}

impl SingularValuePolicy {
    /// Relative cutoff for a `rows × cols` matrix, `None` for no cutoff.
    pub fn rcond(&self, rows: usize, cols: usize, epsilon: f64) -> Option<f64> {
        match *self {
            Self::Unconditional => None,
            Self::MachinePrecision => Some(rows.max(cols) as f64 * epsilon),
            Self::RelativeFloor(r) => Some(r),
        }
    }
}

// ============================================================================
// Solve Output
// ============================================================================

/// Result of one pseudo-inverse solve.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoInverseSolve<T> {
    /// Reconstruction coefficients, one per design row.
    pub coefficients: Vec<T>,
    /// Singular values of the design matrix, descending.
    pub singular_values: Vec<T>,
    /// Number of singular values treated as zero.
    pub truncated: usize,
}

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + 'static {
    /// Coefficients `x` minimising `‖x·A − f‖` for a row-major `A`
    /// (`rows × cols`). Returns `None` if the SVD does not converge.
    fn pseudo_inverse_solve(
        design: &[Self],
        rows: usize,
        cols: usize,
        target: &[Self],
        policy: SingularValuePolicy,
    ) -> Option<PseudoInverseSolve<Self>>;
}

impl FloatLinalg for f64 {
    #[inline]
    fn pseudo_inverse_solve(
        design: &[Self],
        rows: usize,
        cols: usize,
        target: &[Self],
        policy: SingularValuePolicy,
    ) -> Option<PseudoInverseSolve<Self>> {
        let rcond = policy.rcond(rows, cols, f64::EPSILON);
        nalgebra_backend::pseudo_inverse_solve(design, rows, cols, target, rcond, 5.0 * f64::EPSILON)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn pseudo_inverse_solve(
        design: &[Self],
        rows: usize,
        cols: usize,
        target: &[Self],
        policy: SingularValuePolicy,
    ) -> Option<PseudoInverseSolve<Self>> {
        let rcond = policy
            .rcond(rows, cols, f64::from(f32::EPSILON))
            .map(|r| r as f32);
        nalgebra_backend::pseudo_inverse_solve(design, rows, cols, target, rcond, 5.0 * f32::EPSILON)
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::*;

    /// Sweep limit of the iterative SVD before it is reported as failed.
    pub const SVD_MAX_ITERATIONS: usize = 10_000;

    /// Thin-SVD pseudo-inverse solve shared by the f32 and f64 bridges.
    ///
    /// `svd_eps` is the convergence threshold of the SVD iteration. It must
    /// not be tighter than nalgebra's own `svd()` default (`5ε`): below that
    /// the iteration can stop on factors that do not reproduce rank-deficient
    /// designs.
    pub fn pseudo_inverse_solve<T: RealField + Copy>(
        design: &[T],
        rows: usize,
        cols: usize,
        target: &[T],
        rcond: Option<T>,
        svd_eps: T,
    ) -> Option<PseudoInverseSolve<T>> {
        debug_assert_eq!(design.len(), rows * cols);
        debug_assert_eq!(target.len(), cols);

        let a = DMatrix::from_row_slice(rows, cols, design);
        let svd = a.try_svd(true, true, svd_eps, SVD_MAX_ITERATIONS)?;
        let u = svd.u.as_ref()?;
        let v_t = svd.v_t.as_ref()?;
        let s = &svd.singular_values;

        // f·V as a column: Vᵗ·fᵗ
        let f = DVector::from_column_slice(target);
        let mut y = v_t * f;

        let s_max = s
            .iter()
            .copied()
            .fold(T::zero(), |m, v| if v > m { v } else { m });
        let cutoff = rcond.map(|r| r * s_max);

        let mut truncated = 0;
        for (yi, &si) in y.iter_mut().zip(s.iter()) {
            match cutoff {
                Some(c) if si <= c => {
                    *yi = T::zero();
                    truncated += 1;
                }
                _ => *yi /= si,
            }
        }

        let x = u * y;
        Some(PseudoInverseSolve {
            coefficients: x.as_slice().to_vec(),
            singular_values: s.as_slice().to_vec(),
            truncated,
        })
    }

    /// Row-vector product `x · M` for a row-major `M` (`x.len() × cols`).
    pub fn combine_rows<T: Float>(coefficients: &[T], rows: &[T], cols: usize) -> Vec<T> {
        debug_assert_eq!(rows.len(), coefficients.len() * cols);
        let mut out = vec![T::zero(); cols];
        for (&c, row) in coefficients.iter().zip(rows.chunks_exact(cols)) {
            for (o, &v) in out.iter_mut().zip(row.iter()) {
                *o = *o + c * v;
            }
        }
        out
    }
}
