//! Aggregation of repeated reconstructions.
//!
//! ## Purpose
//!
//! This module repeats the randomized reconstruction `niter` times for one
//! target step, keeps every iteration for downstream uncertainty estimates,
//! and averages them per grid point.
//!
//! ## Invariants
//!
//! * The stack holds exactly `niter` iterations, in draw order.
//! * With a single iteration the mean is that iteration, bit for bit.

use chrono::NaiveDate;
use num_traits::Float;
use rand::Rng;

use crate::algorithms::reconstruction::{IterationResult, PseudoInverseReconstructor};
use crate::algorithms::selection::AnalogPool;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AdjustmentError;

/// All iterations of one target step plus their means.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutput<T> {
    /// Every iteration, in draw order.
    pub iterations: Vec<IterationResult<T>>,
    /// Mean circulation reconstruction.
    pub circulation_mean: Vec<T>,
    /// Mean response reconstruction.
    pub response_mean: Vec<T>,
}

impl<T> AggregateOutput<T> {
    /// Total singular values truncated over all iterations.
    pub fn truncated(&self) -> usize {
        self.iterations.iter().map(|it| it.truncated).sum()
    }
}

/// Repeats reconstructions and averages them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationAggregator {
    n_iterations: usize,
}

impl IterationAggregator {
    /// Aggregator running `n_iterations` reconstructions per step.
    pub fn new(n_iterations: usize) -> Self {
        Self { n_iterations }
    }

    /// Iteration count (`niter`).
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Reconstruct `target` `niter` times from `pool` and average.
    pub fn aggregate<T: FloatLinalg, R: Rng + ?Sized>(
        &self,
        reconstructor: &PseudoInverseReconstructor<'_, T>,
        date: NaiveDate,
        target: &[T],
        pool: &AnalogPool<T>,
        rng: &mut R,
    ) -> Result<AggregateOutput<T>, AdjustmentError> {
        let iterations = (0..self.n_iterations)
            .map(|_| reconstructor.reconstruct(date, target, pool, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_iterations(iterations))
    }

    /// Average an already computed stack of iterations.
    pub fn from_iterations<T: Float>(iterations: Vec<IterationResult<T>>) -> AggregateOutput<T> {
        let circulation_mean = element_mean(iterations.iter().map(|it| it.circulation.as_slice()));
        let response_mean = element_mean(iterations.iter().map(|it| it.response.as_slice()));
        AggregateOutput {
            iterations,
            circulation_mean,
            response_mean,
        }
    }
}

/// Per-element arithmetic mean of equally sized fields.
fn element_mean<'a, T: Float + 'a>(mut fields: impl ExactSizeIterator<Item = &'a [T]>) -> Vec<T> {
    let count = fields.len();
    let Some(first) = fields.next() else {
        return Vec::new();
    };
    let mut sum = first.to_vec();
    if count == 1 {
        return sum;
    }
    for field in fields {
        for (s, &v) in sum.iter_mut().zip(field.iter()) {
            *s = *s + v;
        }
    }
    let n = T::from(count).unwrap_or_else(T::one);
    sum.iter_mut().for_each(|s| *s = *s / n);
    sum
}
