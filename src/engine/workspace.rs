//! Workspace for reusable analog search buffers.
//!
//! This module provides pre-allocated buffers so the per-step analog search
//! does not reallocate its candidate list and distance table for every
//! target step.

use num_traits::Float;

use crate::algorithms::selection::DistanceRecord;

/// Pre-allocated buffers for one worker's analog searches.
///
/// One workspace is created per worker and reused across the target steps
/// that worker processes.
#[derive(Debug, Clone)]
pub struct AnalogWorkspace<T: Float> {
    /// Admissible training indices for the current step.
    pub candidates: Vec<usize>,
    /// Distance table for the current step.
    pub table: Vec<DistanceRecord<T>>,
}

impl<T: Float> AnalogWorkspace<T> {
    /// Create a workspace sized for a training series of `n_training` steps.
    pub fn with_capacity(n_training: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(n_training),
            table: Vec::with_capacity(n_training),
        }
    }

    /// Clear buffers for the next target step.
    ///
    /// Note: Does not deallocate, only resets logical lengths.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.table.clear();
    }
}
