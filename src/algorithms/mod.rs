//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the constructed-analogue method itself:
//! - Analog selection under exclusion policies
//! - Random sub-sampling and per-step seeding
//! - Pseudo-inverse reconstruction of both variables
//! - Aggregation of repeated reconstructions
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Analog pool selection and exclusion policies.
pub mod selection;

/// Sub-sample draws and generator seeding.
pub mod sampling;

/// One reconstruction iteration.
pub mod reconstruction;

/// Iteration stacks and means.
pub mod aggregation;
