//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides execution adapters:
//! - Series: training and targets are the same paired series
//! - Ensemble: members adjusted against an external training series
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Same-series adjustment.
pub mod series;

/// Ensemble adjustment.
pub mod ensemble;
