//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer post-processes reconstructions: residuals, explained variance
//! and analog quality diagnostics.
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
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Residuals and diagnostics.
pub mod diagnostics;
