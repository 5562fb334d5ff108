//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates the per-step pipeline:
//! - Input and configuration validation
//! - Step execution, sequential or parallel
//! - Worker workspaces and output assembly
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input validation.
pub mod validator;

/// Configuration and the step executor.
pub mod executor;

/// Reusable per-worker buffers.
pub mod workspace;

/// Output arrays and results.
pub mod output;
