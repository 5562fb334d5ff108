//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures everything else is built on:
//! - Grids, gridded fields and time series of fields
//! - Calendar arithmetic for exclusion windows
//! - The crate error type
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types.
pub mod errors;

/// Grid metadata and field series.
pub mod grid;

/// Calendar helpers (anniversaries, day-of-year windows).
pub mod calendar;
