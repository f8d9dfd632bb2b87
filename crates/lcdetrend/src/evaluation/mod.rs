//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer measures and exercises the detrending results:
//! - Summary statistics of the detrended (relative) flux
//! - Synthetic transit injection for recovery tests
//!
//! # Architecture
//!
//! ```text
//! Layer 8: Pipeline
//!   ↓
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

/// Summary statistics of detrended flux.
pub mod diagnostics;

/// Synthetic box-transit injection.
pub mod injection;
