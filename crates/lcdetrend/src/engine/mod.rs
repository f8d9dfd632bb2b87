//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates the smoother:
//! - Validation of light curves and parameters
//! - The LOWESS iteration loop over one sorted series
//! - Result types handed back to callers
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

/// Core execution loop.
pub mod executor;

/// Detrending result types.
pub mod output;

/// Input and parameter validation.
pub mod validator;
