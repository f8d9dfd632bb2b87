//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures and utilities used throughout the
//! crate: errors, smoothing windows, working buffers, gap segmentation and
//! sorting. It has zero internal dependencies within the crate.
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
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
pub mod errors;

/// Windowing logic.
pub mod window;

/// Buffer management.
pub mod buffer;

/// Gap-based segmentation of time series.
pub mod segment;

/// Sorting utilities.
pub mod sorting;
