//! Layer 8: Pipeline
//!
//! # Purpose
//!
//! This layer strings the lower layers into a single-target transit search:
//! light-curve cleaning, optional variability and transit masking,
//! detrending, a rotation-period estimate, and the Box Least Squares search
//! with its ranked period candidates.
//!
//! # Architecture
//!
//! ```text
//! Layer 8: Pipeline ← You are here
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
//! Layer 1: Primitives
//! ```

/// Light-curve container and cleaning.
pub mod lightcurve;

/// Instrumental systematics masks.
pub mod systematics;

/// Removal of stellar variability crests and troughs.
pub mod variability;

/// Interpolation over known transits.
pub mod transit_mask;

/// Rotation period estimate.
pub mod rotation;

/// End-to-end transit search.
pub mod search;
