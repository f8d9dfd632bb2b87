//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer turns the engine into the detrending modes callers choose:
//!
//! - **Segmented**: Split on observing gaps, smooth each long-enough segment
//!   with a window of a fixed number of points.
//! - **Full**: One smoothing pass over the whole light curve with a fixed
//!   fraction.
//!
//! # Architecture
//!
//! ```text
//! Layer 8: Pipeline
//!   ↓
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

/// Gap-aware per-segment detrending.
pub mod segmented;

/// Whole-curve detrending.
pub mod full;

/// Parameters configured on a builder, in order, and the first one set twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParamLog {
    configured: Vec<&'static str>,
    duplicate: Option<&'static str>,
}

impl ParamLog {
    pub(crate) fn record(&mut self, name: &'static str) {
        if self.configured.contains(&name) {
            self.duplicate.get_or_insert(name);
        } else {
            self.configured.push(name);
        }
    }

    pub(crate) fn duplicate(&self) -> Option<&'static str> {
        self.duplicate
    }
}
