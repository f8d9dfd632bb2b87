//! Reusable working memory for the LOWESS smoother.
//!
//! ## Purpose
//!
//! A segmented detrend calls the smoother once per observing segment. Keeping
//! one buffer alive across segments means each call only grows the vectors
//! when a longer segment arrives, instead of allocating five fresh vectors.
//!
//! ## Invariants
//!
//! * After `prepare(n, ..)` every active vector has length `n`.
//! * Robustness weights start at one; kernel weights start at zero.
//! * Capacity never shrinks.

// External dependencies
use num_traits::Float;

// ============================================================================
// Smoother Buffer
// ============================================================================

/// Working vectors used by the smoothing executor.
#[derive(Debug, Clone, Default)]
pub struct SmoothBuffer<T> {
    /// Smoothed values of the current iteration.
    pub y_smooth: Vec<T>,

    /// Smoothed values of the previous iteration (auto-convergence only).
    pub y_prev: Vec<T>,

    /// Residuals `y - y_smooth` used for robustness weighting.
    pub residuals: Vec<T>,

    /// Kernel weights, rewritten for every local fit.
    pub weights: Vec<T>,

    /// Robustness weights carried between iterations.
    pub robustness_weights: Vec<T>,
}

impl<T: Float> SmoothBuffer<T> {
    /// Create an empty buffer with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            y_smooth: Vec::with_capacity(capacity),
            y_prev: Vec::new(),
            residuals: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            robustness_weights: Vec::with_capacity(capacity),
        }
    }

    /// Reset every vector for a fit over `n` points.
    pub fn prepare(&mut self, n: usize, track_previous: bool) {
        reset(&mut self.y_smooth, n, T::zero());
        reset(&mut self.residuals, n, T::zero());
        reset(&mut self.weights, n, T::zero());
        reset(&mut self.robustness_weights, n, T::one());

        if track_previous {
            reset(&mut self.y_prev, n, T::zero());
        } else {
            self.y_prev.clear();
        }
    }
}

#[inline]
fn reset<T: Copy>(v: &mut Vec<T>, n: usize, value: T) {
    v.clear();
    v.resize(n, value);
}
