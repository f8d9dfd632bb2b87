//! Kernel (weight) functions for local regression.
//!
//! ## Purpose
//!
//! This module provides kernel functions that turn the distance between a
//! neighbor and the point being fitted into a regression weight.
//!
//! ## Design notes
//!
//! * **Normalization**: Maps distances u = |t - t_i| / radius to weights.
//! * **Support**: All kernels are bounded on [-1, 1].
//! * **Thresholds**: Neighbors closer than 0.1% of the radius get weight one;
//!   neighbors beyond 99.9% get weight zero, as in Cleveland's reference code.
//!
//! ## Invariants
//!
//! * Kernels are non-negative (K(u) >= 0) and symmetric (K(u) = K(-u)).
//! * Kernels return exactly zero outside their support.

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};

// ============================================================================
// Weight Function Enum
// ============================================================================

/// Weight function (kernel) for local regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightFunction {
    /// Tricube kernel: K(u) = (1 - |u|^3)^3 for |u| < 1.
    ///
    /// Cleveland's original choice and the default.
    #[default]
    Tricube,

    /// Biweight (quartic) kernel: K(u) = (1 - u^2)^2 for |u| < 1.
    Biweight,

    /// Epanechnikov kernel: K(u) = (1 - u^2) for |u| < 1.
    Epanechnikov,

    /// Triangular kernel: K(u) = (1 - |u|) for |u| < 1.
    Triangle,

    /// Uniform kernel: K(u) = 1 for |u| < 1.
    Uniform,
}

impl WeightFunction {
    /// Human-readable kernel name.
    pub const fn name(&self) -> &'static str {
        match self {
            WeightFunction::Tricube => "Tricube",
            WeightFunction::Biweight => "Biweight",
            WeightFunction::Epanechnikov => "Epanechnikov",
            WeightFunction::Triangle => "Triangle",
            WeightFunction::Uniform => "Uniform",
        }
    }

    /// Evaluate the kernel at normalized distance `u`.
    pub fn compute_weight<T: Float>(&self, u: T) -> T {
        let abs_u = u.abs();

        if abs_u >= T::one() {
            return T::zero();
        }

        match self {
            WeightFunction::Tricube => {
                let tmp = T::one() - abs_u * abs_u * abs_u;
                tmp * tmp * tmp
            }

            WeightFunction::Biweight => {
                let tmp = T::one() - abs_u * abs_u;
                tmp * tmp
            }

            WeightFunction::Epanechnikov => T::one() - abs_u * abs_u,

            WeightFunction::Triangle => T::one() - abs_u,

            WeightFunction::Uniform => T::one(),
        }
    }

    /// Fill `weights[left..=right]` with kernel weights around `x_current`.
    ///
    /// Returns the weight sum and the rightmost index with non-zero weight.
    /// Entries outside the returned range inside the window are zeroed.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_window_weights<T: Float>(
        &self,
        x: &[T],
        left: usize,
        right: usize,
        x_current: T,
        radius: T,
        h1: T,
        h9: T,
        weights: &mut [T],
    ) -> (T, usize) {
        let n = x.len();

        if left >= n || right >= n || left > right {
            return (T::zero(), left);
        }

        if radius <= T::zero() {
            weights[left..=right].fill(T::zero());
            return (T::zero(), left);
        }

        let mut sum = T::zero();
        let mut rightmost = left;

        for j in left..=right {
            let xj = x[j];
            let distance = (xj - x_current).abs();

            if distance > h9 {
                weights[j] = T::zero();
                if xj > x_current {
                    // x is sorted, so everything further right is out of reach too
                    weights[j..=right].fill(T::zero());
                    break;
                }
                continue;
            }

            let w = if distance <= h1 {
                T::one()
            } else {
                self.compute_weight(distance / radius)
            };

            weights[j] = w;
            sum = sum + w;
            rightmost = j;
        }

        (sum, rightmost)
    }
}
