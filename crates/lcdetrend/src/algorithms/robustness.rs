//! Robustness weights for outlier downweighting.
//!
//! ## Purpose
//!
//! After each smoothing pass the residuals are turned into per-point weights
//! so flares, cosmic rays and residual transits pull less on the next pass.
//!
//! ## Design notes
//!
//! * **Scale**: MAR by default (`6 * median(|r|)` for bisquare, as in
//!   Cleveland's lowess), with a mean absolute residual fallback when the
//!   robust scale collapses.
//! * **Methods**: Bisquare (default), Huber and Talwar.
//!
//! ## Invariants
//!
//! * Weights lie in [0, 1].
//! * A zero scale leaves every weight at one.

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::math::scaling::ScalingMethod;

/// Robustness weighting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RobustnessMethod {
    /// Tukey's biweight with c = 6; rejects residuals beyond six scales.
    #[default]
    Bisquare,

    /// Huber weights with c = 1.345; downweights but never rejects.
    Huber,

    /// Hard rejection beyond c = 2.5 scales.
    Talwar,
}

impl RobustnessMethod {
    const BISQUARE_C: f64 = 6.0;
    const HUBER_C: f64 = 1.345;
    const TALWAR_C: f64 = 2.5;

    // If the scale drops below this fraction of the mean absolute residual,
    // the mean absolute residual is used instead.
    const SCALE_THRESHOLD: f64 = 1e-7;
    const MIN_SCALE: f64 = 1e-12;

    const fn tuning_constant(&self) -> f64 {
        match self {
            Self::Bisquare => Self::BISQUARE_C,
            Self::Huber => Self::HUBER_C,
            Self::Talwar => Self::TALWAR_C,
        }
    }

    /// Overwrite `weights` with robustness weights for `residuals`.
    ///
    /// `scratch` must be at least as long as `residuals`.
    pub fn apply<T: Float>(&self, residuals: &[T], weights: &mut [T], scaling: ScalingMethod, scratch: &mut [T]) {
        if residuals.is_empty() {
            return;
        }

        let scale = Self::robust_scale(residuals, scaling, &mut scratch[..residuals.len()]);
        let c = T::from(self.tuning_constant()).unwrap();

        for (w, &r) in weights.iter_mut().zip(residuals) {
            *w = match self {
                Self::Bisquare => bisquare(r, scale, c),
                Self::Huber => huber(r, scale, c),
                Self::Talwar => talwar(r, scale, c),
            };
        }
    }

    fn robust_scale<T: Float>(residuals: &[T], scaling: ScalingMethod, scratch: &mut [T]) -> T {
        scratch.copy_from_slice(residuals);
        let scale = scaling.compute(scratch);

        let n = T::from(residuals.len()).unwrap();
        let mean_abs = residuals.iter().fold(T::zero(), |a, r| a + r.abs()) / n;

        let floor = (T::from(Self::SCALE_THRESHOLD).unwrap() * mean_abs).max(T::from(Self::MIN_SCALE).unwrap());
        if scale <= floor { mean_abs.max(scale) } else { scale }
    }
}

#[inline]
fn bisquare<T: Float>(residual: T, scale: T, c: T) -> T {
    if scale <= T::zero() {
        return T::one();
    }
    let cmad = scale * c;
    let r = residual.abs();

    if r <= T::from(0.001).unwrap() * cmad {
        T::one()
    } else if r <= T::from(0.999).unwrap() * cmad {
        let u = r / cmad;
        let tmp = T::one() - u * u;
        tmp * tmp
    } else {
        T::zero()
    }
}

#[inline]
fn huber<T: Float>(residual: T, scale: T, c: T) -> T {
    if scale <= T::zero() {
        return T::one();
    }
    let u = (residual / scale).abs();
    if u <= c { T::one() } else { c / u }
}

#[inline]
fn talwar<T: Float>(residual: T, scale: T, c: T) -> T {
    if scale <= T::zero() {
        return T::one();
    }
    if (residual / scale).abs() <= c { T::one() } else { T::zero() }
}
