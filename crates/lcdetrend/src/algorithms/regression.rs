//! Local weighted linear regression.
//!
//! ## Purpose
//!
//! This module holds the per-point fit of the smoother: kernel weights over
//! the nearest-neighbor window, optional robustness reweighting, and a
//! weighted least-squares line evaluated at the point being smoothed.
//!
//! ## Design notes
//!
//! * **Accumulation**: One pass collects the five weighted sums; `f64` uses
//!   `wide` lanes, other float types use the scalar path.
//! * **Degenerate windows**: Zero x-spread falls back to a weighted mean.
//! * **Zero weights**: Governed by [`ZeroWeightFallback`].

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};
use wide::f64x4;

// Internal dependencies
use crate::math::kernel::WeightFunction;
use crate::primitives::window::Window;

// ============================================================================
// Zero-Weight Fallback Policy
// ============================================================================

/// Policy for a local fit whose weights all vanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZeroWeightFallback {
    /// Unweighted mean of the window (default).
    #[default]
    UseLocalMean,

    /// Keep the observed flux value.
    ReturnOriginal,

    /// Report no fit; the executor keeps the previous estimate.
    ReturnNone,
}

impl ZeroWeightFallback {
    fn resolve<T: Float>(self, y: &[T], window: Window, idx: usize) -> Option<T> {
        match self {
            Self::UseLocalMean => {
                let slice = &y[window.left..=window.right];
                let sum = slice.iter().fold(T::zero(), |acc, &v| acc + v);
                Some(sum / T::from(slice.len()).unwrap_or(T::one()))
            }
            Self::ReturnOriginal => Some(y[idx]),
            Self::ReturnNone => None,
        }
    }
}

// ============================================================================
// Weighted Sums
// ============================================================================

/// Weighted sums `(Σw, Σwx, Σwy, Σwxx, Σwxy)` of one window, with x measured
/// from a caller-chosen origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSums<T> {
    pub w: T,
    pub wx: T,
    pub wy: T,
    pub wxx: T,
    pub wxy: T,
}

/// Float types that know how to accumulate weighted sums.
pub trait WeightedAccumulate: Float {
    /// Accumulate weighted sums over paired slices.
    fn accumulate(x: &[Self], y: &[Self], w: &[Self], origin: Self) -> WeightedSums<Self> {
        accumulate_scalar(x, y, w, origin)
    }
}

impl WeightedAccumulate for f32 {}

impl WeightedAccumulate for f64 {
    fn accumulate(x: &[f64], y: &[f64], w: &[f64], origin: f64) -> WeightedSums<f64> {
        accumulate_simd_f64(x, y, w, origin)
    }
}

/// Generic scalar accumulation.
pub fn accumulate_scalar<T: Float>(x: &[T], y: &[T], w: &[T], origin: T) -> WeightedSums<T> {
    let mut s = WeightedSums {
        w: T::zero(),
        wx: T::zero(),
        wy: T::zero(),
        wxx: T::zero(),
        wxy: T::zero(),
    };
    for ((&xi, &yi), &wi) in x.iter().zip(y).zip(w) {
        let xi = xi - origin;
        let wx = wi * xi;
        s.w = s.w + wi;
        s.wx = s.wx + wx;
        s.wy = s.wy + wi * yi;
        s.wxx = s.wxx + wx * xi;
        s.wxy = s.wxy + wx * yi;
    }
    s
}

/// Four-lane accumulation for `f64`.
pub fn accumulate_simd_f64(x: &[f64], y: &[f64], w: &[f64], origin: f64) -> WeightedSums<f64> {
    let n = x.len().min(y.len()).min(w.len());
    let (x, y, w) = (&x[..n], &y[..n], &w[..n]);

    let o = f64x4::splat(origin);
    let mut s_w = f64x4::splat(0.0);
    let mut s_wx = f64x4::splat(0.0);
    let mut s_wy = f64x4::splat(0.0);
    let mut s_wxx = f64x4::splat(0.0);
    let mut s_wxy = f64x4::splat(0.0);

    let xc = x.chunks_exact(4);
    let yc = y.chunks_exact(4);
    let wc = w.chunks_exact(4);
    let (xr, yr, wr) = (xc.remainder(), yc.remainder(), wc.remainder());

    for ((xs, ys), ws) in xc.zip(yc).zip(wc) {
        let xv = f64x4::new([xs[0], xs[1], xs[2], xs[3]]) - o;
        let yv = f64x4::new([ys[0], ys[1], ys[2], ys[3]]);
        let wv = f64x4::new([ws[0], ws[1], ws[2], ws[3]]);
        let wx = wv * xv;
        s_w += wv;
        s_wx += wx;
        s_wy += wv * yv;
        s_wxx += wx * xv;
        s_wxy += wx * yv;
    }

    let tail = accumulate_scalar(xr, yr, wr, origin);
    WeightedSums {
        w: s_w.reduce_add() + tail.w,
        wx: s_wx.reduce_add() + tail.wx,
        wy: s_wy.reduce_add() + tail.wy,
        wxx: s_wxx.reduce_add() + tail.wxx,
        wxy: s_wxy.reduce_add() + tail.wxy,
    }
}

// ============================================================================
// LinearFit
// ============================================================================

/// Straight-line fit `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    pub slope: T,
    pub intercept: T,
}

impl<T: Float> LinearFit<T> {
    /// Horizontal line at `level`.
    pub fn constant(level: T) -> Self {
        Self {
            slope: T::zero(),
            intercept: level,
        }
    }

    #[inline]
    pub fn predict(&self, x: T) -> T {
        self.intercept + self.slope * x
    }

    /// Solve the normal equations from accumulated sums.
    ///
    /// Returns `None` when the total weight is not positive. A spread below
    /// `tol` collapses to the weighted mean.
    pub fn from_sums(s: WeightedSums<T>, tol: T) -> Option<Self> {
        if s.w <= T::zero() {
            return None;
        }
        let x_mean = s.wx / s.w;
        let y_mean = s.wy / s.w;
        let variance = s.wxx - s.wx * x_mean;
        if variance <= tol {
            return Some(Self::constant(y_mean));
        }
        let slope = (s.wxy - s.wx * y_mean) / variance;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }
}

impl<T: WeightedAccumulate> LinearFit<T> {
    /// Weighted least squares with x measured from `origin`.
    ///
    /// The returned line is in shifted coordinates, so `predict(0)` is the
    /// fitted value at `origin`.
    pub fn fit_wls(x: &[T], y: &[T], weights: &[T], origin: T, radius: T) -> Option<Self> {
        let sums = T::accumulate(x, y, weights, origin);
        let tol = T::from(1e-7).unwrap().max(T::epsilon() * radius * radius);
        Self::from_sums(sums, tol)
    }
}

// ============================================================================
// Local Fit
// ============================================================================

/// Everything needed to smooth one point.
pub struct LocalFit<'a, T> {
    pub x: &'a [T],
    pub y: &'a [T],
    pub idx: usize,
    pub window: Window,
    /// Robustness weights, or `None` on the first pass.
    pub robustness_weights: Option<&'a [T]>,
    /// Scratch space for kernel weights, same length as `x`.
    pub weights: &'a mut [T],
    pub weight_function: WeightFunction,
    pub zero_weight_fallback: ZeroWeightFallback,
}

impl<T: WeightedAccumulate> LocalFit<'_, T> {
    /// Smoothed value at `x[idx]`.
    pub fn fit(&mut self) -> Option<T> {
        let n = self.x.len();
        if self.idx >= n || self.window.right >= n || self.window.left > self.window.right {
            return None;
        }

        let x_current = self.x[self.idx];
        let radius = self.window.max_distance(self.x, x_current);

        // All neighbors share one timestamp
        if radius <= T::zero() {
            let (mut sum_w, mut sum_wy) = (T::zero(), T::zero());
            for j in self.window.left..=self.window.right {
                let w = self.robustness_weights.map_or(T::one(), |r| r[j]);
                sum_w = sum_w + w;
                sum_wy = sum_wy + w * self.y[j];
            }
            return if sum_w > T::zero() {
                Some(sum_wy / sum_w)
            } else {
                self.zero_weight_fallback.resolve(self.y, self.window, self.idx)
            };
        }

        let h1 = T::from(0.001).unwrap() * radius;
        let h9 = T::from(0.999).unwrap() * radius;
        let (mut weight_sum, rightmost) = self.weight_function.compute_window_weights(
            self.x,
            self.window.left,
            self.window.right,
            x_current,
            radius,
            h1,
            h9,
            self.weights,
        );

        if let Some(robust) = self.robustness_weights {
            weight_sum = T::zero();
            for j in self.window.left..=rightmost {
                let w = self.weights[j] * robust[j];
                self.weights[j] = w;
                weight_sum = weight_sum + w;
            }
        }

        if weight_sum <= T::zero() {
            return self.zero_weight_fallback.resolve(self.y, self.window, self.idx);
        }

        let range = self.window.left..=rightmost;
        let model = LinearFit::fit_wls(
            &self.x[range.clone()],
            &self.y[range.clone()],
            &self.weights[range],
            x_current,
            radius,
        );
        match model {
            Some(m) => Some(m.predict(T::zero())),
            None => self.zero_weight_fallback.resolve(self.y, self.window, self.idx),
        }
    }
}
