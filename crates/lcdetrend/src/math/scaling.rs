//! Robust location and scale estimation.
//!
//! This module provides the order statistics the rest of the crate leans on:
//! quickselect medians, MAD/MAR scale estimates for robustness weighting,
//! the median sampling cadence of a light curve, and NaN-aware summaries.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Consistency constant turning a MAD into a Gaussian sigma estimate.
pub const MAD_TO_SIGMA: f64 = 1.4826;

// Method for measuring the scale of residuals.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalingMethod {
    // Median Absolute Residual: `median(|r|)`.
    #[default]
    MAR,

    // Median Absolute Deviation: `median(|r - median(r)|)`.
    MAD,

    // Mean Absolute Residual: `mean(|r|)`.
    Mean,
}

impl ScalingMethod {
    // Compute the scale of the given values; `vals` is used as scratch space.
    pub fn compute<T: Float>(&self, vals: &mut [T]) -> T {
        if vals.is_empty() {
            return T::zero();
        }

        match self {
            Self::MAR => {
                for val in vals.iter_mut() {
                    *val = val.abs();
                }
                median_inplace(vals)
            }
            Self::MAD => mad_inplace(vals),
            Self::Mean => {
                let n = T::from(vals.len()).unwrap_or(T::one());
                vals.iter().fold(T::zero(), |acc, v| acc + v.abs()) / n
            }
        }
    }
}

/// Median of `vals` computed in place with quickselect.
///
/// Returns zero for empty input. `vals` is reordered.
pub fn median_inplace<T: Float>(vals: &mut [T]) -> T {
    let n = vals.len();
    if n == 0 {
        return T::zero();
    }

    let mid = n / 2;
    vals.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let upper = vals[mid];

    if n.is_multiple_of(2) {
        // Largest value of the lower half
        let lower = vals[..mid].iter().copied().fold(vals[0], T::max);
        (lower + upper) / (T::one() + T::one())
    } else {
        upper
    }
}

/// Median absolute deviation computed in place.
pub fn mad_inplace<T: Float>(vals: &mut [T]) -> T {
    if vals.is_empty() {
        return T::zero();
    }

    let med = median_inplace(vals);
    for val in vals.iter_mut() {
        *val = (*val - med).abs();
    }
    median_inplace(vals)
}

/// Median of the finite values in `data`, or `None` if there are none.
pub fn median<T: Float>(data: &[T]) -> Option<T> {
    let mut v: Vec<T> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    Some(median_inplace(&mut v))
}

/// Median absolute deviation of the finite values in `data`.
pub fn median_absolute_deviation<T: Float>(data: &[T]) -> Option<T> {
    let mut v: Vec<T> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    Some(mad_inplace(&mut v))
}

/// Median spacing between consecutive positive, finite time steps.
pub fn median_cadence<T: Float>(times: &[T]) -> Option<T> {
    if times.len() < 2 {
        return None;
    }
    let dts: Vec<T> = times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| dt.is_finite() && *dt > T::zero())
        .collect();
    median(&dts)
}

/// Mean of the finite values in `data`.
pub fn nan_mean<T: Float>(data: &[T]) -> Option<T> {
    let (sum, count) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((T::zero(), 0usize), |(s, c), &x| (s + x, c + 1));
    if count == 0 {
        return None;
    }
    Some(sum / T::from(count).unwrap())
}

/// Population standard deviation of the finite values in `data` (ddof = 0).
pub fn nan_std<T: Float>(data: &[T]) -> Option<T> {
    let mean = nan_mean(data)?;
    let (ss, count) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((T::zero(), 0usize), |(s, c), &x| {
            let d = x - mean;
            (s + d * d, c + 1)
        });
    Some((ss / T::from(count).unwrap()).sqrt())
}
