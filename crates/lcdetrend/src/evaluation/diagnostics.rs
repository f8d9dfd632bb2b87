//! Summary statistics of a detrended light curve.
//!
//! ## Purpose
//!
//! A well-behaved detrend leaves relative flux scattered around one. This
//! module condenses the residual series into a handful of numbers used by
//! logging, reports and tests.
//!
//! ## Design notes
//!
//! * **Robust scatter**: `mad_sigma = 1.4826 * MAD`, insensitive to transits
//!   and flares that inflate the plain standard deviation.
//! * **NaN-aware**: Non-finite samples are ignored.
//!
//! ## Invariants
//!
//! * `n` counts finite samples only.
//! * `min <= mean <= max` whenever `n > 0`.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::math::scaling::{MAD_TO_SIGMA, median_absolute_deviation, nan_mean, nan_std};

/// Location and scatter of a residual (relative flux) series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualDiagnostics<T> {
    /// Number of finite samples.
    pub n: usize,

    /// Mean relative flux.
    pub mean: T,

    /// Population standard deviation.
    pub std_dev: T,

    /// Gaussian-equivalent scatter from the MAD.
    pub mad_sigma: T,

    pub min: T,
    pub max: T,
}

impl<T: Float> ResidualDiagnostics<T> {
    /// Compute diagnostics, or `None` if no sample is finite.
    pub fn compute(residual: &[T]) -> Option<Self> {
        let mean = nan_mean(residual)?;
        let std_dev = nan_std(residual)?;
        let mad = median_absolute_deviation(residual)?;

        let finite = residual.iter().copied().filter(|v| v.is_finite());
        let (n, min, max) = finite.fold((0usize, T::infinity(), T::neg_infinity()), |(n, lo, hi), v| {
            (n + 1, lo.min(v), hi.max(v))
        });

        Some(Self {
            n,
            mean,
            std_dev,
            mad_sigma: mad * T::from(MAD_TO_SIGMA).unwrap(),
            min,
            max,
        })
    }

    /// Scatter in parts per million of the mean level.
    pub fn ppm(&self) -> T {
        if self.mean == T::zero() {
            return T::zero();
        }
        self.mad_sigma / self.mean.abs() * T::from(1e6).unwrap()
    }
}

impl<T: Float + Display> Display for ResidualDiagnostics<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Residual Diagnostics:")?;
        writeln!(f, "  Points:     {}", self.n)?;
        writeln!(f, "  Mean:       {:.6}", self.mean)?;
        writeln!(f, "  Std Dev:    {:.6}", self.std_dev)?;
        writeln!(f, "  MAD sigma:  {:.6}", self.mad_sigma)?;
        writeln!(f, "  Range:      [{:.6}, {:.6}]", self.min, self.max)
    }
}
