//! Lomb-Scargle periodogram for unevenly sampled light curves.
//!
//! ## Purpose
//!
//! Stellar rotation shows up as a quasi-sinusoidal modulation. The rotation
//! period is estimated as the period of the strongest Lomb-Scargle peak on a
//! fixed frequency grid.
//!
//! ## Design notes
//!
//! * **Model**: Floating-mean sinusoid (generalised Lomb-Scargle), so the
//!   data need not be centred beforehand.
//! * **Normalization**: "standard", i.e. `1 - chi2_model / chi2_constant`,
//!   which lies in [0, 1].
//! * **Trigonometry**: On a uniform grid the phases of each sample advance by
//!   a fixed rotation per step, so sines and cosines are updated by complex
//!   multiplication and re-anchored periodically to bound rounding drift.

// External dependencies
use core::f64::consts::TAU;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::primitives::errors::DetrendError;

// Steps between exact re-evaluations of the trigonometric recurrence.
const RESYNC_INTERVAL: usize = 1024;

/// Uniform frequency grid `min, min + step, ...` below `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyGrid {
    pub min: f64,
    pub step: f64,
    pub count: usize,
}

impl FrequencyGrid {
    /// Frequencies from `min` up to, but excluding, `max`.
    pub fn range(min: f64, max: f64, step: f64) -> Result<Self, DetrendError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(DetrendError::InvalidFrequencyGrid(format!(
                "non-finite bounds: min={min}, max={max}, step={step}"
            )));
        }
        if min <= 0.0 || step <= 0.0 || max <= min {
            return Err(DetrendError::InvalidFrequencyGrid(format!(
                "need 0 < min < max and step > 0, got min={min}, max={max}, step={step}"
            )));
        }
        let count = ((max - min) / step).ceil() as usize;
        Ok(Self { min, step, count })
    }

    #[inline]
    pub fn frequency(&self, k: usize) -> f64 {
        self.min + self.step * k as f64
    }

    pub fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|k| self.frequency(k))
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for FrequencyGrid {
    /// 0.04 to 4.1 cycles per day in steps of 1e-5.
    fn default() -> Self {
        let (min, max, step) = (0.04, 4.1, 1e-5);
        Self {
            min,
            step,
            count: ((max - min) / step).ceil() as usize,
        }
    }
}

/// Periodogram power on a frequency grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LombScargleResult {
    pub grid: FrequencyGrid,
    pub power: Vec<f64>,
}

impl LombScargleResult {
    /// Index of the highest power (first one on ties).
    pub fn peak_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &p) in self.power.iter().enumerate() {
            if best.is_none_or(|b| p > self.power[b]) {
                best = Some(i);
            }
        }
        best
    }

    pub fn best_frequency(&self) -> Option<f64> {
        self.peak_index().map(|i| self.grid.frequency(i))
    }

    /// Period of the strongest peak, `1 / f_peak`.
    pub fn best_period(&self) -> Option<f64> {
        self.best_frequency().map(|f| 1.0 / f)
    }
}

/// Lomb-Scargle model over one light curve.
#[derive(Debug, Clone)]
pub struct LombScargle<'a> {
    time: &'a [f64],
    flux: &'a [f64],
}

impl<'a> LombScargle<'a> {
    pub fn new(time: &'a [f64], flux: &'a [f64]) -> Result<Self, DetrendError> {
        if time.len() != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len(),
            });
        }
        if time.len() < 3 {
            return Err(DetrendError::TooFewPoints { got: time.len(), min: 3 });
        }
        if let Some(i) = time.iter().zip(flux).position(|(t, f)| !t.is_finite() || !f.is_finite()) {
            return Err(DetrendError::InvalidNumericValue(format!(
                "time[{i}]={}, flux[{i}]={}",
                time[i], flux[i]
            )));
        }
        Ok(Self { time, flux })
    }

    /// Standard-normalised power at every grid frequency.
    pub fn power(&self, grid: &FrequencyGrid) -> LombScargleResult {
        debug!(frequencies = grid.len(), points = self.time.len(), "Lomb-Scargle grid");

        let n = self.time.len();
        let inv_n = 1.0 / n as f64;
        let t0 = self.time[0];
        let mean = self.flux.iter().sum::<f64>() * inv_n;
        let y: Vec<f64> = self.flux.iter().map(|f| f - mean).collect();
        let yy = y.iter().map(|v| v * v).sum::<f64>() * inv_n;

        if yy <= 0.0 {
            return LombScargleResult {
                grid: *grid,
                power: vec![0.0; grid.len()],
            };
        }

        let dt: Vec<f64> = self.time.iter().map(|t| t - t0).collect();
        let mut cos_t = vec![0.0; n];
        let mut sin_t = vec![0.0; n];
        let rot: Vec<(f64, f64)> = dt
            .iter()
            .map(|&d| {
                let a = TAU * grid.step * d;
                (a.cos(), a.sin())
            })
            .collect();

        let mut power = Vec::with_capacity(grid.len());
        for k in 0..grid.len() {
            if k % RESYNC_INTERVAL == 0 {
                let omega = TAU * grid.frequency(k);
                for i in 0..n {
                    let (s, c) = (omega * dt[i]).sin_cos();
                    cos_t[i] = c;
                    sin_t[i] = s;
                }
            } else {
                for i in 0..n {
                    let (rc, rs) = rot[i];
                    let c = cos_t[i] * rc - sin_t[i] * rs;
                    let s = sin_t[i] * rc + cos_t[i] * rs;
                    cos_t[i] = c;
                    sin_t[i] = s;
                }
            }
            power.push(floating_mean_power(&y, &cos_t, &sin_t, yy, inv_n));
        }

        LombScargleResult { grid: *grid, power }
    }
}

// Generalised Lomb-Scargle power for centred data at one frequency.
fn floating_mean_power(y: &[f64], cos_t: &[f64], sin_t: &[f64], yy: f64, inv_n: f64) -> f64 {
    let (mut c, mut s) = (0.0, 0.0);
    let (mut yc, mut ys) = (0.0, 0.0);
    let (mut cc, mut ss, mut cs) = (0.0, 0.0, 0.0);

    for i in 0..y.len() {
        let (ci, si, yi) = (cos_t[i], sin_t[i], y[i]);
        c += ci;
        s += si;
        yc += yi * ci;
        ys += yi * si;
        cc += ci * ci;
        ss += si * si;
        cs += ci * si;
    }

    let (c, s) = (c * inv_n, s * inv_n);
    let yc = yc * inv_n;
    let ys = ys * inv_n;
    let cc = cc * inv_n - c * c;
    let ss = ss * inv_n - s * s;
    let cs = cs * inv_n - c * s;

    let d = cc * ss - cs * cs;
    if d <= 1e-15 {
        return 0.0;
    }
    (ss * yc * yc + cc * ys * ys - 2.0 * cs * yc * ys) / (yy * d)
}
