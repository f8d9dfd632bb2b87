//! Phase folding and block binning.
//!
//! Folding puts the transit at phase 0.5:
//!
//! ```text
//! phase = ((t - epoch - period / 2) mod period) / period
//! ```
//!
//! Binning averages consecutive blocks of samples, spreading any remainder
//! over the leading bins so no sample is dropped.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::math::scaling::{median, nan_mean};
use crate::primitives::errors::DetrendError;
use crate::primitives::sorting::sort_by_key;

/// Phase in [0, 1) of every timestamp, with the transit at 0.5.
pub fn phase_fold(time: &[f64], period: f64, epoch: f64) -> Result<Vec<f64>, DetrendError> {
    if !(period.is_finite() && period > 0.0) {
        return Err(DetrendError::InvalidPeriodRange { min: period, max: period });
    }
    Ok(time
        .iter()
        .map(|&t| (t - epoch - 0.5 * period).rem_euclid(period) / period)
        .collect())
}

/// Summary statistic of a bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinMethod {
    #[default]
    Mean,
    Median,
}

impl BinMethod {
    fn apply(self, values: &[f64]) -> f64 {
        let v = match self {
            Self::Mean => nan_mean(values),
            Self::Median => median(values),
        };
        v.unwrap_or(f64::NAN)
    }
}

/// Bin `(x, y)` in consecutive blocks of about `binsize` samples.
///
/// There are `len / binsize` bins; when the length is not a multiple of the
/// bin size the first `len % n_bins` bins take one extra sample. NaNs are
/// ignored within a bin; an all-NaN bin yields NaN.
pub fn bin_blocks(x: &[f64], y: &[f64], binsize: usize, method: BinMethod) -> Result<(Vec<f64>, Vec<f64>), DetrendError> {
    if binsize == 0 {
        return Err(DetrendError::InvalidBinSize(binsize));
    }
    if x.len() != y.len() {
        return Err(DetrendError::MismatchedInputs {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let n_bins = y.len() / binsize;
    if n_bins == 0 {
        return Err(DetrendError::TooFewPoints {
            got: y.len(),
            min: binsize,
        });
    }

    let base = y.len() / n_bins;
    let extra = y.len() % n_bins;

    let mut bx = Vec::with_capacity(n_bins);
    let mut by = Vec::with_capacity(n_bins);
    let mut start = 0;
    for b in 0..n_bins {
        let end = start + base + usize::from(b < extra);
        bx.push(method.apply(&x[start..end]));
        by.push(method.apply(&y[start..end]));
        start = end;
    }
    Ok((bx, by))
}

/// A light curve folded on one period and sorted by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldedCurve {
    pub period: f64,
    pub epoch: f64,
    pub phase: Vec<f64>,
    pub flux: Vec<f64>,
}

impl FoldedCurve {
    pub fn new(time: &[f64], flux: &[f64], period: f64, epoch: f64) -> Result<Self, DetrendError> {
        if time.len() != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len(),
            });
        }
        let phase = phase_fold(time, period, epoch)?;
        let sorted = sort_by_key(&phase, flux);
        Ok(Self {
            period,
            epoch,
            phase: sorted.keys,
            flux: sorted.values,
        })
    }

    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }

    /// Binned copy of the folded curve.
    pub fn binned(&self, binsize: usize, method: BinMethod) -> Result<(Vec<f64>, Vec<f64>), DetrendError> {
        bin_blocks(&self.phase, &self.flux, binsize, method)
    }
}
