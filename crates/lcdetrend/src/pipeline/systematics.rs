//! Instrumental systematics masks.
//!
//! ## Purpose
//!
//! Spacecraft momentum dumps and pointing excursions leave short, sharp
//! features in the photometry, and some sectors have stretches with
//! scattered light or failed guiding. This module removes samples near known
//! bad times and inside known bad windows before detrending.
//!
//! ## Key concepts
//!
//! * **Bad time**: A timestamp to avoid; samples strictly closer than
//!   `tolerance` are removed.
//! * **Excluded range**: An open interval, possibly unbounded on one side.
//! * **Quaternion outliers**: Bad times can be derived from the spacecraft
//!   attitude quaternions as the samples beyond `n_sigma` standard deviations.

// External dependencies
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::math::scaling::nan_std;
use crate::pipeline::lightcurve::LightCurve;
use crate::primitives::errors::DetrendError;

/// Default half-width, in days, of the window removed around a bad time.
pub const DEFAULT_TOLERANCE: f64 = 0.015;

/// Default outlier threshold for quaternion bad times.
pub const DEFAULT_QUATERNION_SIGMA: f64 = 5.0;

/// Open time interval `lower < t < upper`; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcludedRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ExcludedRange {
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn before(upper: f64) -> Self {
        Self { lower: None, upper: Some(upper) }
    }

    pub fn after(lower: f64) -> Self {
        Self { lower: Some(lower), upper: None }
    }

    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.lower.is_none_or(|l| t > l) && self.upper.is_none_or(|u| t < u)
    }
}

/// Samples to remove before detrending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystematicsMask {
    /// Sorted bad timestamps.
    pub bad_times: Vec<f64>,
    pub tolerance: f64,
    pub excluded_ranges: Vec<ExcludedRange>,
}

impl Default for SystematicsMask {
    fn default() -> Self {
        Self {
            bad_times: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
            excluded_ranges: Vec::new(),
        }
    }
}

impl SystematicsMask {
    pub fn new(mut bad_times: Vec<f64>) -> Self {
        bad_times.retain(|t| t.is_finite());
        bad_times.sort_by(f64::total_cmp);
        Self {
            bad_times,
            ..Self::default()
        }
    }

    /// Mask for a sector, including its known bad windows.
    pub fn for_sector(sector: u32, bad_times: Vec<f64>) -> Self {
        let mut mask = Self::new(bad_times);
        mask.excluded_ranges = sector_ranges(sector);
        mask
    }

    /// Mask for a sector built from its published momentum dumps.
    pub fn from_momentum_dumps(sector: u32) -> Self {
        Self::for_sector(sector, momentum_dumps(sector).to_vec())
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_range(mut self, range: ExcludedRange) -> Self {
        self.excluded_ranges.push(range);
        self
    }

    /// Whether the sample at `t` should be removed.
    pub fn is_bad(&self, t: f64) -> bool {
        if self.excluded_ranges.iter().any(|r| r.contains(t)) {
            return true;
        }
        // bad_times is sorted: only the neighbours of the insertion point matter
        let i = self.bad_times.partition_point(|&b| b < t);
        let near = |j: usize| self.bad_times.get(j).is_some_and(|&b| (t - b).abs() < self.tolerance);
        near(i) || (i > 0 && near(i - 1))
    }

    /// Keep-mask over `time`.
    pub fn keep_mask(&self, time: &[f64]) -> Vec<bool> {
        time.iter().map(|&t| !self.is_bad(t)).collect()
    }

    /// Remove masked samples from a light curve; returns how many went.
    pub fn apply(&self, lc: &mut LightCurve) -> usize {
        let keep = self.keep_mask(&lc.time);
        let removed = keep.iter().filter(|&&k| !k).count();
        lc.retain_mask(&keep);
        debug!(target_id = %lc.target_id, removed, remaining = lc.len(), "systematics mask applied");
        removed
    }

    /// Cleaned copies of `(time, flux, flux_err)`.
    pub fn clean(&self, time: &[f64], flux: &[f64], flux_err: &[f64]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), DetrendError> {
        if time.len() != flux.len() || time.len() != flux_err.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len().min(flux_err.len()),
            });
        }
        let mut out = (Vec::new(), Vec::new(), Vec::new());
        for i in 0..time.len() {
            if !self.is_bad(time[i]) {
                out.0.push(time[i]);
                out.1.push(flux[i]);
                out.2.push(flux_err[i]);
            }
        }
        Ok(out)
    }
}

/// Known bad windows of a sector.
pub fn sector_ranges(sector: u32) -> Vec<ExcludedRange> {
    match sector {
        3 => vec![
            ExcludedRange::before(1385.8966),
            ExcludedRange::after(1406.2925),
            ExcludedRange::between(1395.4800, 1396.6050),
        ],
        4 => vec![ExcludedRange::between(1418.53691, 1421.21168)],
        15 => vec![ExcludedRange::after(1737.3)],
        18 => vec![ExcludedRange::before(1791.5), ExcludedRange::after(1813.48)],
        _ => Vec::new(),
    }
}

/// Published momentum dump times for the first sectors; empty otherwise.
pub fn momentum_dumps(sector: u32) -> &'static [f64] {
    match sector {
        1 => &[1327.84, 1330.34, 1332.84, 1335.34, 1337.84, 1342.18, 1344.68, 1347.18, 1349.68, 1352.18],
        2 => &[1356.63, 1359.13, 1361.63, 1364.13, 1366.63, 1371.12, 1373.62, 1376.12, 1378.62, 1381.12],
        3 => &[
            1387.75, 1390.25, 1392.75, 1395.25, 1395.58, 1396.47, 1396.57, 1398.71, 1400.71, 1402.71, 1404.71, 1406.25,
            1409.56, 1410.71,
        ],
        4 => &[1413.26, 1413.94, 1416.94, 1422.94, 1427.58, 1430.58, 1433.58, 1436.58],
        5 => &[1441.02, 1444.02, 1447.02, 1450.02, 1454.59, 1457.59, 1460.59, 1463.59],
        _ => &[],
    }
}

/// Times where an attitude quaternion strays beyond `n_sigma` standard
/// deviations of zero, rounded to 0.01 d and de-duplicated.
pub fn bad_times_from_quaternions(time: &[f64], quaternion: &[f64], n_sigma: f64) -> Result<Vec<f64>, DetrendError> {
    if time.len() != quaternion.len() {
        return Err(DetrendError::MismatchedInputs {
            x_len: time.len(),
            y_len: quaternion.len(),
        });
    }
    let sd = nan_std(quaternion).ok_or(DetrendError::EmptyInput)?;
    let limit = n_sigma * sd;

    let mut bad: Vec<f64> = time
        .iter()
        .zip(quaternion)
        .filter(|&(_, q)| !(q.abs() < limit))
        .map(|(&t, _)| (t * 100.0).round() / 100.0)
        .filter(|t| t.is_finite())
        .collect();
    bad.sort_by(f64::total_cmp);
    bad.dedup();
    Ok(bad)
}
