//! Box Least Squares transit search.
//!
//! ## Purpose
//!
//! This module searches a detrended light curve for periodic box-shaped dips.
//! For every trial period the data are phase-folded into fine bins, and every
//! trial duration and phase offset is scored by the log-likelihood gain of a
//! box model over a constant one.
//!
//! ## Design notes
//!
//! * **Binning**: Phase bins are `min(duration) / oversample` wide; in- and
//!   out-of-transit sums come from prefix sums over the folded bins, wrapping
//!   around phase zero.
//! * **Objective**: `½ · depth² · ivar_in · ivar_out / (ivar_in + ivar_out)`
//!   on inverse-variance weighted, mean-subtracted flux. Only dips (positive
//!   depth) are scored.
//! * **Uncertainties**: Without flux errors every sample has unit weight.
//!
//! ## Invariants
//!
//! * Every trial duration is shorter than every trial period.
//! * Result arrays have one entry per trial period, in the order given.
//! * Transit times lie in `[t_min, t_min + period)`.
//!
//! ## Non-goals
//!
//! * This module does not fit limb-darkened transit shapes.
//! * This module does not assess false-alarm probability.

// External dependencies
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::primitives::errors::DetrendError;

// ============================================================================
// Configuration
// ============================================================================

/// Search grid settings for [`BoxLeastSquares::autopower`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlsConfig {
    /// Trial transit durations in days.
    pub durations: Vec<f64>,

    /// Minimum number of transits the longest trial period must allow.
    pub minimum_n_transit: usize,

    /// Multiplier on the frequency spacing; larger is coarser.
    pub frequency_factor: f64,

    /// Phase bins per shortest duration.
    pub oversample: usize,
}

impl Default for BlsConfig {
    fn default() -> Self {
        Self {
            durations: linspace(0.05, 1.0, 22),
            minimum_n_transit: 3,
            frequency_factor: 1.0,
            oversample: 10,
        }
    }
}

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Periodogram produced by [`BoxLeastSquares::power`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlsResult {
    pub period: Vec<f64>,
    /// Log-likelihood gain of the best box at each period.
    pub power: Vec<f64>,
    pub depth: Vec<f64>,
    pub depth_err: Vec<f64>,
    pub duration: Vec<f64>,
    /// Mid-transit time of the best box at each period.
    pub transit_time: Vec<f64>,
    pub depth_snr: Vec<f64>,
    pub log_likelihood: Vec<f64>,
}

/// The single best box of a periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlsPeak {
    pub index: usize,
    pub period: f64,
    pub power: f64,
    pub duration: f64,
    pub transit_time: f64,
    pub depth: f64,
}

impl BlsResult {
    pub fn len(&self) -> usize {
        self.period.len()
    }

    pub fn is_empty(&self) -> bool {
        self.period.is_empty()
    }

    /// Index of the highest power (first one on ties).
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &p) in self.power.iter().enumerate() {
            if best.is_none_or(|b| p > self.power[b]) {
                best = Some(i);
            }
        }
        best
    }

    /// Summary of the trial at `index`.
    pub fn peak_at(&self, index: usize) -> Option<BlsPeak> {
        (index < self.len()).then(|| BlsPeak {
            index,
            period: self.period[index],
            power: self.power[index],
            duration: self.duration[index],
            transit_time: self.transit_time[index],
            depth: self.depth[index],
        })
    }

    pub fn best(&self) -> Option<BlsPeak> {
        self.best_index().and_then(|i| self.peak_at(i))
    }

    /// Highest power over the grid.
    pub fn max_power(&self) -> f64 {
        self.power.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Depth estimate with its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    pub value: f64,
    pub error: f64,
}

/// Diagnostics for one candidate, as returned by [`BoxLeastSquares::compute_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlsStats {
    pub period: f64,
    pub duration: f64,
    pub transit_time: f64,
    /// Depth over all transits.
    pub depth: Depth,
    /// Depth over odd-numbered transits only.
    pub depth_odd: Depth,
    /// Depth over even-numbered transits only.
    pub depth_even: Depth,
    /// Depth of a box at half the period.
    pub depth_half: Depth,
    /// Depth of a box shifted by half a period (secondary eclipse check).
    pub depth_phased: Depth,
    /// Mid-transit times that fall inside the observing baseline.
    pub transit_times: Vec<f64>,
    /// Samples inside each transit.
    pub per_transit_count: Vec<usize>,
    /// Log-likelihood gain contributed by each transit.
    pub per_transit_log_likelihood: Vec<f64>,
}

// ============================================================================
// Model
// ============================================================================

/// Box Least Squares model over one light curve.
#[derive(Debug, Clone)]
pub struct BoxLeastSquares<'a> {
    time: &'a [f64],
    flux: &'a [f64],
    ivar: Vec<f64>,
    t_ref: f64,
    baseline: f64,
}

impl<'a> BoxLeastSquares<'a> {
    /// Validate inputs and prepare inverse-variance weights.
    pub fn new(time: &'a [f64], flux: &'a [f64], flux_err: Option<&[f64]>) -> Result<Self, DetrendError> {
        if time.is_empty() {
            return Err(DetrendError::EmptyInput);
        }
        if time.len() != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len(),
            });
        }
        if let Some(i) = time.iter().zip(flux).position(|(t, f)| !t.is_finite() || !f.is_finite()) {
            return Err(DetrendError::InvalidNumericValue(format!(
                "time[{i}]={}, flux[{i}]={}",
                time[i], flux[i]
            )));
        }

        let ivar = match flux_err {
            Some(err) => {
                if err.len() != time.len() {
                    return Err(DetrendError::MismatchedInputs {
                        x_len: time.len(),
                        y_len: err.len(),
                    });
                }
                if let Some(i) = err.iter().position(|e| !e.is_finite() || *e <= 0.0) {
                    return Err(DetrendError::InvalidNumericValue(format!(
                        "flux_err[{i}]={} (must be positive and finite)",
                        err[i]
                    )));
                }
                err.iter().map(|e| 1.0 / (e * e)).collect()
            }
            None => vec![1.0; time.len()],
        };

        let t_min = time.iter().copied().fold(f64::INFINITY, f64::min);
        let t_max = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            time,
            flux,
            ivar,
            t_ref: t_min,
            baseline: t_max - t_min,
        })
    }

    /// Time between the first and last sample.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Trial periods for the given durations, ascending.
    pub fn autoperiod(
        &self,
        durations: &[f64],
        minimum_n_transit: usize,
        frequency_factor: f64,
    ) -> Result<Vec<f64>, DetrendError> {
        let (min_dur, max_dur) = duration_bounds(durations)?;

        if minimum_n_transit <= 1 {
            return Err(DetrendError::InvalidInput(format!(
                "minimum_n_transit must be greater than 1, got {minimum_n_transit}"
            )));
        }
        if !(frequency_factor.is_finite() && frequency_factor > 0.0) {
            return Err(DetrendError::InvalidFrequencyGrid(format!(
                "frequency_factor must be positive, got {frequency_factor}"
            )));
        }
        if self.baseline <= 0.0 {
            return Err(DetrendError::InvalidInput(
                "time baseline must be positive".to_string(),
            ));
        }

        let min_period = 2.0 * max_dur;
        let max_period = self.baseline / (minimum_n_transit - 1) as f64;
        if max_period < min_period {
            return Err(DetrendError::InvalidPeriodRange {
                min: min_period,
                max: max_period,
            });
        }

        let df = frequency_factor * min_dur / (self.baseline * self.baseline);
        let f_min = 1.0 / max_period;
        let f_max = 1.0 / min_period;
        let nf = 1 + ((f_max - f_min) / df).round() as usize;

        Ok((0..nf).map(|k| 1.0 / (f_max - df * k as f64)).collect())
    }

    /// Automatic period grid followed by [`Self::power`].
    pub fn autopower(&self, config: &BlsConfig) -> Result<BlsResult, DetrendError> {
        let periods = self.autoperiod(&config.durations, config.minimum_n_transit, config.frequency_factor)?;
        self.power_with(&periods, &config.durations, config.oversample)
    }

    /// Evaluate the periodogram at `periods` with the default oversampling.
    pub fn power(&self, periods: &[f64], durations: &[f64]) -> Result<BlsResult, DetrendError> {
        self.power_with(periods, durations, BlsConfig::default().oversample)
    }

    /// Evaluate the periodogram at `periods` with `oversample` bins per shortest duration.
    pub fn power_with(&self, periods: &[f64], durations: &[f64], oversample: usize) -> Result<BlsResult, DetrendError> {
        let (min_dur, max_dur) = duration_bounds(durations)?;

        if periods.is_empty() {
            return Err(DetrendError::InvalidInput("no trial periods".to_string()));
        }
        if let Some(&p) = periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(DetrendError::InvalidPeriodRange { min: p, max: p });
        }
        let min_period = periods.iter().copied().fold(f64::INFINITY, f64::min);
        if max_dur >= min_period {
            return Err(DetrendError::DurationExceedsPeriod {
                duration: max_dur,
                period: min_period,
            });
        }
        if oversample == 0 {
            return Err(DetrendError::InvalidInput("oversample must be at least 1".to_string()));
        }

        let bin_duration = min_dur / oversample as f64;
        let dur_bins: Vec<usize> = durations
            .iter()
            .map(|d| ((d / bin_duration).round() as usize).max(1))
            .collect();
        let max_dur_bins = dur_bins.iter().copied().max().unwrap_or(1);

        debug!(
            periods = periods.len(),
            durations = durations.len(),
            bin_duration,
            "BLS grid"
        );

        let y = self.centered_flux();
        let sum_ivar: f64 = self.ivar.iter().sum();
        let sum_y: f64 = y.iter().zip(&self.ivar).map(|(y, w)| y * w).sum();

        let mut result = BlsResult {
            period: periods.to_vec(),
            ..BlsResult::default()
        };
        let mut bin_y = Vec::new();
        let mut bin_ivar = Vec::new();

        for &period in periods {
            let n_bins = (period / bin_duration).ceil() as usize;
            let total = n_bins + max_dur_bins + 1;

            bin_y.clear();
            bin_y.resize(total, 0.0);
            bin_ivar.clear();
            bin_ivar.resize(total, 0.0);

            for ((&t, &yi), &wi) in self.time.iter().zip(&y).zip(&self.ivar) {
                let phase = (t - self.t_ref).rem_euclid(period);
                let ind = ((phase / bin_duration) as usize).min(n_bins - 1) + 1;
                bin_y[ind] += yi * wi;
                bin_ivar[ind] += wi;
            }

            // Wrap the first bins past the end, then turn into prefix sums
            for i in 0..max_dur_bins {
                bin_y[n_bins + 1 + i] = bin_y[i + 1];
                bin_ivar[n_bins + 1 + i] = bin_ivar[i + 1];
            }
            for i in 1..total {
                bin_y[i] += bin_y[i - 1];
                bin_ivar[i] += bin_ivar[i - 1];
            }

            let mut best = BoxScore::empty();
            for (k, &db) in dur_bins.iter().enumerate() {
                for n in 0..n_bins {
                    let ivar_in = bin_ivar[n + db] - bin_ivar[n];
                    let ivar_out = sum_ivar - ivar_in;
                    if ivar_in <= f64::EPSILON || ivar_out <= f64::EPSILON {
                        continue;
                    }
                    let y_in_sum = bin_y[n + db] - bin_y[n];
                    let y_in = y_in_sum / ivar_in;
                    let y_out = (sum_y - y_in_sum) / ivar_out;
                    let depth = y_out - y_in;
                    if depth <= 0.0 {
                        continue;
                    }

                    let log_like = 0.5 * depth * depth * ivar_in * ivar_out / (ivar_in + ivar_out);
                    if log_like > best.log_like {
                        best = BoxScore {
                            log_like,
                            depth,
                            ivar_in,
                            ivar_out,
                            duration: durations[k],
                            phase: n as f64 * bin_duration,
                        };
                    }
                }
            }

            let (depth_err, transit_time) = if best.log_like.is_finite() {
                let mid = self.t_ref + (best.phase + 0.5 * best.duration).rem_euclid(period);
                ((1.0 / best.ivar_in + 1.0 / best.ivar_out).sqrt(), mid)
            } else {
                (f64::INFINITY, self.t_ref)
            };
            let power = best.log_like.max(0.0);

            result.power.push(power);
            result.log_likelihood.push(power);
            result.depth.push(best.depth);
            result.depth_err.push(depth_err);
            result.duration.push(best.duration);
            result.transit_time.push(transit_time);
            result.depth_snr.push(if depth_err.is_finite() { best.depth / depth_err } else { 0.0 });
        }

        Ok(result)
    }

    /// Detailed statistics for one candidate.
    pub fn compute_stats(&self, period: f64, duration: f64, transit_time: f64) -> Result<BlsStats, DetrendError> {
        if !(period.is_finite() && period > 0.0) {
            return Err(DetrendError::InvalidPeriodRange { min: period, max: period });
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(DetrendError::InvalidDuration(duration));
        }
        if duration >= period {
            return Err(DetrendError::DurationExceedsPeriod { duration, period });
        }

        let y = self.centered_flux();
        let in_transit = |t: f64, p: f64, t0: f64| ((t - t0 + 0.5 * p).rem_euclid(p) - 0.5 * p).abs() < 0.5 * duration;
        let transit_number = |t: f64| ((t - transit_time) / period).round() as i64;

        let main: Vec<bool> = self.time.iter().map(|&t| in_transit(t, period, transit_time)).collect();
        let odd: Vec<bool> = self
            .time
            .iter()
            .zip(&main)
            .map(|(&t, &m)| m && transit_number(t).rem_euclid(2) == 1)
            .collect();
        let even: Vec<bool> = main.iter().zip(&odd).map(|(&m, &o)| m && !o).collect();
        let half: Vec<bool> = self
            .time
            .iter()
            .map(|&t| in_transit(t, 0.5 * period, transit_time))
            .collect();
        let phased: Vec<bool> = self
            .time
            .iter()
            .map(|&t| in_transit(t, period, transit_time + 0.5 * period))
            .collect();

        let depth = self.depth_of(&y, &main, &main);
        let depth_odd = self.depth_of(&y, &odd, &main);
        let depth_even = self.depth_of(&y, &even, &main);
        let depth_half = self.depth_of(&y, &half, &half);
        let depth_phased = self.depth_of(&y, &phased, &phased);

        // Transits whose centre lies inside the baseline
        let t_max = self.t_ref + self.baseline;
        let k_min = ((self.t_ref - transit_time) / period).ceil() as i64;
        let k_max = ((t_max - transit_time) / period).floor() as i64;
        let transit_times: Vec<f64> = (k_min..=k_max).map(|k| transit_time + k as f64 * period).collect();

        let (y_out, _) = weighted_mean(&y, &self.ivar, |i| !main[i]);
        let y_in_model = y_out - depth.value;

        let mut per_transit_count = vec![0usize; transit_times.len()];
        let mut per_transit_log_likelihood = vec![0.0; transit_times.len()];
        for i in 0..self.time.len() {
            if !main[i] {
                continue;
            }
            let k = transit_number(self.time[i]) - k_min;
            if k < 0 || k as usize >= transit_times.len() {
                continue;
            }
            let k = k as usize;
            per_transit_count[k] += 1;
            let r_out = y[i] - y_out;
            let r_in = y[i] - y_in_model;
            per_transit_log_likelihood[k] += 0.5 * self.ivar[i] * (r_out * r_out - r_in * r_in);
        }

        Ok(BlsStats {
            period,
            duration,
            transit_time,
            depth,
            depth_odd,
            depth_even,
            depth_half,
            depth_phased,
            transit_times,
            per_transit_count,
            per_transit_log_likelihood,
        })
    }

    fn centered_flux(&self) -> Vec<f64> {
        let (mean, _) = weighted_mean(self.flux, &self.ivar, |_| true);
        self.flux.iter().map(|f| f - mean).collect()
    }

    // Depth of the `inside` samples against everything outside `exclude`.
    fn depth_of(&self, y: &[f64], inside: &[bool], exclude: &[bool]) -> Depth {
        let (y_in, ivar_in) = weighted_mean(y, &self.ivar, |i| inside[i]);
        let (y_out, ivar_out) = weighted_mean(y, &self.ivar, |i| !exclude[i]);
        if ivar_in <= 0.0 || ivar_out <= 0.0 {
            return Depth {
                value: 0.0,
                error: f64::INFINITY,
            };
        }
        Depth {
            value: y_out - y_in,
            error: (1.0 / ivar_in + 1.0 / ivar_out).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxScore {
    log_like: f64,
    depth: f64,
    ivar_in: f64,
    ivar_out: f64,
    duration: f64,
    phase: f64,
}

impl BoxScore {
    fn empty() -> Self {
        Self {
            log_like: f64::NEG_INFINITY,
            depth: 0.0,
            ivar_in: 0.0,
            ivar_out: 0.0,
            duration: 0.0,
            phase: 0.0,
        }
    }
}

fn duration_bounds(durations: &[f64]) -> Result<(f64, f64), DetrendError> {
    if durations.is_empty() {
        return Err(DetrendError::InvalidInput("no trial durations".to_string()));
    }
    if let Some(&d) = durations.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(DetrendError::InvalidDuration(d));
    }
    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok((min, max))
}

// Inverse-variance weighted mean of the selected samples and its total weight.
fn weighted_mean(y: &[f64], ivar: &[f64], select: impl Fn(usize) -> bool) -> (f64, f64) {
    let (mut sum, mut w) = (0.0, 0.0);
    for i in 0..y.len() {
        if select(i) {
            sum += y[i] * ivar[i];
            w += ivar[i];
        }
    }
    if w > 0.0 { (sum / w, w) } else { (0.0, 0.0) }
}
