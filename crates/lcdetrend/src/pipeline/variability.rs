//! Removal of stellar variability crests and troughs.
//!
//! Fast rotators and pulsators leave sharp maxima and minima that a smoother
//! with a fixed window cannot follow. The peak cut finds prominent, wide
//! peaks of the normalised flux and of its negation and drops every sample
//! within a short time of any of them.

// External dependencies
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// Internal dependencies
use crate::algorithms::peaks::{PeakOptions, find_peaks};
use crate::pipeline::lightcurve::LightCurve;

/// Peak-cut settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakCut {
    /// Minimum prominence of a crest or trough in relative flux.
    pub prominence: f64,

    /// Minimum width at half prominence, in samples.
    pub width: f64,

    /// Samples strictly closer than this many days to a peak are removed.
    pub half_window: f64,
}

impl Default for PeakCut {
    fn default() -> Self {
        Self {
            prominence: 0.001,
            width: 15.0,
            half_window: 0.1,
        }
    }
}

/// What the peak cut found and removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakCutReport {
    /// Times of the crests.
    pub peak_times: Vec<f64>,

    /// Times of the troughs.
    pub trough_times: Vec<f64>,

    pub removed: usize,

    /// Half the spread between the first crest and the first trough.
    pub amplitude: Option<f64>,
}

impl PeakCut {
    fn options(&self) -> PeakOptions {
        PeakOptions::default()
            .with_prominence(self.prominence)
            .with_width(self.width)
    }

    /// Keep-mask over the samples of `(time, flux)`.
    pub fn keep_mask(&self, time: &[f64], flux: &[f64]) -> (Vec<bool>, PeakCutReport) {
        let opts = self.options();
        let peaks = find_peaks(flux, &opts);
        let negated: Vec<f64> = flux.iter().map(|f| -f).collect();
        let troughs = find_peaks(&negated, &opts);

        let amplitude = match (peaks.first(), troughs.first()) {
            (Some(&p), Some(&t)) => Some(((flux[p] - 1.0) + (1.0 - flux[t])) / 2.0),
            _ => None,
        };

        let centres: Vec<f64> = peaks.iter().chain(&troughs).map(|&i| time[i]).collect();
        let keep: Vec<bool> = time
            .iter()
            .map(|&t| !centres.iter().any(|&c| (t - c).abs() < self.half_window))
            .collect();

        let report = PeakCutReport {
            peak_times: peaks.iter().map(|&i| time[i]).collect(),
            trough_times: troughs.iter().map(|&i| time[i]).collect(),
            removed: keep.iter().filter(|&&k| !k).count(),
            amplitude,
        };
        (keep, report)
    }

    /// Cut crests and troughs out of a normalised light curve.
    pub fn apply(&self, lc: &mut LightCurve) -> PeakCutReport {
        let (keep, report) = self.keep_mask(&lc.time, &lc.flux);
        lc.retain_mask(&keep);

        debug!(
            peaks = report.peak_times.len(),
            troughs = report.trough_times.len(),
            removed = report.removed,
            "variability peak cut"
        );
        if let Some(a) = report.amplitude {
            info!(target_id = %lc.target_id, amplitude = a, "main variability amplitude");
        }
        report
    }
}
