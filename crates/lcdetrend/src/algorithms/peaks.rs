//! Peak detection in sampled signals.
//!
//! ## Purpose
//!
//! Finds local maxima in periodograms (to rank secondary period candidates)
//! and in light curves (to cut out the crests and troughs of strong stellar
//! variability).
//!
//! ## Key concepts
//!
//! * **Plateau**: A run of equal samples higher than both neighbours; the
//!   peak is placed at its middle (rounding down).
//! * **Distance**: Minimum index separation. Higher peaks win; lower peaks
//!   within `distance` of a kept peak are dropped.
//! * **Prominence**: Height above the higher of the two lowest points reached
//!   before the signal climbs above the peak on either side.
//! * **Width**: Distance between the crossings of the line half a prominence
//!   below the peak, linearly interpolated between samples.
//!
//! ## Invariants
//!
//! * Returned peaks are in ascending index order.
//! * The first and last samples are never peaks.

// External dependencies
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// Filters applied by [`find_peaks`]. `None` disables a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakOptions {
    /// Minimum separation in samples between kept peaks.
    pub distance: Option<usize>,

    /// Minimum width in samples at half prominence.
    pub width: Option<f64>,

    /// Minimum prominence.
    pub prominence: Option<f64>,
}

impl PeakOptions {
    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_prominence(mut self, prominence: f64) -> Self {
        self.prominence = Some(prominence);
        self
    }
}

/// One detected peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Sample index of the peak.
    pub index: usize,

    /// Prominence of the peak.
    pub prominence: f64,

    /// Width at half prominence, in samples.
    pub width: f64,
}

/// Find peaks in `signal` that pass every filter in `options`.
pub fn find_peaks(signal: &[f64], options: &PeakOptions) -> Vec<usize> {
    find_peaks_detailed(signal, options).into_iter().map(|p| p.index).collect()
}

/// Like [`find_peaks`] but also reports prominence and width.
pub fn find_peaks_detailed(signal: &[f64], options: &PeakOptions) -> Vec<Peak> {
    let mut candidates = local_maxima(signal);

    if let Some(distance) = options.distance.filter(|&d| d > 1) {
        candidates = select_by_distance(signal, &candidates, distance);
    }

    let mut peaks = Vec::with_capacity(candidates.len());
    for idx in candidates {
        let (prominence, left_base, right_base) = prominence(signal, idx);
        if options.prominence.is_some_and(|min| prominence < min) {
            continue;
        }

        let width = half_prominence_width(signal, idx, prominence, left_base, right_base);
        if options.width.is_some_and(|min| width < min) {
            continue;
        }

        peaks.push(Peak {
            index: idx,
            prominence,
            width,
        });
    }
    peaks
}

/// Indices of `peaks` ordered by descending signal value (stable on ties).
pub fn rank_peaks(signal: &[f64], peaks: &[usize]) -> Vec<usize> {
    let mut ranked = peaks.to_vec();
    ranked.sort_by(|&a, &b| signal[b].partial_cmp(&signal[a]).unwrap_or(Ordering::Equal));
    ranked
}

// Local maxima, with flat tops resolved to their middle sample.
fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    let i_max = n - 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let right = ahead - 1;
                peaks.push((i + right) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

// Drop lower peaks closer than `distance` to a higher kept one.
fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].partial_cmp(&x[peaks[b]]).unwrap_or(Ordering::Equal));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks.iter().zip(&keep).filter(|&(_, &k)| k).map(|(&p, _)| p).collect()
}

// Prominence and the indices of the left and right bases.
fn prominence(x: &[f64], peak: usize) -> (f64, usize, usize) {
    let height = x[peak];

    let mut left_min = height;
    let mut left_base = peak;
    let mut i = peak;
    loop {
        if x[i] > height {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = height;
    let mut right_base = peak;
    for (j, &v) in x.iter().enumerate().skip(peak) {
        if v > height {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = j;
        }
    }

    (height - left_min.max(right_min), left_base, right_base)
}

fn half_prominence_width(x: &[f64], peak: usize, prominence: f64, left_base: usize, right_base: usize) -> f64 {
    let level = x[peak] - 0.5 * prominence;

    let mut i = peak;
    while left_base < i && level < x[i] {
        i -= 1;
    }
    let mut left = i as f64;
    if x[i] < level {
        left += (level - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < right_base && level < x[i] {
        i += 1;
    }
    let mut right = i as f64;
    if x[i] < level {
        right -= (level - x[i]) / (x[i - 1] - x[i]);
    }

    right - left
}
