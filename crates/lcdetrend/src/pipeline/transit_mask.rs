//! Interpolation over known transits.
//!
//! Before detrending a star with a known planet, in-transit samples are
//! replaced by a quadratic interpolation through the out-of-transit samples,
//! so the trend passes over the dip instead of into it. The observed flux is
//! kept for the relative-flux division.

// External dependencies
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::algorithms::fold::phase_fold;
use crate::engine::validator::Validator;
use crate::math::interpolate::{QuadraticInterpolator, merge_repeated_knots};
use crate::primitives::errors::DetrendError;

/// Ephemeris of a transit to mask. Times in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnownTransit {
    pub period: f64,
    pub epoch: f64,
    pub duration: f64,
}

impl KnownTransit {
    /// In-transit flags: `|phase - 0.5| < duration / period`.
    ///
    /// The window is one full duration on each side of mid-transit.
    pub fn in_transit_mask(&self, time: &[f64]) -> Result<Vec<bool>, DetrendError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(DetrendError::InvalidDuration(self.duration));
        }
        let half_width = self.duration / self.period;
        Ok(phase_fold(time, self.period, self.epoch)?
            .into_iter()
            .map(|p| (p - 0.5).abs() < half_width)
            .collect())
    }

    /// Flux with in-transit samples replaced by interpolated values.
    pub fn fill(&self, time: &[f64], flux: &[f64]) -> Result<Vec<f64>, DetrendError> {
        Validator::validate_light_curve(time, flux)?;
        let in_transit = self.in_transit_mask(time)?;

        let masked = in_transit.iter().filter(|&&m| m).count();
        if masked == 0 {
            return Ok(flux.to_vec());
        }

        let (out_t, out_f): (Vec<f64>, Vec<f64>) = time
            .iter()
            .zip(flux)
            .zip(&in_transit)
            .filter(|&(_, &m)| !m)
            .map(|((&t, &f), _)| (t, f))
            .unzip();
        let (knots_t, knots_f) = merge_repeated_knots(&out_t, &out_f);
        let interp = QuadraticInterpolator::new(&knots_t, &knots_f)?;

        debug!(masked, knots = knots_t.len(), "interpolating over known transits");
        Ok(time
            .iter()
            .zip(flux)
            .zip(&in_transit)
            .map(|((&t, &f), &m)| if m { interp.eval(t) } else { f })
            .collect())
    }
}
