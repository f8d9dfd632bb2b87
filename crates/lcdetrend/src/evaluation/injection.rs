//! Synthetic transit injection.
//!
//! Injection-recovery runs multiply a box-shaped dip into a real light curve
//! and check whether the search finds it again. The box is flat-bottomed:
//! every sample within half a duration of a mid-transit time is scaled by
//! `1 - depth`.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::DetrendError;

/// Box transit parameters. Times and durations are in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxTransit {
    pub period: f64,
    /// Mid-time of any one transit.
    pub epoch: f64,
    pub duration: f64,
    /// Fractional depth, e.g. `0.01` for a 1% dip.
    pub depth: f64,
}

impl BoxTransit {
    fn validate(&self) -> Result<(), DetrendError> {
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(DetrendError::InvalidPeriodRange {
                min: self.period,
                max: self.period,
            });
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(DetrendError::InvalidDuration(self.duration));
        }
        if self.duration >= self.period {
            return Err(DetrendError::DurationExceedsPeriod {
                duration: self.duration,
                period: self.period,
            });
        }
        if !(self.depth.is_finite() && (0.0..1.0).contains(&self.depth)) {
            return Err(DetrendError::InvalidInput(format!(
                "transit depth must be in [0, 1), got {}",
                self.depth
            )));
        }
        if !self.epoch.is_finite() {
            return Err(DetrendError::InvalidNumericValue(format!("epoch={}", self.epoch)));
        }
        Ok(())
    }

    /// Whether `t` falls inside a transit.
    #[inline]
    pub fn in_transit(&self, t: f64) -> bool {
        let offset = (t - self.epoch + 0.5 * self.period).rem_euclid(self.period) - 0.5 * self.period;
        offset.abs() < 0.5 * self.duration
    }

    /// Multiplicative model: `1 - depth` in transit, `1` elsewhere.
    pub fn model(&self, time: &[f64]) -> Result<Vec<f64>, DetrendError> {
        self.validate()?;
        Ok(time
            .iter()
            .map(|&t| if self.in_transit(t) { 1.0 - self.depth } else { 1.0 })
            .collect())
    }

    /// Return `flux` with the transit multiplied in.
    pub fn inject(&self, time: &[f64], flux: &[f64]) -> Result<Vec<f64>, DetrendError> {
        if time.len() != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len(),
            });
        }
        let model = self.model(time)?;
        Ok(flux.iter().zip(model).map(|(f, m)| f * m).collect())
    }
}
