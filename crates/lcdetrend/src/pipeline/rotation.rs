//! Rotation period from the Lomb-Scargle periodogram.

// External dependencies
use serde::{Deserialize, Serialize};
use tracing::info;

// Internal dependencies
use crate::algorithms::periodogram::{FrequencyGrid, LombScargle};
use crate::primitives::errors::DetrendError;

/// Strongest periodogram peak of a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationEstimate {
    /// `1 / frequency`, in days.
    pub period: f64,
    pub frequency: f64,
    pub power: f64,
}

/// Estimate the rotation period on `grid`.
pub fn rotation_period(time: &[f64], flux: &[f64], grid: &FrequencyGrid) -> Result<RotationEstimate, DetrendError> {
    let result = LombScargle::new(time, flux)?.power(grid);
    let idx = result
        .peak_index()
        .ok_or_else(|| DetrendError::InvalidFrequencyGrid("empty frequency grid".into()))?;

    let frequency = grid.frequency(idx);
    let estimate = RotationEstimate {
        period: 1.0 / frequency,
        frequency,
        power: result.power[idx],
    };
    info!(period = estimate.period, power = estimate.power, "rotation period");
    Ok(estimate)
}
