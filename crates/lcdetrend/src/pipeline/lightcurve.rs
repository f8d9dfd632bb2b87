//! Light-curve container.
//!
//! A [`LightCurve`] holds one target's photometry as parallel vectors. The
//! search assumes time is sorted; sectors are stitched in observing order
//! with [`LightCurve::append`].

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::engine::validator::Validator;
use crate::math::scaling::median;
use crate::primitives::errors::DetrendError;

/// Photometric time series of one target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    pub target_id: String,

    /// Sector of the first (or only) observation.
    pub sector: u32,

    /// Timestamps in days, non-decreasing.
    pub time: Vec<f64>,

    pub flux: Vec<f64>,

    /// Per-sample flux uncertainty, if known.
    pub flux_err: Option<Vec<f64>>,
}

impl LightCurve {
    pub fn new(target_id: impl Into<String>, sector: u32, time: Vec<f64>, flux: Vec<f64>) -> Result<Self, DetrendError> {
        if time.len() != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: time.len(),
                y_len: flux.len(),
            });
        }
        Ok(Self {
            target_id: target_id.into(),
            sector,
            time,
            flux,
            flux_err: None,
        })
    }

    /// Attach flux uncertainties.
    pub fn with_flux_err(mut self, flux_err: Vec<f64>) -> Result<Self, DetrendError> {
        if flux_err.len() != self.time.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: self.time.len(),
                y_len: flux_err.len(),
            });
        }
        self.flux_err = Some(flux_err);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Drop samples whose time, flux or flux error is NaN or infinite.
    pub fn drop_non_finite(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.len())
            .map(|i| {
                self.time[i].is_finite()
                    && self.flux[i].is_finite()
                    && self.flux_err.as_ref().is_none_or(|e| e[i].is_finite())
            })
            .collect();
        let dropped = keep.iter().filter(|&&k| !k).count();
        if dropped > 0 {
            self.retain_mask(&keep);
        }
        dropped
    }

    /// Divide flux (and its error) by the median flux.
    pub fn normalize(&mut self) -> Result<f64, DetrendError> {
        let m = median(&self.flux).ok_or(DetrendError::EmptyInput)?;
        if m == 0.0 {
            return Err(DetrendError::InvalidNumericValue("median flux is zero".into()));
        }
        self.flux.iter_mut().for_each(|f| *f /= m);
        if let Some(err) = self.flux_err.as_mut() {
            err.iter_mut().for_each(|e| *e /= m);
        }
        Ok(m)
    }

    /// Append a later observation of the same target.
    ///
    /// Flux errors survive only if both curves carry them.
    pub fn append(&mut self, other: LightCurve) -> Result<(), DetrendError> {
        if let (Some(&last), Some(&first)) = (self.time.last(), other.time.first()) {
            if first < last {
                return Err(DetrendError::UnsortedTime { index: self.len() });
            }
        }
        let had_points = !self.is_empty();
        self.flux_err = match (self.flux_err.take(), other.flux_err) {
            (Some(mut a), Some(b)) => {
                a.extend(b);
                Some(a)
            }
            (None, Some(b)) if !had_points => Some(b),
            _ => None,
        };
        self.time.extend(other.time);
        self.flux.extend(other.flux);
        Ok(())
    }

    /// Check the time axis and flux before searching.
    pub fn validate(&self) -> Result<(), DetrendError> {
        Validator::validate_light_curve(&self.time, &self.flux)
    }

    /// Keep only the samples where `keep` is true.
    pub fn retain_mask(&mut self, keep: &[bool]) {
        let mut it = keep.iter();
        self.time.retain(|_| *it.next().unwrap_or(&false));
        let mut it = keep.iter();
        self.flux.retain(|_| *it.next().unwrap_or(&false));
        if let Some(err) = self.flux_err.as_mut() {
            let mut it = keep.iter();
            err.retain(|_| *it.next().unwrap_or(&false));
        }
    }
}
