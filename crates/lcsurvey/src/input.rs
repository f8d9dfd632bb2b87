//! Input abstractions for light-curve arrays.
//!
//! ## Purpose
//!
//! Survey targets arrive as slices, vectors or `ndarray` columns. This module
//! gives them one view, a contiguous `f64` slice, so they can be turned into
//! a [`LightCurve`] without caring where they came from.
//!
//! ## Invariants
//!
//! * Non-contiguous arrays (e.g. strided views) are rejected, not copied.

// External dependencies
use ndarray::{ArrayBase, Data, Ix1};

// Export dependencies from lcdetrend crate
use lcdetrend::prelude::LightCurve;

// Internal dependencies
use crate::errors::SurveyError;

/// Types that can supply a light-curve column.
pub trait LightCurveInput {
    /// Contiguous view of every element.
    fn as_series_slice(&self) -> Result<&[f64], SurveyError>;
}

impl LightCurveInput for [f64] {
    fn as_series_slice(&self) -> Result<&[f64], SurveyError> {
        Ok(self)
    }
}

impl LightCurveInput for Vec<f64> {
    fn as_series_slice(&self) -> Result<&[f64], SurveyError> {
        Ok(self.as_slice())
    }
}

impl<S> LightCurveInput for ArrayBase<S, Ix1>
where
    S: Data<Elem = f64>,
{
    fn as_series_slice(&self) -> Result<&[f64], SurveyError> {
        self.as_slice()
            .ok_or_else(|| SurveyError::InvalidInput("ndarray input must be contiguous in memory".to_string()))
    }
}

/// Build a light curve from any pair of columns.
pub fn light_curve_from<X, Y>(target_id: &str, sector: u32, time: &X, flux: &Y) -> Result<LightCurve, SurveyError>
where
    X: LightCurveInput + ?Sized,
    Y: LightCurveInput + ?Sized,
{
    let t = time.as_series_slice()?;
    let f = flux.as_series_slice()?;
    Ok(LightCurve::new(target_id, sector, t.to_vec(), f.to_vec())?)
}

/// Like [`light_curve_from`] with a flux-error column.
pub fn light_curve_with_errors<X, Y, E>(
    target_id: &str,
    sector: u32,
    time: &X,
    flux: &Y,
    flux_err: &E,
) -> Result<LightCurve, SurveyError>
where
    X: LightCurveInput + ?Sized,
    Y: LightCurveInput + ?Sized,
    E: LightCurveInput + ?Sized,
{
    let lc = light_curve_from(target_id, sector, time, flux)?;
    Ok(lc.with_flux_err(flux_err.as_series_slice()?.to_vec())?)
}
