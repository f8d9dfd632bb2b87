//! Input and parameter validation.
//!
//! ## Purpose
//!
//! Every public entry point checks its light curve and configuration here
//! before any work starts, so failures name the offending index or value.
//!
//! ## Design notes
//!
//! * **Fail-fast**: Validation stops at the first violation.
//! * **Ordering**: Cheap length checks run before per-sample scans.
//!
//! ## Non-goals
//!
//! * This module does not sort, clean or repair inputs.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::DetrendError;

/// Validation helpers shared by the detrenders and the pipeline.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Input Validation
    // ========================================================================

    /// Validate a `(time, flux)` pair: non-empty, equal lengths, finite,
    /// non-decreasing time.
    pub fn validate_light_curve<T: Float>(time: &[T], flux: &[T]) -> Result<(), DetrendError> {
        if time.is_empty() || flux.is_empty() {
            return Err(DetrendError::EmptyInput);
        }

        let n = time.len();
        if n != flux.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: n,
                y_len: flux.len(),
            });
        }

        for i in 0..n {
            if !time[i].is_finite() {
                return Err(DetrendError::InvalidNumericValue(format!(
                    "time[{}]={}",
                    i,
                    time[i].to_f64().unwrap_or(f64::NAN)
                )));
            }
            if !flux[i].is_finite() {
                return Err(DetrendError::InvalidNumericValue(format!(
                    "flux[{}]={}",
                    i,
                    flux[i].to_f64().unwrap_or(f64::NAN)
                )));
            }
            if i > 0 && time[i] < time[i - 1] {
                return Err(DetrendError::UnsortedTime { index: i });
            }
        }

        Ok(())
    }

    /// Require at least `min` samples.
    pub fn validate_min_points(n: usize, min: usize) -> Result<(), DetrendError> {
        if n < min {
            return Err(DetrendError::TooFewPoints { got: n, min });
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Smoothing fraction must lie in (0, 1].
    pub fn validate_fraction<T: Float>(fraction: T) -> Result<(), DetrendError> {
        if !fraction.is_finite() || fraction <= T::zero() || fraction > T::one() {
            return Err(DetrendError::InvalidFraction(fraction.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// At most 1000 robustness iterations; zero means a single plain fit.
    pub fn validate_iterations(iterations: usize) -> Result<(), DetrendError> {
        const MAX_ITERATIONS: usize = 1000;
        if iterations > MAX_ITERATIONS {
            return Err(DetrendError::InvalidIterations(iterations));
        }
        Ok(())
    }

    pub fn validate_delta<T: Float>(delta: T) -> Result<(), DetrendError> {
        if !delta.is_finite() || delta < T::zero() {
            return Err(DetrendError::InvalidDelta(delta.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    pub fn validate_tolerance<T: Float>(tol: T) -> Result<(), DetrendError> {
        if !tol.is_finite() || tol <= T::zero() {
            return Err(DetrendError::InvalidTolerance(tol.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    pub fn validate_gap_threshold<T: Float>(gap: T) -> Result<(), DetrendError> {
        if !gap.is_finite() || gap <= T::zero() {
            return Err(DetrendError::InvalidGapThreshold(gap.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// A local line needs at least two points.
    pub fn validate_window_points(points: usize) -> Result<(), DetrendError> {
        if points < 2 {
            return Err(DetrendError::InvalidWindowPoints(points));
        }
        Ok(())
    }

    /// Surface a parameter that was set twice on a builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), DetrendError> {
        if let Some(parameter) = duplicate_param {
            return Err(DetrendError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
