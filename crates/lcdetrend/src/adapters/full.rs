//! Whole-curve detrending.
//!
//! One smoothing pass spans the entire light curve, gaps included, with a
//! fixed fraction. Useful for short single-orbit curves and as a baseline
//! against the segmented mode.

// External dependencies
use num_traits::Float;
use tracing::debug;

// Internal dependencies
use crate::adapters::ParamLog;
use crate::algorithms::regression::{WeightedAccumulate, ZeroWeightFallback};
use crate::algorithms::robustness::RobustnessMethod;
use crate::engine::executor::{LowessConfig, LowessExecutor};
use crate::engine::output::{DetrendResult, SegmentReport, SegmentStatus};
use crate::engine::validator::Validator;
use crate::math::kernel::WeightFunction;
use crate::math::scaling::ScalingMethod;
use crate::primitives::errors::DetrendError;
use crate::primitives::segment::Segment;

/// Default smoothing fraction for the whole-curve mode.
pub const DEFAULT_FULL_FRACTION: f64 = 0.03;

/// Builder for [`FullDetrend`].
#[derive(Debug, Clone)]
pub struct FullDetrendBuilder<T> {
    pub fraction: T,
    pub iterations: usize,
    pub delta: T,
    pub weight_function: WeightFunction,
    pub robustness_method: RobustnessMethod,
    pub scaling_method: ScalingMethod,
    pub zero_weight_fallback: ZeroWeightFallback,
    pub auto_convergence: Option<T>,

    pub(crate) params: ParamLog,
}

impl<T: Float> Default for FullDetrendBuilder<T> {
    fn default() -> Self {
        Self {
            fraction: T::from(DEFAULT_FULL_FRACTION).unwrap(),
            iterations: 3,
            delta: T::zero(),
            weight_function: WeightFunction::default(),
            robustness_method: RobustnessMethod::default(),
            scaling_method: ScalingMethod::default(),
            zero_weight_fallback: ZeroWeightFallback::default(),
            auto_convergence: None,
            params: ParamLog::default(),
        }
    }
}

impl<T: Float> FullDetrendBuilder<T> {
    // ========================================================================
    // Shared Setters
    // ========================================================================

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.params.record("iterations");
        self.iterations = iterations;
        self
    }

    pub fn delta(mut self, delta: T) -> Self {
        self.params.record("delta");
        self.delta = delta;
        self
    }

    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        self.params.record("weight_function");
        self.weight_function = wf;
        self
    }

    pub fn robustness_method(mut self, method: RobustnessMethod) -> Self {
        self.params.record("robustness_method");
        self.robustness_method = method;
        self
    }

    pub fn scaling_method(mut self, method: ScalingMethod) -> Self {
        self.params.record("scaling_method");
        self.scaling_method = method;
        self
    }

    pub fn zero_weight_fallback(mut self, policy: ZeroWeightFallback) -> Self {
        self.params.record("zero_weight_fallback");
        self.zero_weight_fallback = policy;
        self
    }

    pub fn auto_converge(mut self, tolerance: T) -> Self {
        self.params.record("auto_converge");
        self.auto_convergence = Some(tolerance);
        self
    }

    // ========================================================================
    // Full-Specific Setters
    // ========================================================================

    pub fn fraction(mut self, fraction: T) -> Self {
        self.params.record("fraction");
        self.fraction = fraction;
        self
    }

    pub fn build(self) -> Result<FullDetrend<T>, DetrendError> {
        Validator::validate_no_duplicates(self.params.duplicate())?;
        Validator::validate_fraction(self.fraction)?;
        Validator::validate_iterations(self.iterations)?;
        Validator::validate_delta(self.delta)?;
        if let Some(tol) = self.auto_convergence {
            Validator::validate_tolerance(tol)?;
        }

        Ok(FullDetrend {
            lowess: LowessConfig {
                fraction: self.fraction,
                iterations: self.iterations,
                delta: self.delta,
                weight_function: self.weight_function,
                zero_weight_fallback: self.zero_weight_fallback,
                robustness_method: self.robustness_method,
                scaling_method: self.scaling_method,
                auto_convergence: self.auto_convergence,
            },
        })
    }
}

/// Validated whole-curve detrender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullDetrend<T> {
    lowess: LowessConfig<T>,
}

impl<T: WeightedAccumulate> FullDetrend<T> {
    pub fn fraction(&self) -> T {
        self.lowess.fraction
    }

    pub fn detrend(&self, time: &[T], flux: &[T]) -> Result<DetrendResult<T>, DetrendError> {
        self.detrend_masked(time, flux, flux)
    }

    /// Fit the trend to `fit_flux` and divide `flux` by it.
    pub fn detrend_masked(&self, time: &[T], flux: &[T], fit_flux: &[T]) -> Result<DetrendResult<T>, DetrendError> {
        Validator::validate_light_curve(time, flux)?;
        Validator::validate_light_curve(time, fit_flux)?;
        Validator::validate_min_points(time.len(), 2)?;

        debug!(points = time.len(), fraction = self.lowess.fraction.to_f64(), "full detrend");
        let output = LowessExecutor::from_config(self.lowess).run(time, fit_flux, None);

        let mut result = DetrendResult::with_capacity(time.len());
        result.extend(time, flux, &output.smoothed);
        result.segments.push(SegmentReport::new(
            Segment {
                start: 0,
                end: time.len(),
            },
            time,
            SegmentStatus::Retained {
                fraction: self.lowess.fraction.to_f64().unwrap_or(f64::NAN),
            },
        ));
        Ok(result)
    }
}
