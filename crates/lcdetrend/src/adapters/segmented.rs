//! Segmented (gap-aware) detrending.
//!
//! ## Purpose
//!
//! This module detrends a light curve one observing segment at a time so the
//! trend never bridges a data gap. Each segment is smoothed with a window of
//! `window_points` samples, i.e. a fraction of `window_points / len`.
//!
//! ## Design notes
//!
//! * **Skipping**: Segments shorter than the window are left out entirely
//!   and logged at `warn` level. This includes the final segment.
//! * **Buffers**: One smoother buffer is reused across segments.
//! * **Masking**: [`SegmentedDetrend::detrend_masked`] fits the trend to one
//!   flux series (e.g. with transits interpolated over) and divides another.
//!
//! ## Invariants
//!
//! * Output time is a subsequence of input time, in input order.
//! * Every fraction handed to the smoother lies in (0, 1].
//! * Identical inputs give identical outputs.
//!
//! ## Non-goals
//!
//! * This adapter does not sort or clean the light curve.

// External dependencies
use num_traits::Float;
use tracing::{debug, warn};

// Internal dependencies
use crate::adapters::ParamLog;
use crate::algorithms::regression::{WeightedAccumulate, ZeroWeightFallback};
use crate::algorithms::robustness::RobustnessMethod;
use crate::engine::executor::{LowessConfig, LowessExecutor};
use crate::engine::output::{DetrendResult, SegmentReport, SegmentStatus};
use crate::engine::validator::Validator;
use crate::math::kernel::WeightFunction;
use crate::math::scaling::ScalingMethod;
use crate::primitives::buffer::SmoothBuffer;
use crate::primitives::errors::DetrendError;
use crate::primitives::segment::segment_on_gaps;

/// Default gap, in days, that starts a new segment.
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.1;

/// Default window length in samples.
pub const DEFAULT_WINDOW_POINTS: usize = 30;

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SegmentedDetrend`].
#[derive(Debug, Clone)]
pub struct SegmentedDetrendBuilder<T> {
    /// Samples per smoothing window.
    pub window_points: usize,

    /// Time step above which a new segment starts.
    pub gap_threshold: T,

    /// Robustness iterations.
    pub iterations: usize,

    /// Anchor spacing for interpolation.
    pub delta: T,

    pub weight_function: WeightFunction,
    pub robustness_method: RobustnessMethod,
    pub scaling_method: ScalingMethod,
    pub zero_weight_fallback: ZeroWeightFallback,
    pub auto_convergence: Option<T>,

    pub(crate) params: ParamLog,
}

impl<T: Float> Default for SegmentedDetrendBuilder<T> {
    fn default() -> Self {
        Self {
            window_points: DEFAULT_WINDOW_POINTS,
            gap_threshold: T::from(DEFAULT_GAP_THRESHOLD).unwrap(),
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

impl<T: Float> SegmentedDetrendBuilder<T> {
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
    // Segmented-Specific Setters
    // ========================================================================

    pub fn window_points(mut self, points: usize) -> Self {
        self.params.record("window_points");
        self.window_points = points;
        self
    }

    pub fn gap_threshold(mut self, gap: T) -> Self {
        self.params.record("gap_threshold");
        self.gap_threshold = gap;
        self
    }

    /// Validate the configuration.
    pub fn build(self) -> Result<SegmentedDetrend<T>, DetrendError> {
        Validator::validate_no_duplicates(self.params.duplicate())?;
        Validator::validate_window_points(self.window_points)?;
        Validator::validate_gap_threshold(self.gap_threshold)?;
        Validator::validate_iterations(self.iterations)?;
        Validator::validate_delta(self.delta)?;
        if let Some(tol) = self.auto_convergence {
            Validator::validate_tolerance(tol)?;
        }

        Ok(SegmentedDetrend {
            window_points: self.window_points,
            gap_threshold: self.gap_threshold,
            lowess: LowessConfig {
                fraction: T::one(),
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

// ============================================================================
// Processor
// ============================================================================

/// Validated segmented detrender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentedDetrend<T> {
    window_points: usize,
    gap_threshold: T,
    lowess: LowessConfig<T>,
}

impl<T: WeightedAccumulate> SegmentedDetrend<T> {
    pub fn window_points(&self) -> usize {
        self.window_points
    }

    pub fn gap_threshold(&self) -> T {
        self.gap_threshold
    }

    /// Detrend `flux` against `time`.
    pub fn detrend(&self, time: &[T], flux: &[T]) -> Result<DetrendResult<T>, DetrendError> {
        self.detrend_masked(time, flux, flux)
    }

    /// Fit the trend to `fit_flux` and divide `flux` by it.
    pub fn detrend_masked(&self, time: &[T], flux: &[T], fit_flux: &[T]) -> Result<DetrendResult<T>, DetrendError> {
        Validator::validate_light_curve(time, flux)?;
        Validator::validate_light_curve(time, fit_flux)?;

        let segments = segment_on_gaps(time, self.gap_threshold)?;
        debug!(
            points = time.len(),
            segments = segments.len(),
            window_points = self.window_points,
            "segmented detrend"
        );

        let mut result = DetrendResult::with_capacity(time.len());
        let mut buffer = SmoothBuffer::with_capacity(
            segments.iter().map(|s| s.len()).max().unwrap_or(0),
        );

        for (i, segment) in segments.iter().enumerate() {
            let len = segment.len();
            if len < self.window_points {
                warn!(
                    segment = i,
                    points = len,
                    min_points = self.window_points,
                    "segment shorter than the smoothing window; skipped"
                );
                result.segments.push(SegmentReport::new(
                    *segment,
                    time,
                    SegmentStatus::Skipped {
                        min_points: self.window_points,
                    },
                ));
                continue;
            }

            let fraction = (T::from(self.window_points).unwrap() / T::from(len).unwrap()).min(T::one());
            let range = segment.range();
            let output = LowessExecutor::from_config(self.lowess)
                .fraction(fraction)
                .run(&time[range.clone()], &fit_flux[range.clone()], Some(&mut buffer));

            debug!(segment = i, points = len, fraction = fraction.to_f64(), "segment smoothed");
            result.extend(&time[range.clone()], &flux[range], &output.smoothed);
            result.segments.push(SegmentReport::new(
                *segment,
                time,
                SegmentStatus::Retained {
                    fraction: fraction.to_f64().unwrap_or(f64::NAN),
                },
            ));
        }

        if result.is_empty() {
            return Err(DetrendError::NoSegmentsRetained {
                segments: segments.len(),
                min_points: self.window_points,
            });
        }
        Ok(result)
    }
}
