//! High-level API for light-curve detrending.
//!
//! ## Purpose
//!
//! This module is the user-facing entry point for detrending. It offers a
//! fluent builder for the smoother and segmentation parameters and a choice
//! of detrending mode (Segmented or Full).
//!
//! ## Design notes
//!
//! * **Deferred errors**: Setting a parameter twice is recorded and reported
//!   by `.build()`, not by the setter.
//! * **Marker types**: `.adapter(Adapter::Segmented)` turns the generic
//!   builder into the mode's own builder.
//! * **Mode-specific parameters**: `window_points` and `gap_threshold` only
//!   affect the Segmented mode, `fraction` only the Full mode.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`DetrendBuilder`] via `Detrend::new()` (the prelude name).
//! 2. Chain configuration methods (`.window_points()`, `.iterations()`, etc.).
//! 3. Select a mode via `.adapter(Adapter::Segmented)`.
//! 4. Call `.build()?` and then `.detrend(&time, &flux)?`.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::adapters::ParamLog;

// Publicly re-exported types
pub use crate::adapters::full::{FullDetrend, FullDetrendBuilder};
pub use crate::adapters::segmented::{SegmentedDetrend, SegmentedDetrendBuilder};
pub use crate::algorithms::regression::ZeroWeightFallback;
pub use crate::algorithms::robustness::RobustnessMethod;
pub use crate::engine::output::{DetrendResult, SegmentReport, SegmentStatus};
pub use crate::math::kernel::WeightFunction;
pub use crate::math::scaling::ScalingMethod;
pub use crate::primitives::errors::DetrendError;

/// Marker types for selecting a detrending mode.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Full, Segmented};
}

/// Fluent builder for detrending parameters.
#[derive(Debug, Clone)]
pub struct DetrendBuilder<T> {
    /// Samples per smoothing window (Segmented).
    pub window_points: Option<usize>,

    /// Time step that starts a new segment (Segmented).
    pub gap_threshold: Option<T>,

    /// Smoothing fraction (Full).
    pub fraction: Option<T>,

    /// Robustness iterations.
    pub iterations: Option<usize>,

    /// Anchor spacing for interpolation.
    pub delta: Option<T>,

    /// Kernel weight function.
    pub weight_function: Option<WeightFunction>,

    /// Outlier downweighting method.
    pub robustness_method: Option<RobustnessMethod>,

    /// Residual scale estimator.
    pub scaling_method: Option<ScalingMethod>,

    /// Behaviour when every neighbour has zero weight.
    pub zero_weight_fallback: Option<ZeroWeightFallback>,

    /// Tolerance for stopping robustness passes early.
    pub auto_convergence: Option<T>,

    pub(crate) params: ParamLog,
}

impl<T: Float> Default for DetrendBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> DetrendBuilder<T> {
    /// Select a detrending mode.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: DetrendAdapter<T>,
    {
        A::convert(self)
    }

    pub fn new() -> Self {
        Self {
            window_points: None,
            gap_threshold: None,
            fraction: None,
            iterations: None,
            delta: None,
            weight_function: None,
            robustness_method: None,
            scaling_method: None,
            zero_weight_fallback: None,
            auto_convergence: None,
            params: ParamLog::default(),
        }
    }

    /// Samples per smoothing window; segments shorter than this are skipped.
    pub fn window_points(mut self, points: usize) -> Self {
        self.params.record("window_points");
        self.window_points = Some(points);
        self
    }

    /// Time step above which a new segment starts.
    pub fn gap_threshold(mut self, gap: T) -> Self {
        self.params.record("gap_threshold");
        self.gap_threshold = Some(gap);
        self
    }

    pub fn fraction(mut self, fraction: T) -> Self {
        self.params.record("fraction");
        self.fraction = Some(fraction);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.params.record("iterations");
        self.iterations = Some(iterations);
        self
    }

    pub fn delta(mut self, delta: T) -> Self {
        self.params.record("delta");
        self.delta = Some(delta);
        self
    }

    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        self.params.record("weight_function");
        self.weight_function = Some(wf);
        self
    }

    pub fn robustness_method(mut self, rm: RobustnessMethod) -> Self {
        self.params.record("robustness_method");
        self.robustness_method = Some(rm);
        self
    }

    pub fn scaling_method(mut self, sm: ScalingMethod) -> Self {
        self.params.record("scaling_method");
        self.scaling_method = Some(sm);
        self
    }

    pub fn zero_weight_fallback(mut self, policy: ZeroWeightFallback) -> Self {
        self.params.record("zero_weight_fallback");
        self.zero_weight_fallback = Some(policy);
        self
    }

    /// Stop robustness passes once the trend moves less than `tolerance`.
    pub fn auto_converge(mut self, tolerance: T) -> Self {
        self.params.record("auto_converge");
        self.auto_convergence = Some(tolerance);
        self
    }
}

/// Transition from the generic builder to a mode builder.
pub trait DetrendAdapter<T: Float> {
    type Output;

    fn convert(builder: DetrendBuilder<T>) -> Self::Output;
}

/// Marker for gap-aware per-segment detrending.
#[derive(Debug, Clone, Copy)]
pub struct Segmented;

impl<T: Float> DetrendAdapter<T> for Segmented {
    type Output = SegmentedDetrendBuilder<T>;

    fn convert(builder: DetrendBuilder<T>) -> Self::Output {
        let mut result = SegmentedDetrendBuilder::default();

        if let Some(wp) = builder.window_points {
            result.window_points = wp;
        }
        if let Some(gap) = builder.gap_threshold {
            result.gap_threshold = gap;
        }
        if let Some(it) = builder.iterations {
            result.iterations = it;
        }
        if let Some(d) = builder.delta {
            result.delta = d;
        }
        if let Some(wf) = builder.weight_function {
            result.weight_function = wf;
        }
        if let Some(rm) = builder.robustness_method {
            result.robustness_method = rm;
        }
        if let Some(sm) = builder.scaling_method {
            result.scaling_method = sm;
        }
        if let Some(zwf) = builder.zero_weight_fallback {
            result.zero_weight_fallback = zwf;
        }
        result.auto_convergence = builder.auto_convergence;
        result.params = builder.params;

        result
    }
}

/// Marker for a single pass over the whole light curve.
#[derive(Debug, Clone, Copy)]
pub struct Full;

impl<T: Float> DetrendAdapter<T> for Full {
    type Output = FullDetrendBuilder<T>;

    fn convert(builder: DetrendBuilder<T>) -> Self::Output {
        let mut result = FullDetrendBuilder::default();

        if let Some(f) = builder.fraction {
            result.fraction = f;
        }
        if let Some(it) = builder.iterations {
            result.iterations = it;
        }
        if let Some(d) = builder.delta {
            result.delta = d;
        }
        if let Some(wf) = builder.weight_function {
            result.weight_function = wf;
        }
        if let Some(rm) = builder.robustness_method {
            result.robustness_method = rm;
        }
        if let Some(sm) = builder.scaling_method {
            result.scaling_method = sm;
        }
        if let Some(zwf) = builder.zero_weight_fallback {
            result.zero_weight_fallback = zwf;
        }
        result.auto_convergence = builder.auto_convergence;
        result.params = builder.params;

        result
    }
}
