//! Execution engine for LOWESS smoothing.
//!
//! ## Purpose
//!
//! This module runs the smoother over one sorted series: an initial
//! kernel-weighted pass, then robustness passes that downweight outliers,
//! optionally stopping early once the trend stops moving. Detrending modes
//! call it once per segment (or once for the whole curve).
//!
//! ## Design notes
//!
//! * **Anchors**: Points are fitted at anchors at least `delta` apart and
//!   linearly interpolated in between; `delta = 0` fits every point.
//! * **Whole-series window**: A fraction of one gives every point a window
//!   spanning the series; fits stay kernel-weighted and robust.
//! * **Buffers**: Working vectors live in a [`SmoothBuffer`] that callers
//!   can reuse across segments.
//!
//! ## Invariants
//!
//! * Input time is non-decreasing and the same length as flux.
//! * Window size is at least 2 and at most n.
//! * Robustness weights stay in [0, 1].
//!
//! ## Non-goals
//!
//! * This module does not validate input (see `validator`).
//! * This module does not split series on gaps (see `adapters`).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::interpolation::{interpolate_gap, next_anchor};
use crate::algorithms::regression::{LocalFit, WeightedAccumulate, ZeroWeightFallback};
use crate::algorithms::robustness::RobustnessMethod;
use crate::math::kernel::WeightFunction;
use crate::math::scaling::ScalingMethod;
use crate::primitives::buffer::SmoothBuffer;
use crate::primitives::window::Window;

// ============================================================================
// Configuration and Output
// ============================================================================

/// Smoother settings shared by every detrending mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowessConfig<T> {
    /// Smoothing fraction in (0, 1].
    pub fraction: T,

    /// Robustness iterations after the initial fit.
    pub iterations: usize,

    /// Anchor spacing for interpolation; zero fits every point.
    pub delta: T,

    pub weight_function: WeightFunction,
    pub zero_weight_fallback: ZeroWeightFallback,
    pub robustness_method: RobustnessMethod,
    pub scaling_method: ScalingMethod,

    /// Stop robustness passes once the trend moves less than this.
    pub auto_convergence: Option<T>,
}

impl<T: Float> Default for LowessConfig<T> {
    fn default() -> Self {
        Self {
            fraction: T::from(2.0 / 3.0).unwrap(),
            iterations: 3,
            delta: T::zero(),
            weight_function: WeightFunction::default(),
            zero_weight_fallback: ZeroWeightFallback::default(),
            robustness_method: RobustnessMethod::default(),
            scaling_method: ScalingMethod::default(),
            auto_convergence: None,
        }
    }
}

/// Result of smoothing one series.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorOutput<T> {
    /// Smoothed flux (the trend).
    pub smoothed: Vec<T>,

    /// Robustness passes run, when auto-convergence was active.
    pub iterations: Option<usize>,

    /// Fraction the smoother actually used.
    pub used_fraction: T,

    /// Final robustness weights.
    pub robustness_weights: Vec<T>,
}

// ============================================================================
// Executor
// ============================================================================

/// Runs the LOWESS iteration loop for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowessExecutor<T> {
    config: LowessConfig<T>,
}

impl<T: Float> Default for LowessExecutor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> LowessExecutor<T> {
    pub fn new() -> Self {
        Self {
            config: LowessConfig::default(),
        }
    }

    pub fn from_config(config: LowessConfig<T>) -> Self {
        Self { config }
    }

    pub fn fraction(mut self, fraction: T) -> Self {
        self.config.fraction = fraction;
        self
    }

    // Adapters configure through `LowessConfig`; the setters below serve
    // direct executor use.

    #[cfg(feature = "dev")]
    pub fn config(&self) -> &LowessConfig<T> {
        &self.config
    }

    #[cfg(feature = "dev")]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    #[cfg(feature = "dev")]
    pub fn delta(mut self, delta: T) -> Self {
        self.config.delta = delta;
        self
    }

    #[cfg(feature = "dev")]
    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        self.config.weight_function = wf;
        self
    }

    #[cfg(feature = "dev")]
    pub fn zero_weight_fallback(mut self, policy: ZeroWeightFallback) -> Self {
        self.config.zero_weight_fallback = policy;
        self
    }

    #[cfg(feature = "dev")]
    pub fn robustness_method(mut self, method: RobustnessMethod) -> Self {
        self.config.robustness_method = method;
        self
    }

    #[cfg(feature = "dev")]
    pub fn scaling_method(mut self, method: ScalingMethod) -> Self {
        self.config.scaling_method = method;
        self
    }

    #[cfg(feature = "dev")]
    pub fn auto_convergence(mut self, tolerance: Option<T>) -> Self {
        self.config.auto_convergence = tolerance;
        self
    }
}

impl<T: WeightedAccumulate> LowessExecutor<T> {
    // ========================================================================
    // Main Entry Point
    // ========================================================================

    /// Smooth `y` against sorted `x`.
    ///
    /// # Special cases
    ///
    /// * **Fewer than two points**: returns `y` unchanged.
    /// * **fraction >= 1**: every window spans the whole series.
    pub fn run(&self, x: &[T], y: &[T], buffer: Option<&mut SmoothBuffer<T>>) -> ExecutorOutput<T> {
        let n = x.len();
        let cfg = &self.config;

        if n < 2 {
            return ExecutorOutput {
                smoothed: y.to_vec(),
                iterations: None,
                used_fraction: cfg.fraction,
                robustness_weights: vec![T::one(); n],
            };
        }

        let window_size = Window::calculate_span(n, cfg.fraction.min(T::one()));

        let mut owned;
        let buffers = match buffer {
            Some(b) => b,
            None => {
                owned = SmoothBuffer::with_capacity(n);
                &mut owned
            }
        };
        let iterations = self.iteration_loop(x, y, window_size, buffers);

        ExecutorOutput {
            smoothed: buffers.y_smooth.clone(),
            iterations: cfg.auto_convergence.map(|_| iterations),
            used_fraction: cfg.fraction,
            robustness_weights: buffers.robustness_weights.clone(),
        }
    }

    // Initial fit plus robustness passes; returns the last pass index.
    fn iteration_loop(&self, x: &[T], y: &[T], window_size: usize, buffers: &mut SmoothBuffer<T>) -> usize {
        let cfg = &self.config;
        let n = x.len();
        buffers.prepare(n, cfg.auto_convergence.is_some());
        buffers.y_smooth.copy_from_slice(y);

        let mut performed = 0;
        for iter in 0..=cfg.iterations {
            performed = iter;

            if cfg.auto_convergence.is_some() {
                buffers.y_prev.copy_from_slice(&buffers.y_smooth);
            }

            let robustness = (iter > 0).then_some(buffers.robustness_weights.as_slice());
            Self::smooth_pass(
                x,
                y,
                window_size,
                cfg.delta,
                robustness,
                &mut buffers.y_smooth,
                &mut buffers.weights,
                cfg.weight_function,
                cfg.zero_weight_fallback,
            );

            if let Some(tol) = cfg.auto_convergence {
                if iter > 0 && max_change(&buffers.y_smooth, &buffers.y_prev) <= tol {
                    break;
                }
            }

            if iter < cfg.iterations {
                for i in 0..n {
                    buffers.residuals[i] = y[i] - buffers.y_smooth[i];
                }
                cfg.robustness_method.apply(
                    &buffers.residuals,
                    &mut buffers.robustness_weights,
                    cfg.scaling_method,
                    &mut buffers.weights,
                );
            }
        }
        performed
    }

    /// One smoothing pass over every point.
    ///
    /// Where a local fit reports nothing, `y_smooth` keeps its previous value.
    #[allow(clippy::too_many_arguments)]
    pub fn smooth_pass(
        x: &[T],
        y: &[T],
        window_size: usize,
        delta: T,
        robustness_weights: Option<&[T]>,
        y_smooth: &mut [T],
        weights: &mut [T],
        weight_function: WeightFunction,
        zero_weight_fallback: ZeroWeightFallback,
    ) {
        let n = x.len();
        let mut window = Window::initialize(0, window_size, n);

        let fit_at = |idx: usize, window: &mut Window, y_smooth: &mut [T], weights: &mut [T]| {
            window.recenter(x, idx, n);
            let mut local = LocalFit {
                x,
                y,
                idx,
                window: *window,
                robustness_weights,
                weights,
                weight_function,
                zero_weight_fallback,
            };
            if let Some(v) = local.fit() {
                y_smooth[idx] = v;
            }
        };

        fit_at(0, &mut window, y_smooth, weights);

        let mut last_fitted = 0usize;
        while last_fitted < n - 1 {
            let current = next_anchor(x, y_smooth, &mut last_fitted, delta);
            if current <= last_fitted {
                break;
            }
            fit_at(current, &mut window, y_smooth, weights);
            interpolate_gap(x, y_smooth, last_fitted, current);
            last_fitted = current;
        }
    }
}

fn max_change<T: Float>(current: &[T], previous: &[T]) -> T {
    current
        .iter()
        .zip(previous)
        .fold(T::zero(), |m, (&a, &b)| m.max((a - b).abs()))
}
