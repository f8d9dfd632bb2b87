#![cfg(feature = "dev")]
//! Tests for the smoothing executor and input validation.
//!
//! ## Test Organization
//!
//! 1. **Exactness** - Linear data, anchors with delta, global fit
//! 2. **Robustness** - Outlier downweighting and convergence
//! 3. **Buffers** - Reuse across calls
//! 4. **Validation** - Light-curve and parameter checks

use approx::assert_abs_diff_eq;

use lcdetrend::internals::algorithms::robustness::RobustnessMethod;
use lcdetrend::internals::engine::executor::{LowessConfig, LowessExecutor};
use lcdetrend::internals::engine::validator::Validator;
use lcdetrend::internals::math::kernel::WeightFunction;
use lcdetrend::internals::primitives::buffer::SmoothBuffer;
use lcdetrend::internals::primitives::errors::DetrendError;

fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y = x.iter().map(|v| 2.0 * v + 1.0).collect();
    (x, y)
}

// ============================================================================
// Exactness Tests
// ============================================================================

/// Test that a straight line is reproduced by local linear fits.
#[test]
fn test_linear_data_reproduced() {
    let (x, y) = ramp(50);
    let out = LowessExecutor::new().fraction(0.3).iterations(0).run(&x, &y, None);

    assert_eq!(out.smoothed.len(), 50);
    for (s, t) in out.smoothed.iter().zip(&y) {
        assert_abs_diff_eq!(*s, *t, epsilon = 1e-9);
    }
    assert_eq!(out.iterations, None);
    assert_abs_diff_eq!(out.used_fraction, 0.3);
}

/// Test that anchor interpolation with delta stays exact on a line.
#[test]
fn test_delta_interpolation_exact_on_line() {
    let (x, y) = ramp(200);
    let out = LowessExecutor::new().fraction(0.2).delta(5.0).run(&x, &y, None);
    for (s, t) in out.smoothed.iter().zip(&y) {
        assert_abs_diff_eq!(*s, *t, epsilon = 1e-8);
    }
}

/// Test that every kernel reproduces a line.
#[test]
fn test_all_kernels_linear() {
    let (x, y) = ramp(40);
    for wf in [
        WeightFunction::Tricube,
        WeightFunction::Biweight,
        WeightFunction::Epanechnikov,
        WeightFunction::Triangle,
        WeightFunction::Uniform,
    ] {
        let out = LowessExecutor::new()
            .fraction(0.5)
            .iterations(1)
            .weight_function(wf)
            .run(&x, &y, None);
        assert_abs_diff_eq!(out.smoothed[20], y[20], epsilon = 1e-9);
    }
}

/// Test that a fraction of one still fits kernel-weighted local lines.
#[test]
fn test_full_fraction_stays_local() {
    let x: Vec<f64> = (0..41).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| (v - 20.0).powi(2) / 400.0).collect();
    let out = LowessExecutor::new().fraction(1.0).iterations(0).run(&x, &y, None);

    // A single straight line through a symmetric parabola would be flat at
    // its mean (about 0.35); local fits follow the curvature instead.
    assert!(out.smoothed[20] < 0.2, "centre {}", out.smoothed[20]);
    assert!(out.smoothed[0] > 0.6, "edge {}", out.smoothed[0]);
    assert_abs_diff_eq!(out.smoothed[0], out.smoothed[40], epsilon = 1e-9);
}

/// Test that robustness passes still run at a fraction of one.
#[test]
fn test_full_fraction_robust() {
    let x: Vec<f64> = (0..41).map(|i| i as f64).collect();
    let mut y: Vec<f64> = x.iter().map(|v| 0.01 * v).collect();
    y[20] += 1.0;

    let plain = LowessExecutor::new().fraction(1.0).iterations(0).run(&x, &y, None);
    let robust = LowessExecutor::new().fraction(1.0).iterations(3).run(&x, &y, None);

    assert!(plain.smoothed[20] > 0.22);
    assert_abs_diff_eq!(robust.smoothed[20], 0.2, epsilon = 1e-6);
    assert!(robust.robustness_weights[20] < 0.1);
}

/// Test that a single point passes through unchanged.
#[test]
fn test_single_point_passthrough() {
    let out = LowessExecutor::new().run(&[1.0], &[3.5], None);
    assert_eq!(out.smoothed, vec![3.5]);
}

// ============================================================================
// Robustness Tests
// ============================================================================

/// Test that robustness passes stop a spike from pulling the fit.
#[test]
fn test_robustness_resists_spike() {
    let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let mut y: Vec<f64> = x.iter().map(|v| 0.01 * v).collect();
    y[50] += 10.0;

    let plain = LowessExecutor::new().fraction(0.3).iterations(0).run(&x, &y, None);
    let robust = LowessExecutor::new().fraction(0.3).iterations(3).run(&x, &y, None);

    let plain_err = (plain.smoothed[50] - 0.5).abs();
    let robust_err = (robust.smoothed[50] - 0.5).abs();
    assert!(robust_err < 0.05, "robust error {robust_err}");
    assert!(robust_err < plain_err);

    assert!(robust.robustness_weights[50] < 0.1);
    assert!(robust.robustness_weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
}

/// Test that each robustness method downweights the spike.
#[test]
fn test_robustness_methods() {
    let x: Vec<f64> = (0..60).map(|i| i as f64).collect();
    let mut y = vec![1.0; 60];
    for (i, v) in y.iter_mut().enumerate() {
        *v += 0.001 * ((i * 7) % 5) as f64;
    }
    y[30] = 5.0;

    for method in [RobustnessMethod::Bisquare, RobustnessMethod::Huber, RobustnessMethod::Talwar] {
        let out = LowessExecutor::new()
            .fraction(0.5)
            .iterations(2)
            .robustness_method(method)
            .run(&x, &y, None);
        assert!(out.robustness_weights[30] < out.robustness_weights[10], "{method:?}");
    }
}

/// Test that auto-convergence stops once the trend settles.
#[test]
fn test_auto_convergence_stops_early() {
    let (x, y) = ramp(60);
    let out = LowessExecutor::new()
        .fraction(0.3)
        .iterations(10)
        .auto_convergence(Some(1e-6))
        .run(&x, &y, None);
    assert_eq!(out.iterations, Some(1));
}

// ============================================================================
// Buffer Tests
// ============================================================================

/// Test that a reused buffer gives the same answer as a fresh one.
#[test]
fn test_buffer_reuse() {
    let x: Vec<f64> = (0..80).map(|i| i as f64 * 0.02).collect();
    let y: Vec<f64> = x.iter().map(|t| 1.0 + 0.01 * (3.0 * t).sin()).collect();

    let executor = LowessExecutor::from_config(LowessConfig {
        fraction: 0.4,
        ..LowessConfig::default()
    });
    let fresh = executor.run(&x, &y, None);

    let mut buffer = SmoothBuffer::with_capacity(200);
    let (lx, ly) = ramp(150);
    let _ = executor.run(&lx, &ly, Some(&mut buffer));
    let reused = executor.run(&x, &y, Some(&mut buffer));

    assert_eq!(fresh.smoothed, reused.smoothed);
    assert_eq!(executor.config().fraction, 0.4);
}

// ============================================================================
// Validation Tests
// ============================================================================

/// Test light-curve validation.
#[test]
fn test_validate_light_curve() {
    assert!(Validator::validate_light_curve(&[0.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).is_ok());
    assert_eq!(
        Validator::validate_light_curve::<f64>(&[], &[]),
        Err(DetrendError::EmptyInput)
    );
    assert_eq!(
        Validator::validate_light_curve(&[0.0, 1.0], &[1.0]),
        Err(DetrendError::MismatchedInputs { x_len: 2, y_len: 1 })
    );
    assert!(matches!(
        Validator::validate_light_curve(&[0.0, f64::INFINITY], &[1.0, 1.0]),
        Err(DetrendError::InvalidNumericValue(_))
    ));
}

/// Test parameter validation bounds.
#[test]
fn test_validate_parameters() {
    assert!(Validator::validate_fraction(1.0).is_ok());
    assert_eq!(Validator::validate_fraction(0.0), Err(DetrendError::InvalidFraction(0.0)));
    assert!(Validator::validate_iterations(1000).is_ok());
    assert_eq!(Validator::validate_iterations(1001), Err(DetrendError::InvalidIterations(1001)));
    assert!(Validator::validate_delta(0.0).is_ok());
    assert!(Validator::validate_tolerance(0.0).is_err());
    assert!(Validator::validate_gap_threshold(-0.1).is_err());
    assert_eq!(
        Validator::validate_window_points(1),
        Err(DetrendError::InvalidWindowPoints(1))
    );
    assert_eq!(
        Validator::validate_min_points(3, 5),
        Err(DetrendError::TooFewPoints { got: 3, min: 5 })
    );
    assert_eq!(
        Validator::validate_no_duplicates(Some("iterations")),
        Err(DetrendError::DuplicateParameter { parameter: "iterations" })
    );
}
