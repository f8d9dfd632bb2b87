#![cfg(feature = "dev")]
//! Tests for kernels, robust scale estimates and quadratic interpolation.
//!
//! ## Test Organization
//!
//! 1. **Kernels** - Values, support, symmetry
//! 2. **Scale Estimates** - MAR, MAD, medians, NaN-aware summaries
//! 3. **Quadratic Interpolation** - Exactness, extrapolation, repeated knots, errors

use approx::assert_relative_eq;

use lcdetrend::internals::math::interpolate::{QuadraticInterpolator, merge_repeated_knots};
use lcdetrend::internals::math::kernel::WeightFunction;
use lcdetrend::internals::math::scaling::{
    ScalingMethod, median, median_absolute_deviation, median_cadence, nan_mean, nan_std,
};
use lcdetrend::internals::primitives::errors::DetrendError;

const ALL_KERNELS: [WeightFunction; 5] = [
    WeightFunction::Tricube,
    WeightFunction::Biweight,
    WeightFunction::Epanechnikov,
    WeightFunction::Triangle,
    WeightFunction::Uniform,
];

// ============================================================================
// Kernel Tests
// ============================================================================

/// Test kernel values at the centre and halfway out.
#[test]
fn test_kernel_values() {
    assert_relative_eq!(WeightFunction::Tricube.compute_weight(0.5f64), (1.0f64 - 0.125).powi(3));
    assert_relative_eq!(WeightFunction::Biweight.compute_weight(0.5f64), 0.5625);
    assert_relative_eq!(WeightFunction::Epanechnikov.compute_weight(0.5f64), 0.75);
    assert_relative_eq!(WeightFunction::Triangle.compute_weight(0.5f64), 0.5);
    assert_relative_eq!(WeightFunction::Uniform.compute_weight(0.5f64), 1.0);

    for k in ALL_KERNELS {
        assert_relative_eq!(k.compute_weight(0.0f64), 1.0);
    }
}

/// Test that every kernel is symmetric and vanishes outside [-1, 1].
#[test]
fn test_kernel_support_and_symmetry() {
    for k in ALL_KERNELS {
        for &u in &[0.1f64, 0.3, 0.7, 0.95] {
            assert_relative_eq!(k.compute_weight(u), k.compute_weight(-u));
            assert!(k.compute_weight(u) >= 0.0);
        }
        assert_eq!(k.compute_weight(1.0f64), 0.0, "{} at 1", k.name());
        assert_eq!(k.compute_weight(-1.5f64), 0.0, "{} at -1.5", k.name());
    }
}

/// Test the default kernel.
#[test]
fn test_kernel_default() {
    assert_eq!(WeightFunction::default(), WeightFunction::Tricube);
    assert_eq!(WeightFunction::default().name(), "Tricube");
}

// ============================================================================
// Scale Estimate Tests
// ============================================================================

/// Test MAD on even and odd lengths.
#[test]
fn test_mad_even_and_odd() {
    let mut even = vec![1.0f64, 2.0, 3.0, 4.0];
    assert_relative_eq!(ScalingMethod::MAD.compute(&mut even), 1.0, epsilon = 1e-12);

    let mut odd = vec![1.0f64, 2.0, 3.0];
    assert_relative_eq!(ScalingMethod::MAD.compute(&mut odd), 1.0, epsilon = 1e-12);
}

/// Test MAR ignores the sign of residuals.
#[test]
fn test_mar_absolute_residuals() {
    let mut vals = vec![-3.0f64, 1.0, 2.0];
    assert_relative_eq!(ScalingMethod::MAR.compute(&mut vals), 2.0);
    assert_eq!(ScalingMethod::default(), ScalingMethod::MAR);

    let mut empty: Vec<f64> = Vec::new();
    assert_eq!(ScalingMethod::MAR.compute(&mut empty), 0.0);
}

/// Test median helpers skip non-finite values.
#[test]
fn test_median_helpers() {
    assert_eq!(median(&[3.0, f64::NAN, 1.0, 2.0]), Some(2.0));
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    assert_eq!(median::<f64>(&[f64::NAN]), None);

    assert_relative_eq!(median_absolute_deviation(&[1.0, 2.0, 3.0, 100.0]).unwrap(), 1.0);
}

/// Test the median cadence of a light curve with a gap.
#[test]
fn test_median_cadence() {
    let mut time: Vec<f64> = (0..50).map(|i| i as f64 * 0.02).collect();
    time.push(5.0);
    assert_relative_eq!(median_cadence(&time).unwrap(), 0.02, epsilon = 1e-12);
    assert_eq!(median_cadence(&[1.0]), None);
}

/// Test NaN-aware mean and population standard deviation.
#[test]
fn test_nan_mean_and_std() {
    let data = [2.0, 4.0, f64::NAN, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_relative_eq!(nan_mean(&data).unwrap(), 5.0);
    assert_relative_eq!(nan_std(&data).unwrap(), 2.0);
    assert_eq!(nan_std::<f64>(&[]), None);
}

// ============================================================================
// Quadratic Interpolation Tests
// ============================================================================

/// Test that a parabola is reproduced between and beyond the knots.
#[test]
fn test_quadratic_reproduces_parabola() {
    let x = [0.0, 1.0, 2.5, 4.0, 7.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v - v + 1.0).collect();
    let interp = QuadraticInterpolator::new(&x, &y).unwrap();

    for &q in &[0.5, 1.7, 3.0, 5.5, -1.0, 8.0] {
        assert_relative_eq!(interp.eval(q), 2.0 * q * q - q + 1.0, epsilon = 1e-9);
    }
    assert_eq!(interp.eval(2.5), y[2]);
}

/// Test the two-knot linear fallback.
#[test]
fn test_quadratic_two_knots_linear() {
    let interp = QuadraticInterpolator::new(&[0.0, 2.0], &[1.0, 3.0]).unwrap();
    assert_relative_eq!(interp.eval(1.0), 2.0);
    assert_eq!(interp.eval(0.0), 1.0);
    assert_eq!(interp.eval(2.0), 3.0);
}

/// Test that repeated time stamps collapse to one knot at their mean value.
#[test]
fn test_merge_repeated_knots() {
    let x = [0.0, 1.0, 1.0, 1.0, 2.0, 3.0, 3.0];
    let y = [0.0, 1.0, 2.0, 6.0, 4.0, 5.0, 7.0];
    let (xs, ys) = merge_repeated_knots(&x, &y);

    assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    assert_relative_eq!(ys[1], 3.0);
    assert_relative_eq!(ys[3], 6.0);
    assert_eq!((ys[0], ys[2]), (0.0, 4.0));
    assert!(QuadraticInterpolator::new(&xs, &ys).is_ok());

    let (xs, ys) = merge_repeated_knots(&[0.5, 1.5], &[1.0, 2.0]);
    assert_eq!((xs, ys), (vec![0.5, 1.5], vec![1.0, 2.0]));
}

/// Test knot validation.
#[test]
fn test_quadratic_errors() {
    assert_eq!(
        QuadraticInterpolator::new(&[0.0], &[1.0]).unwrap_err(),
        DetrendError::TooFewPoints { got: 1, min: 2 }
    );
    assert!(matches!(
        QuadraticInterpolator::new(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
        Err(DetrendError::InvalidInput(_))
    ));
    assert!(matches!(
        QuadraticInterpolator::new(&[0.0, 1.0], &[1.0]),
        Err(DetrendError::MismatchedInputs { .. })
    ));
}
