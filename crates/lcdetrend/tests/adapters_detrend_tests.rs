//! Tests for the Segmented and Full detrending modes.
//!
//! ## Test Organization
//!
//! 1. **Trend Quality** - Flat and slowly varying light curves
//! 2. **Segmentation** - Gap splitting and skipped segments
//! 3. **Invariants** - Determinism, fractions, output ordering
//! 4. **Masked Fits** - Trend fitted to one series, dividing another
//! 5. **Full Mode** - Whole-curve smoothing
//! 6. **Errors** - Builder and input validation

use approx::assert_abs_diff_eq;
use lcdetrend::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

const CADENCE: f64 = 0.02;

/// Evenly sampled stretches separated by `gap` days.
fn stitched_time(lengths: &[usize], gap: f64) -> Vec<f64> {
    let mut time = Vec::new();
    let mut t = 1325.0;
    for (k, &len) in lengths.iter().enumerate() {
        if k > 0 {
            t += gap;
        }
        for _ in 0..len {
            time.push(t);
            t += CADENCE;
        }
    }
    time
}

fn noisy(base: &[f64], sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sigma).unwrap();
    base.iter().map(|b| b + noise.sample(&mut rng)).collect()
}

// ============================================================================
// Trend Quality Tests
// ============================================================================

/// Flat flux with white noise detrends to a relative flux centred on one.
#[test]
fn test_flat_noise_residual_mean_near_one() {
    let time = stitched_time(&[500, 500], 1.0);
    let flux = noisy(&vec![1.0; time.len()], 1e-3, 7);

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.len(), time.len());
    let mean = result.residual.iter().sum::<f64>() / result.len() as f64;
    assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-4);

    let diag = result.diagnostics().unwrap();
    assert_eq!(diag.n, time.len());
    assert!(diag.std_dev < 1.5e-3, "scatter should stay near the noise level");
}

/// A slow sinusoid is absorbed by the trend.
#[test]
fn test_slow_sinusoid_tracked() {
    let time = stitched_time(&[600, 600], 0.8);
    let truth: Vec<f64> = time
        .iter()
        .map(|t| 1.0 + 0.01 * (2.0 * std::f64::consts::PI * t / 5.0).sin())
        .collect();
    let flux = noisy(&truth, 5e-4, 11);

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    for (trend, expected) in result.trend.iter().zip(&truth) {
        assert_abs_diff_eq!(*trend, *expected, epsilon = 2e-3);
    }
    let amplitude = result.residual.iter().fold(0.0_f64, |m, r| m.max((r - 1.0).abs()));
    assert!(amplitude < 4e-3, "sinusoid should be removed, max deviation {amplitude}");
}

/// Isolated outliers do not drag the trend.
#[test]
fn test_outliers_do_not_pull_trend() {
    let time = stitched_time(&[300], 1.0);
    let mut flux = noisy(&vec![1.0; time.len()], 2e-4, 3);
    for &i in &[50, 120, 121, 250] {
        flux[i] += 0.05;
    }

    let result = Detrend::new()
        .window_points(30)
        .robustness_method(Bisquare)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    for &i in &[50, 120, 121, 250] {
        assert_abs_diff_eq!(result.trend[i], 1.0, epsilon = 2e-3);
        assert!(result.residual[i] > 1.04);
    }
}

// ============================================================================
// Segmentation Tests
// ============================================================================

/// One artificial gap yields exactly two segments, split at the gap.
#[test]
fn test_single_gap_two_segments() {
    let time = stitched_time(&[200, 150], 0.5);
    let flux = vec![1.0; time.len()];

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.segments.len(), 2);
    assert_eq!(result.segments[0].start, 0);
    assert_eq!(result.segments[0].end, 200);
    assert_eq!(result.segments[1].start, 200);
    assert_eq!(result.segments[1].end, 350);
    assert_eq!(result.retained_segments(), 2);
    assert_eq!(result.time, time);
}

/// A gap equal to the threshold does not split.
#[test]
fn test_gap_at_threshold_does_not_split() {
    let time = vec![0.0, 0.25, 0.5, 0.75, 1.0];
    let flux = vec![1.0; 5];

    let result = Detrend::new()
        .window_points(2)
        .gap_threshold(0.25)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.segments.len(), 1);
}

/// A segment shorter than the window contributes nothing.
#[test]
fn test_short_middle_segment_skipped() {
    let time = stitched_time(&[100, 10, 100], 0.5);
    let flux = vec![1.0; time.len()];

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.len(), 200);
    assert_eq!(result.retained_segments(), 2);
    assert_eq!(result.skipped_segments(), 1);
    assert_eq!(result.segments[1].status, SegmentStatus::Skipped { min_points: 30 });
    assert!(!result.time.iter().any(|t| time[100..110].contains(t)));
}

/// The last segment obeys the same minimum as every other.
#[test]
fn test_short_final_segment_skipped() {
    let time = stitched_time(&[100, 12], 0.5);
    let flux = vec![1.0; time.len()];

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.len(), 100);
    assert!(!result.segments[1].is_retained());
    assert_eq!(result.time.last(), time.get(99));
}

/// Every segment too short is an error, not an empty result.
#[test]
fn test_all_segments_short() {
    let time = stitched_time(&[10, 12, 8], 0.5);
    let flux = vec![1.0; time.len()];

    let err = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap_err();

    assert_eq!(
        err,
        DetrendError::NoSegmentsRetained {
            segments: 3,
            min_points: 30
        }
    );
}

// ============================================================================
// Invariant Tests
// ============================================================================

/// Identical inputs give identical outputs.
#[test]
fn test_deterministic() {
    let time = stitched_time(&[250, 40, 300], 0.3);
    let flux = noisy(&vec![1.0; time.len()], 1e-3, 99);
    let detrender = Detrend::new().window_points(30).adapter(Segmented).build().unwrap();

    let a = detrender.detrend(&time, &flux).unwrap();
    let b = detrender.detrend(&time, &flux).unwrap();
    assert_eq!(a, b);
}

/// Fractions are `window_points / len`, never above one.
#[test]
fn test_fractions_in_unit_interval() {
    let time = stitched_time(&[30, 60, 300], 0.5);
    let flux = noisy(&vec![1.0; time.len()], 1e-3, 5);

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    let fractions: Vec<f64> = result
        .segments
        .iter()
        .filter_map(|s| match s.status {
            SegmentStatus::Retained { fraction } => Some(fraction),
            SegmentStatus::Skipped { .. } => None,
        })
        .collect();
    assert_eq!(fractions.len(), 3);
    assert_abs_diff_eq!(fractions[0], 1.0);
    assert_abs_diff_eq!(fractions[1], 0.5);
    assert_abs_diff_eq!(fractions[2], 0.1);
    assert!(fractions.iter().all(|&f| f > 0.0 && f <= 1.0));
}

/// A segment exactly one window long is smoothed as well as a longer one.
#[test]
fn test_window_length_segment_follows_curvature() {
    let lengths = [30, 31];
    let time = stitched_time(&lengths, 0.5);
    let flux: Vec<f64> = lengths
        .iter()
        .flat_map(|&len| (0..len).map(move |i| 1.0 + 0.05 * (std::f64::consts::PI * i as f64 / (len - 1) as f64).sin()))
        .collect();

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();
    assert_eq!(result.len(), 61);

    let max_dev = |r: &[f64]| r.iter().fold(0.0_f64, |m, v| m.max((v - 1.0).abs()));
    let exact = max_dev(&result.residual[..30]);
    let longer = max_dev(&result.residual[30..]);

    assert!(exact < 0.02, "window-length segment deviation {exact}");
    assert!(longer < 0.02, "longer segment deviation {longer}");
    assert!(exact < 1.5 * longer, "{exact} vs {longer}");
    assert!(result.trend[0] < 1.02, "edge trend {}", result.trend[0]);
}

/// Output columns line up and residual is flux over trend.
#[test]
fn test_output_columns_consistent() {
    let time = stitched_time(&[120, 5, 90], 0.4);
    let flux = noisy(&vec![1.0; time.len()], 1e-3, 21);

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(result.flux.len(), result.len());
    assert_eq!(result.trend.len(), result.len());
    assert_eq!(result.residual.len(), result.len());
    assert!(result.time.windows(2).all(|w| w[0] <= w[1]));
    for i in 0..result.len() {
        assert_abs_diff_eq!(result.residual[i], result.flux[i] / result.trend[i], epsilon = 1e-15);
    }

    let summary = format!("{result}");
    assert!(summary.contains("2 retained, 1 skipped"));
    assert!(summary.contains("skipped"));
}

/// Works in single precision too.
#[test]
fn test_f32_input() {
    let time: Vec<f32> = (0..200).map(|i| 100.0 + i as f32 * 0.02).collect();
    let flux: Vec<f32> = time.iter().map(|t| 1.0 + 0.001 * t.sin()).collect();

    let result = Detrend::new()
        .window_points(30)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert!(result.residual.iter().all(|r| (r - 1.0).abs() < 1e-3));
}

// ============================================================================
// Masked Fit Tests
// ============================================================================

/// The trend follows the fit series while the observed dip survives.
#[test]
fn test_detrend_masked_keeps_dip() {
    let time = stitched_time(&[400], 1.0);
    let clean = vec![1.0; time.len()];
    let mut observed = clean.clone();
    for f in &mut observed[200..210] {
        *f = 0.99;
    }

    let detrender = Detrend::new().window_points(30).adapter(Segmented).build().unwrap();
    let masked = detrender.detrend_masked(&time, &observed, &clean).unwrap();

    for i in 200..210 {
        assert_abs_diff_eq!(masked.trend[i], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(masked.residual[i], 0.99, epsilon = 1e-9);
    }
}

// ============================================================================
// Full Mode Tests
// ============================================================================

/// One pass over everything, gaps included.
#[test]
fn test_full_mode_single_segment() {
    let time = stitched_time(&[400, 400], 0.5);
    let flux = noisy(&vec![1.0; time.len()], 1e-3, 13);

    let detrender = Detrend::new().adapter(Full).build().unwrap();
    assert_abs_diff_eq!(detrender.fraction(), 0.03);

    let result = detrender.detrend(&time, &flux).unwrap();
    assert_eq!(result.len(), time.len());
    assert_eq!(result.segments.len(), 1);
    assert_eq!(result.segments[0].status, SegmentStatus::Retained { fraction: 0.03 });
    let mean = result.residual.iter().sum::<f64>() / result.len() as f64;
    assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-4);
}

/// A whole-curve fraction of one matches a segment exactly one window long.
#[test]
fn test_full_fraction_one_matches_window_length_segment() {
    let time = stitched_time(&[60], 1.0);
    let flux: Vec<f64> = (0..60)
        .map(|i| 1.0 + 0.03 * (std::f64::consts::PI * i as f64 / 59.0).sin())
        .collect();

    let full = Detrend::new()
        .fraction(1.0)
        .adapter(Full)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();
    let segmented = Detrend::new()
        .window_points(60)
        .adapter(Segmented)
        .build()
        .unwrap()
        .detrend(&time, &flux)
        .unwrap();

    assert_eq!(full.trend, segmented.trend);
    assert!(full.residual.iter().all(|r| (r - 1.0).abs() < 0.02));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_duplicate_parameter() {
    let err = Detrend::<f64>::new()
        .window_points(30)
        .window_points(450)
        .adapter(Segmented)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DetrendError::DuplicateParameter {
            parameter: "window_points"
        }
    );
}

/// Mode builders expose the same smoother setters and catch repeats on their own.
#[test]
fn test_mode_builders_share_setters() {
    let segmented = SegmentedDetrendBuilder::<f64>::default()
        .window_points(30)
        .gap_threshold(0.2)
        .iterations(2)
        .delta(0.0)
        .weight_function(Biweight)
        .robustness_method(Huber)
        .scaling_method(MAD)
        .zero_weight_fallback(ReturnOriginal)
        .auto_converge(1e-6)
        .build()
        .unwrap();
    assert_eq!(segmented.window_points(), 30);
    assert_abs_diff_eq!(segmented.gap_threshold(), 0.2);

    let full = FullDetrendBuilder::<f64>::default()
        .fraction(0.1)
        .iterations(2)
        .delta(0.0)
        .weight_function(Biweight)
        .robustness_method(Huber)
        .scaling_method(MAD)
        .zero_weight_fallback(ReturnOriginal)
        .auto_converge(1e-6)
        .build()
        .unwrap();
    assert_abs_diff_eq!(full.fraction(), 0.1);

    let err = SegmentedDetrendBuilder::<f64>::default()
        .iterations(1)
        .iterations(2)
        .build()
        .unwrap_err();
    assert_eq!(err, DetrendError::DuplicateParameter { parameter: "iterations" });

    let err = FullDetrendBuilder::<f64>::default()
        .fraction(0.1)
        .fraction(0.2)
        .build()
        .unwrap_err();
    assert_eq!(err, DetrendError::DuplicateParameter { parameter: "fraction" });
}

/// A parameter set on the generic builder and again on the mode builder is a repeat.
#[test]
fn test_duplicate_across_builders() {
    let err = Detrend::<f64>::new()
        .delta(0.0)
        .adapter(Full)
        .delta(0.01)
        .build()
        .unwrap_err();
    assert_eq!(err, DetrendError::DuplicateParameter { parameter: "delta" });

    let err = Detrend::<f64>::new()
        .scaling_method(MAR)
        .adapter(Segmented)
        .scaling_method(MAD)
        .build()
        .unwrap_err();
    assert_eq!(err, DetrendError::DuplicateParameter { parameter: "scaling_method" });
}

#[test]
fn test_invalid_parameters() {
    let err = Detrend::<f64>::new().window_points(1).adapter(Segmented).build().unwrap_err();
    assert_eq!(err, DetrendError::InvalidWindowPoints(1));

    let err = Detrend::new().gap_threshold(0.0).adapter(Segmented).build().unwrap_err();
    assert_eq!(err, DetrendError::InvalidGapThreshold(0.0));

    let err = Detrend::new().fraction(1.5).adapter(Full).build().unwrap_err();
    assert_eq!(err, DetrendError::InvalidFraction(1.5));

    let err = Detrend::new().delta(-1.0).adapter(Full).build().unwrap_err();
    assert_eq!(err, DetrendError::InvalidDelta(-1.0));
}

#[test]
fn test_invalid_inputs() {
    let detrender = Detrend::<f64>::new().window_points(2).adapter(Segmented).build().unwrap();

    let err = detrender.detrend(&[1.0, 3.0, 2.0], &[1.0, 1.0, 1.0]).unwrap_err();
    assert_eq!(err, DetrendError::UnsortedTime { index: 2 });

    let err = detrender.detrend(&[1.0, 2.0], &[1.0]).unwrap_err();
    assert_eq!(err, DetrendError::MismatchedInputs { x_len: 2, y_len: 1 });

    let err = detrender.detrend(&[1.0, 2.0], &[1.0, f64::NAN]).unwrap_err();
    assert!(matches!(err, DetrendError::InvalidNumericValue(_)));

    let err = detrender.detrend(&[], &[]).unwrap_err();
    assert_eq!(err, DetrendError::EmptyInput);
}
