#![cfg(feature = "dev")]
//! Tests for segmentation, windowing and sorting primitives.
//!
//! ## Test Organization
//!
//! 1. **Gap Segmentation** - Splitting, coverage, threshold equality
//! 2. **Window Management** - Initialization and recentering
//! 3. **Sorting** - Stable argsort and companion reordering

use lcdetrend::internals::primitives::errors::DetrendError;
use lcdetrend::internals::primitives::segment::{Segment, segment_on_gaps};
use lcdetrend::internals::primitives::sorting::{argsort, sort_by_key};
use lcdetrend::internals::primitives::window::Window;

// ============================================================================
// Gap Segmentation Tests
// ============================================================================

/// Test that gaps larger than the threshold split the series.
#[test]
fn test_segment_basic_split() {
    let time = [0.0, 0.02, 0.04, 1.0, 1.02, 3.0];
    let segments = segment_on_gaps(&time, 0.1).unwrap();

    assert_eq!(
        segments,
        vec![
            Segment { start: 0, end: 3 },
            Segment { start: 3, end: 5 },
            Segment { start: 5, end: 6 },
        ]
    );
    assert_eq!(segments[1].len(), 2);
    assert_eq!(segments[1].range(), 3..5);
}

/// Test that segments cover every index exactly once.
#[test]
fn test_segment_coverage() {
    let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.02 + if i >= 40 { 2.0 } else { 0.0 }).collect();
    let segments = segment_on_gaps(&time, 0.1).unwrap();

    assert_eq!(segments.first().map(|s| s.start), Some(0));
    assert_eq!(segments.last().map(|s| s.end), Some(100));
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(segments.iter().all(|s| !s.is_empty()));
    assert_eq!(segments.iter().map(Segment::len).sum::<usize>(), 100);
}

/// Test that a gap exactly equal to the threshold does not split.
#[test]
fn test_segment_threshold_is_strict() {
    let time = [0.0, 0.5, 1.0, 1.5];
    assert_eq!(segment_on_gaps(&time, 0.5).unwrap().len(), 1);
    assert_eq!(segment_on_gaps(&time, 0.25).unwrap().len(), 4);
}

/// Test edge cases: empty, single sample, repeated timestamps.
#[test]
fn test_segment_edge_cases() {
    assert!(segment_on_gaps::<f64>(&[], 0.1).unwrap().is_empty());
    assert_eq!(
        segment_on_gaps(&[5.0], 0.1).unwrap(),
        vec![Segment { start: 0, end: 1 }]
    );
    assert_eq!(segment_on_gaps(&[1.0, 1.0, 1.0], 0.1).unwrap().len(), 1);
}

/// Test error reporting for unsorted time and bad thresholds.
#[test]
fn test_segment_errors() {
    assert_eq!(
        segment_on_gaps(&[0.0, 1.0, 0.5], 0.1),
        Err(DetrendError::UnsortedTime { index: 2 })
    );
    assert!(matches!(
        segment_on_gaps(&[0.0, 1.0], 0.0),
        Err(DetrendError::InvalidGapThreshold(_))
    ));
    assert!(matches!(
        segment_on_gaps(&[0.0, 1.0], f64::NAN),
        Err(DetrendError::InvalidGapThreshold(_))
    ));
}

// ============================================================================
// Window Management Tests
// ============================================================================

/// Test window initialization centres and clamps.
#[test]
fn test_window_initialize() {
    let win = Window::initialize(5, 5, 10);
    assert_eq!(win.len(), 5);
    assert!(win.left <= 5 && 5 <= win.right);

    let end = Window::initialize(9, 3, 10);
    assert_eq!((end.left, end.right), (7, 9));

    let full = Window::initialize(0, 20, 10);
    assert_eq!((full.left, full.right), (0, 9));
}

/// Test recentering moves the window toward the nearest neighbours.
#[test]
fn test_window_recenter() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0, 11.0, 12.0];
    let mut win = Window::initialize(0, 3, x.len());
    win.recenter(&x, 3, x.len());
    assert_eq!((win.left, win.right), (2, 4));

    // Sparse right side keeps the window on the dense left side
    win.recenter(&x, 4, x.len());
    assert_eq!((win.left, win.right), (2, 4));

    win.recenter(&x, 6, x.len());
    assert_eq!((win.left, win.right), (5, 7));
}

/// Test that a window spanning the series stays put while recentering.
#[test]
fn test_window_spanning_series() {
    let x = [0.0, 0.1, 0.2, 5.0, 5.1];
    let mut win = Window::initialize(4, Window::calculate_span(x.len(), 1.0), x.len());
    assert_eq!(win, Window::spanning(5));
    assert!(win.spans(5));

    for i in 0..x.len() {
        win.recenter(&x, i, x.len());
        assert_eq!((win.left, win.right), (0, 4));
    }
    assert_eq!(win.max_distance(&x, 0.0), 5.1);

    let part = Window::initialize(0, 3, x.len());
    assert!(!part.spans(5));
}

/// Test span calculation from the fraction.
#[test]
fn test_window_span() {
    assert_eq!(Window::calculate_span(100, 0.3), 30);
    assert_eq!(Window::calculate_span(450, 1.0), 450);
    assert_eq!(Window::calculate_span(10, 0.01), 2);
    assert_eq!(Window::calculate_span(1350, 450.0 / 1350.0), 450);
}

// ============================================================================
// Sorting Tests
// ============================================================================

/// Test that sorted input keeps the identity permutation.
#[test]
fn test_argsort_sorted_identity() {
    assert_eq!(argsort(&[1.0, 2.0, 2.0, 3.0]), vec![0, 1, 2, 3]);
}

/// Test stable ordering and non-finite keys moving last.
#[test]
fn test_argsort_stable_and_nan_last() {
    let keys = [0.5, f64::NAN, 0.1, 0.5, 0.0];
    assert_eq!(argsort(&keys), vec![4, 2, 0, 3, 1]);
}

/// Test that values follow their keys.
#[test]
fn test_sort_by_key_carries_values() {
    let sorted = sort_by_key(&[0.9, 0.1, 0.5], &[9.0, 1.0, 5.0]);
    assert_eq!(sorted.keys, vec![0.1, 0.5, 0.9]);
    assert_eq!(sorted.values, vec![1.0, 5.0, 9.0]);
    assert_eq!(sorted.indices, vec![1, 2, 0]);
}
