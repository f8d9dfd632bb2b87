//! Gap-based segmentation of time series.
//!
//! ## Purpose
//!
//! Space-telescope light curves are interrupted by data downlinks, safe modes
//! and orbit boundaries. A smoother that bridges such a gap drags the trend on
//! one side toward the flux level on the other, so detrending is done per
//! contiguous observing segment.
//!
//! ## Key concepts
//!
//! * **Gap**: consecutive timestamps further apart than `gap_threshold`.
//! * **Segment**: a half-open index range `[start, end)` between gaps.
//!
//! ## Invariants
//!
//! * Segments are non-empty, ordered, non-overlapping and cover `0..n` exactly.
//! * A gap equal to the threshold does not split (strict comparison).
//!
//! ## Non-goals
//!
//! * This module does not sort time stamps; unsorted input is an error.

// External dependencies
use core::ops::Range;
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::DetrendError;

/// Half-open index range `[start, end)` of one contiguous observing segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// First index of the segment (inclusive).
    pub start: usize,

    /// One past the last index of the segment.
    pub end: usize,
}

impl Segment {
    /// Number of samples in the segment.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Index range usable for slicing.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `time` into contiguous segments wherever consecutive samples are more
/// than `gap_threshold` apart.
///
/// Returns an empty list for empty input and `UnsortedTime` at the first
/// index whose timestamp precedes its predecessor.
pub fn segment_on_gaps<T: Float>(time: &[T], gap_threshold: T) -> Result<Vec<Segment>, DetrendError> {
    if !gap_threshold.is_finite() || gap_threshold <= T::zero() {
        return Err(DetrendError::InvalidGapThreshold(
            gap_threshold.to_f64().unwrap_or(f64::NAN),
        ));
    }

    let n = time.len();
    let mut segments = Vec::new();
    if n == 0 {
        return Ok(segments);
    }

    let mut start = 0;
    for i in 1..n {
        let dt = time[i] - time[i - 1];
        if dt < T::zero() {
            return Err(DetrendError::UnsortedTime { index: i });
        }
        if dt > gap_threshold {
            segments.push(Segment { start, end: i });
            start = i;
        }
    }
    segments.push(Segment { start, end: n });

    Ok(segments)
}
