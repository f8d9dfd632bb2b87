//! Result types for detrending operations.
//!
//! ## Purpose
//!
//! This module defines [`DetrendResult`], the concatenated trend and relative
//! flux of every retained segment, together with a per-segment account of
//! what the detrender did.
//!
//! ## Invariants
//!
//! * `time`, `flux`, `trend` and `residual` have equal lengths.
//! * `time` is a subsequence of the input time, in input order.
//! * `residual[i] == flux[i] / trend[i]`.
//! * Every input segment appears once in `segments`, in order.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::evaluation::diagnostics::ResidualDiagnostics;
use crate::primitives::segment::Segment;

/// What happened to one observing segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentStatus {
    /// Smoothed with the given fraction.
    Retained { fraction: f64 },

    /// Left out because it held fewer than `min_points` samples.
    Skipped { min_points: usize },
}

/// Account of one segment of the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    /// First input index of the segment.
    pub start: usize,

    /// One past the last input index.
    pub end: usize,

    /// Time of the first and last sample.
    pub time_span: (f64, f64),

    pub status: SegmentStatus,
}

impl SegmentReport {
    pub fn new<T: Float>(segment: Segment, time: &[T], status: SegmentStatus) -> Self {
        let first = time[segment.start].to_f64().unwrap_or(f64::NAN);
        let last = time[segment.end - 1].to_f64().unwrap_or(f64::NAN);
        Self {
            start: segment.start,
            end: segment.end,
            time_span: (first, last),
            status,
        }
    }

    pub fn points(&self) -> usize {
        self.end - self.start
    }

    pub fn is_retained(&self) -> bool {
        matches!(self.status, SegmentStatus::Retained { .. })
    }
}

/// Detrended light curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetrendResult<T> {
    /// Timestamps of the retained samples.
    pub time: Vec<T>,

    /// Observed flux of the retained samples.
    pub flux: Vec<T>,

    /// Smoothed trend.
    pub trend: Vec<T>,

    /// Relative flux, `flux / trend`.
    pub residual: Vec<T>,

    /// One entry per input segment.
    pub segments: Vec<SegmentReport>,
}

impl<T: Float> DetrendResult<T> {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            flux: Vec::with_capacity(n),
            trend: Vec::with_capacity(n),
            residual: Vec::with_capacity(n),
            segments: Vec::new(),
        }
    }

    /// Append one smoothed stretch of samples.
    pub(crate) fn extend(&mut self, time: &[T], flux: &[T], trend: &[T]) {
        self.time.extend_from_slice(time);
        self.flux.extend_from_slice(flux);
        self.trend.extend_from_slice(trend);
        self.residual.extend(flux.iter().zip(trend).map(|(&f, &t)| f / t));
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn retained_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.is_retained()).count()
    }

    pub fn skipped_segments(&self) -> usize {
        self.segments.len() - self.retained_segments()
    }

    /// Summary statistics of the relative flux.
    pub fn diagnostics(&self) -> Option<ResidualDiagnostics<T>> {
        ResidualDiagnostics::compute(&self.residual)
    }
}

impl<T: Float + Display> Display for DetrendResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Retained points: {}", self.len())?;
        writeln!(
            f,
            "  Segments: {} retained, {} skipped",
            self.retained_segments(),
            self.skipped_segments()
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "{:>4} {:>8} {:>8} {:>12} {:>12} {:>10}",
            "Seg", "Start", "Points", "T_first", "T_last", "Fraction"
        )?;
        writeln!(f, "{:-<59}", "")?;
        for (i, s) in self.segments.iter().enumerate() {
            write!(
                f,
                "{:>4} {:>8} {:>8} {:>12.4} {:>12.4}",
                i,
                s.start,
                s.points(),
                s.time_span.0,
                s.time_span.1
            )?;
            match s.status {
                SegmentStatus::Retained { fraction } => writeln!(f, " {:>10.4}", fraction)?,
                SegmentStatus::Skipped { .. } => writeln!(f, " {:>10}", "skipped")?,
            }
        }

        if let Some(d) = self.diagnostics() {
            writeln!(f)?;
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}
