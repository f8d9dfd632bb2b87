//! Error types for detrending and transit search operations.
//!
//! ## Purpose
//!
//! This module defines every error condition the core crate can report:
//! input validation, smoother parameter constraints, segmentation outcomes,
//! periodogram grid construction and builder misuse.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include relevant values (e.g., actual vs. expected lengths).
//! * **Deferred**: Builder errors are stored during configuration and surfaced by `build()`.
//! * **Derived**: `Display` and `std::error::Error` come from `thiserror`.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Numeric values in errors use `f64` regardless of the working float type.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery or fallback strategies.

// External dependencies
use thiserror::Error;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for detrending and transit search operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetrendError {
    /// Input arrays are empty.
    #[error("Input arrays are empty")]
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `time` and `flux` arrays must have the same number of elements.
    #[error("Length mismatch: x has {x_len} points, y has {y_len}")]
    MismatchedInputs {
        /// Number of elements in the independent array.
        x_len: usize,
        /// Number of elements in the dependent array.
        y_len: usize,
    },

    /// Input data contains NaN or infinite values.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Number of points is below the minimum requirement.
    #[error("Too few points: got {got}, need at least {min}")]
    TooFewPoints {
        /// Number of points provided.
        got: usize,
        /// Minimum required points.
        min: usize,
    },

    /// Timestamps must be non-decreasing.
    #[error("Time is not non-decreasing at index {index}")]
    UnsortedTime {
        /// Index of the first sample that precedes its predecessor.
        index: usize,
    },

    /// Smoothing fraction must be in the range (0, 1].
    #[error("Invalid fraction: {0} (must be > 0 and <= 1)")]
    InvalidFraction(f64),

    /// Delta controls interpolation optimization and must be non-negative.
    #[error("Invalid delta: {0} (must be >= 0)")]
    InvalidDelta(f64),

    /// Robustness iteration count is out of range.
    #[error("Invalid iterations: {0} (must be in [0, 1000])")]
    InvalidIterations(usize),

    /// Convergence tolerance must be positive and finite.
    #[error("Invalid tolerance: {0} (must be > 0 and finite)")]
    InvalidTolerance(f64),

    /// Gap threshold must be positive and finite.
    #[error("Invalid gap threshold: {0} (must be > 0 and finite)")]
    InvalidGapThreshold(f64),

    /// Target window must contain at least two points.
    #[error("Invalid window_points: {0} (must be at least 2)")]
    InvalidWindowPoints(usize),

    /// Transit duration must be positive and finite.
    #[error("Invalid duration: {0} (must be > 0 and finite)")]
    InvalidDuration(f64),

    /// Period search bounds are empty or inverted.
    #[error("Invalid period range: [{min}, {max}]")]
    InvalidPeriodRange {
        /// Lower bound of the period range.
        min: f64,
        /// Upper bound of the period range.
        max: f64,
    },

    /// Every trial duration must be shorter than every trial period.
    #[error("Duration {duration} is not shorter than period {period}")]
    DurationExceedsPeriod {
        /// Longest trial duration.
        duration: f64,
        /// Shortest trial period.
        period: f64,
    },

    /// Frequency grid description is unusable.
    #[error("Invalid frequency grid: {0}")]
    InvalidFrequencyGrid(String),

    /// Bin size must be at least one sample.
    #[error("Invalid bin size: {0} (must be >= 1)")]
    InvalidBinSize(usize),

    /// Every segment was shorter than the window, so nothing was detrended.
    #[error("No segments retained: all {segments} segments have fewer than {min_points} points")]
    NoSegmentsRetained {
        /// Number of segments found.
        segments: usize,
        /// Minimum points required per segment.
        min_points: usize,
    },

    /// Fewer periodogram peaks were found than requested.
    #[error("Not enough periodogram peaks: found {found}, requested {requested}")]
    NotEnoughPeaks {
        /// Number of peaks found.
        found: usize,
        /// Number of peaks requested.
        requested: usize,
    },

    /// Parameter was set multiple times in the builder.
    #[error(
        "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
    )]
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}
