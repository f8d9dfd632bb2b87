//! Layer 3: Algorithms
//!
//! This layer implements the numerical methods: local weighted regression,
//! robustness reweighting and delta interpolation for the smoother, plus the
//! period searches (Box Least Squares, Lomb-Scargle), peak detection and
//! phase folding. It holds the "business logic" but is orchestrated by the
//! engine and pipeline layers.

// Local weighted regression implementations.
pub mod regression;

// Robustness weight updates for outlier downweighting.
pub mod robustness;

// Interpolation and delta optimization utilities.
pub mod interpolation;

// Box Least Squares transit search.
pub mod bls;

// Lomb-Scargle periodogram.
pub mod periodogram;

// Peak detection.
pub mod peaks;

// Phase folding and binning.
pub mod fold;
