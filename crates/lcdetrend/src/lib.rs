//! # lcdetrend: light-curve detrending and transit search
//!
//! Gap-aware LOWESS detrending of stellar light curves, followed by a Box
//! Least Squares search for periodic transits.
//!
//! ## What does it do?
//!
//! Space photometry is interrupted by regular data gaps (downlinks, orbit
//! changes) and shaped by slow stellar variability. The segmented detrender
//! splits a light curve wherever consecutive timestamps are more than a
//! threshold apart, fits a robust LOWESS trend to every segment with a window
//! of a fixed number of samples, and divides the flux by the trend. Segments
//! shorter than the window are dropped. The relative flux is then searched
//! for box-shaped dips.
//!
//! ## Quick Start
//!
//! ```rust
//! use lcdetrend::prelude::*;
//!
//! // Two stretches of 120 samples separated by a one-day gap
//! let time: Vec<f64> = (0..240)
//!     .map(|i| if i < 120 { i as f64 * 0.02 } else { 3.4 + i as f64 * 0.02 })
//!     .collect();
//! let flux: Vec<f64> = time.iter().map(|t| 1.0 + 0.01 * (t / 3.0).sin()).collect();
//!
//! let detrender = Detrend::new()
//!     .window_points(30)      // 30 samples per local fit
//!     .gap_threshold(0.1)     // new segment after a 0.1 day gap
//!     .adapter(Segmented)
//!     .build()?;
//!
//! let result = detrender.detrend(&time, &flux)?;
//! assert_eq!(result.retained_segments(), 2);
//! assert!(result.residual.iter().all(|r| (r - 1.0).abs() < 1e-3));
//! # Result::<(), DetrendError>::Ok(())
//! ```
//!
//! ### Transit search
//!
//! ```rust,no_run
//! use lcdetrend::prelude::*;
//!
//! # fn load() -> LightCurve { LightCurve::default() }
//! let lc: LightCurve = load();
//! let report = TransitSearch::new(SearchConfig::for_pipeline(Pipeline::Cdips)).run(&lc)?;
//! println!("{}", report.row());
//! # Result::<(), DetrendError>::Ok(())
//! ```
//!
//! ## Logging
//!
//! Progress is reported through `tracing`; install any subscriber to see
//! skipped segments (`warn`) and per-target summaries (`info`).
//!
//! ## References
//!
//! - Cleveland, W. S. (1979). "Robust Locally Weighted Regression and Smoothing Scatterplots"
//! - Kovács, G., Zucker, S., Mazeh, T. (2002). "A box-fitting algorithm in the search for periodic transits"
//! - Zechmeister, M., Kürster, M. (2009). "The generalised Lomb-Scargle periodogram"

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - pure mathematical functions.
mod math;

// Layer 3: Algorithms - smoother, periodograms and peak finding.
mod algorithms;

// Layer 4: Evaluation - diagnostics and synthetic transits.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
mod engine;

// Layer 6: Adapters - detrending modes.
mod adapters;

// Layer 7: High-level fluent API for detrending.
mod api;

// Layer 8: Single-target search pipeline.
mod pipeline;

// Standard prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::{Full, Segmented},
        DetrendBuilder as Detrend, DetrendError, DetrendResult, FullDetrend, FullDetrendBuilder, SegmentReport,
        SegmentStatus, SegmentedDetrend, SegmentedDetrendBuilder,
        RobustnessMethod::Bisquare,
        RobustnessMethod::Huber,
        RobustnessMethod::Talwar,
        ScalingMethod::MAD,
        ScalingMethod::MAR,
        WeightFunction::Biweight,
        WeightFunction::Epanechnikov,
        WeightFunction::Triangle,
        WeightFunction::Tricube,
        WeightFunction::Uniform,
        ZeroWeightFallback::ReturnNone,
        ZeroWeightFallback::ReturnOriginal,
        ZeroWeightFallback::UseLocalMean,
    };

    pub use crate::algorithms::bls::{BlsConfig, BlsPeak, BlsResult, BlsStats, BoxLeastSquares, Depth, linspace};
    pub use crate::algorithms::fold::{BinMethod, FoldedCurve, bin_blocks, phase_fold};
    pub use crate::algorithms::peaks::{Peak, PeakOptions, find_peaks, find_peaks_detailed, rank_peaks};
    pub use crate::algorithms::periodogram::{FrequencyGrid, LombScargle, LombScargleResult};
    pub use crate::evaluation::diagnostics::ResidualDiagnostics;
    pub use crate::evaluation::injection::BoxTransit;
    pub use crate::pipeline::lightcurve::LightCurve;
    pub use crate::pipeline::rotation::{RotationEstimate, rotation_period};
    pub use crate::pipeline::search::{
        DetrendingMode, PeriodRow, Pipeline, SearchConfig, SearchReport, SystematicsSource, TransitSearch,
        ranked_candidates,
    };
    pub use crate::pipeline::systematics::{
        DEFAULT_QUATERNION_SIGMA, DEFAULT_TOLERANCE, ExcludedRange, SystematicsMask, bad_times_from_quaternions,
        momentum_dumps, sector_ranges,
    };
    pub use crate::pipeline::transit_mask::KnownTransit;
    pub use crate::pipeline::variability::{PeakCut, PeakCutReport};
}

// Internal modules for development and testing.
//
// Only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
#[doc(hidden)]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod pipeline {
        pub use crate::pipeline::*;
    }
}
