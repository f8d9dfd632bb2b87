//! # lcsurvey: transit searches over many targets
//!
//! Runs the [`lcdetrend`] single-target pipeline over a survey, one target
//! per unit of work, optionally across a rayon thread pool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lcsurvey::prelude::*;
//! use lcdetrend::prelude::{LightCurve, Pipeline, SearchConfig};
//!
//! # let targets: Vec<LightCurve> = Vec::new();
//! let outcome = Survey::new(SearchConfig::for_pipeline(Pipeline::Cdips))
//!     .parallel(true)
//!     .run(&targets);
//!
//! for row in outcome.period_table() {
//!     println!("{row}");
//! }
//! for failure in &outcome.failures {
//!     eprintln!("{}: {}", failure.target_id, failure.message);
//! }
//! ```
//!
//! ## Features
//!
//! * `cpu` (default): parallel execution with rayon.

/// Error types.
pub mod errors;

/// Array inputs.
pub mod input;

/// Target sources.
pub mod source;

/// Survey execution.
pub mod survey;

pub mod prelude {
    pub use crate::errors::{FailureKind, SourceError, SurveyError, TargetFailure};
    pub use crate::input::{LightCurveInput, light_curve_from, light_curve_with_errors};
    pub use crate::source::{FnSource, TargetSource, from_fn};
    pub use crate::survey::{PERIOD_MATRIX_COLUMNS, Survey, SurveyOutcome};
}
