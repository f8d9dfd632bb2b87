//! Multi-target survey runner.
//!
//! ## Purpose
//!
//! This module runs the single-target transit search over a list of targets.
//! Every target is an independent unit of work: a target whose light curve
//! is missing, or whose search fails, is logged and recorded as a failure
//! while the rest of the survey carries on.
//!
//! ## Design notes
//!
//! * **Parallelism**: With the `cpu` feature, targets are spread over the
//!   rayon thread pool.
//! * **Ordering**: Reports and failures keep the order of the input targets
//!   in both modes.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use ndarray::Array2;
use tracing::{info, warn};

// Export dependencies from lcdetrend crate
use lcdetrend::prelude::{PeriodRow, SearchConfig, SearchReport, TransitSearch};

// Internal dependencies
use crate::errors::{SurveyError, TargetFailure};
use crate::source::TargetSource;

/// Number of numeric columns in [`SurveyOutcome::period_matrix`].
pub const PERIOD_MATRIX_COLUMNS: usize = 7;

/// Runs the transit search over many targets.
#[derive(Debug, Clone)]
pub struct Survey {
    search: TransitSearch,
    parallel: bool,
}

impl Survey {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            search: TransitSearch::new(config),
            parallel: cfg!(feature = "cpu"),
        }
    }

    /// Run targets in parallel. Ignored without the `cpu` feature.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        self.search.config()
    }

    /// Search a single target.
    pub fn process<S: TargetSource + ?Sized>(&self, source: &S) -> Result<SearchReport, SurveyError> {
        let sectors = source.load_sectors()?;
        let report = self.search.run_sectors(sectors)?;
        Ok(report)
    }

    fn process_isolated<S: TargetSource>(&self, source: &S) -> Result<SearchReport, TargetFailure> {
        self.process(source).map_err(|e| {
            warn!(target_id = source.id(), error = %e, "target failed");
            TargetFailure::new(source.id(), &e)
        })
    }

    /// Search every target.
    pub fn run<S>(&self, targets: &[S]) -> SurveyOutcome
    where
        S: TargetSource + Sync,
    {
        info!(targets = targets.len(), parallel = self.parallel, "starting survey");

        #[cfg(feature = "cpu")]
        let results: Vec<Result<SearchReport, TargetFailure>> = if self.parallel {
            targets.par_iter().map(|s| self.process_isolated(s)).collect()
        } else {
            targets.iter().map(|s| self.process_isolated(s)).collect()
        };

        #[cfg(not(feature = "cpu"))]
        let results: Vec<Result<SearchReport, TargetFailure>> =
            targets.iter().map(|s| self.process_isolated(s)).collect();

        let mut outcome = SurveyOutcome::default();
        for r in results {
            match r {
                Ok(report) => outcome.reports.push(report),
                Err(failure) => outcome.failures.push(failure),
            }
        }

        info!(
            succeeded = outcome.reports.len(),
            failed = outcome.failures.len(),
            "survey finished"
        );
        outcome
    }
}

/// Reports and failures of a survey, each in input order.
#[derive(Debug, Clone, Default)]
pub struct SurveyOutcome {
    pub reports: Vec<SearchReport>,
    pub failures: Vec<TargetFailure>,
}

impl SurveyOutcome {
    pub fn len(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One period-table row per successful target.
    pub fn period_table(&self) -> Vec<PeriodRow> {
        self.reports.iter().map(SearchReport::row).collect()
    }

    /// Numeric part of the period table, one row per successful target.
    ///
    /// Columns: sector, max power, period, epoch, 2nd period, 3rd period,
    /// rotation period. Missing values are NaN.
    pub fn period_matrix(&self) -> Array2<f64> {
        let rows = self.period_table();
        let mut m = Array2::from_elem((rows.len(), PERIOD_MATRIX_COLUMNS), f64::NAN);
        for (i, r) in rows.iter().enumerate() {
            let values = [
                f64::from(r.sector),
                r.max_power,
                r.period,
                r.epoch,
                r.period_2.unwrap_or(f64::NAN),
                r.period_3.unwrap_or(f64::NAN),
                r.rotation_period.unwrap_or(f64::NAN),
            ];
            for (j, v) in values.into_iter().enumerate() {
                m[[i, j]] = v;
            }
        }
        m
    }
}
