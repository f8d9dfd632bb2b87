//! Error types for the survey runner.

// External dependencies
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Export dependencies from lcdetrend crate
use lcdetrend::prelude::DetrendError;

/// Failure to produce a target's light curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// No light curve exists for the target.
    #[error("no light curve available: {0}")]
    Unavailable(String),

    #[error("failed to load light curve: {0}")]
    Other(String),
}

/// Error raised while handling one target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Search(#[from] DetrendError),

    /// Input arrays could not be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Which stage a target failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The source had no light curve.
    Unavailable,

    /// The source failed for another reason.
    Source,

    /// Cleaning, detrending or the search failed.
    Search,

    InvalidInput,
}

/// A target that produced no report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFailure {
    pub target_id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl TargetFailure {
    pub fn new(target_id: impl Into<String>, error: &SurveyError) -> Self {
        let kind = match error {
            SurveyError::Source(SourceError::Unavailable(_)) => FailureKind::Unavailable,
            SurveyError::Source(SourceError::Other(_)) => FailureKind::Source,
            SurveyError::Search(_) => FailureKind::Search,
            SurveyError::InvalidInput(_) => FailureKind::InvalidInput,
        };
        Self {
            target_id: target_id.into(),
            kind,
            message: error.to_string(),
        }
    }
}
