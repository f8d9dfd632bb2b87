//! Where survey targets come from.
//!
//! A [`TargetSource`] names a target and loads its photometry on demand, so
//! a survey can hold thousands of targets without holding their light
//! curves. Loading may fail; the survey records the failure and moves on.

// Export dependencies from lcdetrend crate
use lcdetrend::prelude::LightCurve;

// Internal dependencies
use crate::errors::SourceError;

/// One survey target.
pub trait TargetSource {
    /// Target identifier used in reports and logs.
    fn id(&self) -> &str;

    /// Load the target's light curve.
    fn load(&self) -> Result<LightCurve, SourceError>;

    /// Load every sector of the target, in observing order.
    fn load_sectors(&self) -> Result<Vec<LightCurve>, SourceError> {
        Ok(vec![self.load()?])
    }
}

/// An in-memory light curve is its own source.
impl TargetSource for LightCurve {
    fn id(&self) -> &str {
        &self.target_id
    }

    fn load(&self) -> Result<LightCurve, SourceError> {
        Ok(self.clone())
    }
}

/// Several sectors of the same target.
impl TargetSource for Vec<LightCurve> {
    fn id(&self) -> &str {
        self.first().map_or("", |lc| lc.target_id.as_str())
    }

    fn load(&self) -> Result<LightCurve, SourceError> {
        self.first()
            .cloned()
            .ok_or_else(|| SourceError::Unavailable("no sectors".to_string()))
    }

    fn load_sectors(&self) -> Result<Vec<LightCurve>, SourceError> {
        if self.is_empty() {
            return Err(SourceError::Unavailable("no sectors".to_string()));
        }
        Ok(self.clone())
    }
}

/// Source backed by a loading closure.
pub struct FnSource<F> {
    id: String,
    load: F,
}

impl<F> FnSource<F>
where
    F: Fn(&str) -> Result<LightCurve, SourceError>,
{
    pub fn new(id: impl Into<String>, load: F) -> Self {
        Self { id: id.into(), load }
    }
}

impl<F> TargetSource for FnSource<F>
where
    F: Fn(&str) -> Result<LightCurve, SourceError>,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<LightCurve, SourceError> {
        (self.load)(&self.id)
    }
}

/// Wrap each id in an [`FnSource`] sharing one loader.
pub fn from_fn<F>(ids: &[&str], load: F) -> Vec<FnSource<F>>
where
    F: Fn(&str) -> Result<LightCurve, SourceError> + Clone,
{
    ids.iter().map(|id| FnSource::new(*id, load.clone())).collect()
}
