//! Single-target transit search.
//!
//! ## Purpose
//!
//! This module runs the whole search for one light curve: cleaning,
//! normalisation, optional variability cut and transit masking, detrending,
//! a Box Least Squares search over the automatic period grid, and ranking
//! of the secondary periodogram peaks.
//!
//! ## Design notes
//!
//! * **Configuration**: [`SearchConfig`] is plain data with `serde` support;
//!   its defaults reproduce the survey settings (two-minute cadence,
//!   segmented detrending, 22 durations from 0.05 to 1 day).
//! * **Secondary peaks**: Periodogram peaks at least 5 samples wide and 10
//!   apart are ranked by power; the second and third are reported.
//! * **Rotation**: Estimated on the cleaned but un-normalised flux.
//!
//! ## Non-goals
//!
//! * Reading light curves, bad-time lists or writing tables.
//! * Plotting.

// External dependencies
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// Internal dependencies
use crate::adapters::full::DEFAULT_FULL_FRACTION;
use crate::adapters::segmented::DEFAULT_GAP_THRESHOLD;
use crate::algorithms::bls::{BlsConfig, BlsPeak, BlsResult, BlsStats, BoxLeastSquares};
use crate::algorithms::fold::FoldedCurve;
use crate::algorithms::peaks::{PeakOptions, find_peaks, rank_peaks};
use crate::algorithms::periodogram::FrequencyGrid;
use crate::api::{Adapter, DetrendBuilder};
use crate::engine::output::DetrendResult;
use crate::pipeline::lightcurve::LightCurve;
use crate::pipeline::rotation::{RotationEstimate, rotation_period};
use crate::pipeline::systematics::SystematicsMask;
use crate::pipeline::transit_mask::KnownTransit;
use crate::pipeline::variability::{PeakCut, PeakCutReport};
use crate::primitives::errors::DetrendError;

// ============================================================================
// Configuration
// ============================================================================

/// Photometry product, which sets the default smoothing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pipeline {
    /// Two-minute cadence target pixel photometry.
    #[default]
    TwoMinute,

    /// Thirty-minute full-frame image photometry.
    Cdips,
}

impl Pipeline {
    /// Smoothing window in samples (about 15 hours for both cadences).
    pub fn default_window_points(self) -> usize {
        match self {
            Self::TwoMinute => 450,
            Self::Cdips => 30,
        }
    }
}

/// How the light curve is flattened before the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetrendingMode {
    /// Per-segment LOWESS between data gaps.
    #[default]
    LowessPartial,

    /// One LOWESS pass over the whole curve.
    LowessFull,

    /// Search the normalised flux as is.
    None,
}

/// Where the systematics mask comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SystematicsSource {
    /// No cleaning.
    None,

    /// Momentum dumps and bad windows known for the light curve's sector.
    #[default]
    Sector,

    /// A caller-supplied mask.
    Custom(SystematicsMask),
}

impl SystematicsSource {
    fn mask_for(&self, sector: u32) -> Option<SystematicsMask> {
        match self {
            Self::None => None,
            Self::Sector => Some(SystematicsMask::from_momentum_dumps(sector)),
            Self::Custom(mask) => Some(mask.clone()),
        }
    }
}

/// Settings for [`TransitSearch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub pipeline: Pipeline,

    /// Overrides the pipeline's smoothing window.
    pub window_points: Option<usize>,

    pub gap_threshold: f64,
    pub detrending: DetrendingMode,

    /// Fraction used by [`DetrendingMode::LowessFull`].
    pub full_fraction: f64,

    /// Robustness iterations of the smoother.
    pub iterations: usize,

    pub systematics: SystematicsSource,
    pub peak_cut: Option<PeakCut>,
    pub transit_mask: Option<KnownTransit>,

    /// Frequency grid for the rotation period; `None` skips it.
    pub rotation_grid: Option<FrequencyGrid>,

    pub bls: BlsConfig,

    /// Filters for the secondary periodogram peaks.
    pub peak_options: PeakOptions,

    /// Fail with [`DetrendError::NotEnoughPeaks`] when fewer than three
    /// periodogram peaks are found.
    pub require_secondary_peaks: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::default(),
            window_points: None,
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            detrending: DetrendingMode::default(),
            full_fraction: DEFAULT_FULL_FRACTION,
            iterations: 3,
            systematics: SystematicsSource::default(),
            peak_cut: None,
            transit_mask: None,
            rotation_grid: Some(FrequencyGrid::default()),
            bls: BlsConfig::default(),
            peak_options: PeakOptions::default().with_width(5.0).with_distance(10),
            require_secondary_peaks: false,
        }
    }
}

impl SearchConfig {
    pub fn for_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            ..Self::default()
        }
    }

    /// Smoothing window in samples.
    pub fn window_points(&self) -> usize {
        self.window_points.unwrap_or_else(|| self.pipeline.default_window_points())
    }
}

// ============================================================================
// Report
// ============================================================================

/// One row of the survey period table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub target_id: String,
    pub sector: u32,
    /// Highest BLS log-likelihood gain.
    pub max_power: f64,
    pub period: f64,
    /// First mid-transit time of the best period inside the baseline.
    pub epoch: f64,
    pub period_2: Option<f64>,
    pub period_3: Option<f64>,
    pub rotation_period: Option<f64>,
}

impl PeriodRow {
    pub const HEADER: [&'static str; 8] = [
        "TIC",
        "Sector",
        "Max log likelihood",
        "Max Period",
        "Epoch of Max",
        "2nd highest period",
        "3rd Highest Period",
        "Rotation Period",
    ];
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{x:.4}"))
}

impl Display for PeriodRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:<16} {:>3} {:>12.4} {:>10.4} {:>12.4} {:>10} {:>10} {:>10}",
            self.target_id,
            self.sector,
            self.max_power,
            self.period,
            self.epoch,
            fmt_opt(self.period_2),
            fmt_opt(self.period_3),
            fmt_opt(self.rotation_period)
        )
    }
}

/// Everything the search produced for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub target_id: String,
    pub sector: u32,

    /// Detrended light curve the periodogram was computed on.
    pub detrended: DetrendResult<f64>,

    pub bls: BlsResult,

    /// Best period of the periodogram.
    pub best: BlsPeak,

    /// Statistics of the best candidate.
    pub stats: BlsStats,

    /// Periodogram peaks ranked by power, highest first.
    pub ranked_peaks: Vec<BlsPeak>,

    pub rotation: Option<RotationEstimate>,
    pub peak_cut: Option<PeakCutReport>,

    /// Detrended flux folded on the best, second and third periods.
    pub folded: Vec<FoldedCurve>,
}

impl SearchReport {
    /// First mid-transit time of the best candidate.
    pub fn epoch(&self) -> f64 {
        self.stats.transit_times.first().copied().unwrap_or(self.best.transit_time)
    }

    pub fn second_peak(&self) -> Option<&BlsPeak> {
        self.ranked_peaks.get(1)
    }

    pub fn third_peak(&self) -> Option<&BlsPeak> {
        self.ranked_peaks.get(2)
    }

    pub fn row(&self) -> PeriodRow {
        PeriodRow {
            target_id: self.target_id.clone(),
            sector: self.sector,
            max_power: self.bls.max_power(),
            period: self.best.period,
            epoch: self.epoch(),
            period_2: self.second_peak().map(|p| p.period),
            period_3: self.third_peak().map(|p| p.period),
            rotation_period: self.rotation.map(|r| r.period),
        }
    }
}

impl Display for SearchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.row())
    }
}

// ============================================================================
// Search
// ============================================================================

/// Runs the transit search with one configuration.
#[derive(Debug, Clone, Default)]
pub struct TransitSearch {
    config: SearchConfig,
}

impl TransitSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Clean each sector with its own mask and stitch them in order.
    pub fn stitch_sectors(&self, sectors: Vec<LightCurve>) -> Result<LightCurve, DetrendError> {
        let mut iter = sectors.into_iter();
        let mut stitched = iter.next().ok_or(DetrendError::EmptyInput)?;
        self.clean(&mut stitched);
        for mut lc in iter {
            self.clean(&mut lc);
            stitched.append(lc)?;
        }
        Ok(stitched)
    }

    fn clean(&self, lc: &mut LightCurve) {
        let dropped = lc.drop_non_finite();
        if dropped > 0 {
            debug!(target_id = %lc.target_id, dropped, "dropped non-finite samples");
        }
        if let Some(mask) = self.config.systematics.mask_for(lc.sector) {
            mask.apply(lc);
        }
    }

    /// Search one sector's light curve.
    pub fn run(&self, lc: &LightCurve) -> Result<SearchReport, DetrendError> {
        let mut lc = lc.clone();
        self.clean(&mut lc);
        self.search_cleaned(lc)
    }

    /// Search several sectors of one target as a single light curve.
    pub fn run_sectors(&self, sectors: Vec<LightCurve>) -> Result<SearchReport, DetrendError> {
        let lc = self.stitch_sectors(sectors)?;
        self.search_cleaned(lc)
    }

    fn search_cleaned(&self, mut lc: LightCurve) -> Result<SearchReport, DetrendError> {
        let cfg = &self.config;
        lc.validate()?;

        let rotation = match &cfg.rotation_grid {
            Some(grid) => Some(rotation_period(&lc.time, &lc.flux, grid)?),
            None => None,
        };

        lc.normalize()?;
        let peak_cut = cfg.peak_cut.map(|cut| cut.apply(&mut lc));
        if lc.is_empty() {
            return Err(DetrendError::EmptyInput);
        }

        let fit_flux = match &cfg.transit_mask {
            Some(transit) => transit.fill(&lc.time, &lc.flux)?,
            None => lc.flux.clone(),
        };

        let detrended = self.detrend(&lc.time, &lc.flux, &fit_flux)?;
        debug!(
            target_id = %lc.target_id,
            points = detrended.len(),
            segments = detrended.segments.len(),
            "detrended"
        );

        let model = BoxLeastSquares::new(&detrended.time, &detrended.residual, None)?;
        let bls = model.autopower(&cfg.bls)?;
        let best = bls
            .best()
            .ok_or(DetrendError::EmptyInput)?;
        let stats = model.compute_stats(best.period, best.duration, best.transit_time)?;

        let ranked_peaks = ranked_candidates(&bls, &cfg.peak_options);
        if cfg.require_secondary_peaks && ranked_peaks.len() < 3 {
            return Err(DetrendError::NotEnoughPeaks {
                found: ranked_peaks.len(),
                requested: 3,
            });
        }

        let mut folded = vec![FoldedCurve::new(
            &detrended.time,
            &detrended.residual,
            best.period,
            stats.transit_times.first().copied().unwrap_or(best.transit_time),
        )?];
        for peak in ranked_peaks.iter().skip(1).take(2) {
            folded.push(FoldedCurve::new(
                &detrended.time,
                &detrended.residual,
                peak.period,
                peak.transit_time,
            )?);
        }

        let report = SearchReport {
            target_id: lc.target_id,
            sector: lc.sector,
            detrended,
            bls,
            best,
            stats,
            ranked_peaks,
            rotation,
            peak_cut,
            folded,
        };
        info!(
            target_id = %report.target_id,
            period = report.best.period,
            power = report.best.power,
            epoch = report.epoch(),
            "transit search finished"
        );
        Ok(report)
    }

    fn detrend(&self, time: &[f64], flux: &[f64], fit_flux: &[f64]) -> Result<DetrendResult<f64>, DetrendError> {
        let cfg = &self.config;
        match cfg.detrending {
            DetrendingMode::LowessPartial => DetrendBuilder::new()
                .window_points(cfg.window_points())
                .gap_threshold(cfg.gap_threshold)
                .iterations(cfg.iterations)
                .adapter(Adapter::Segmented)
                .build()?
                .detrend_masked(time, flux, fit_flux),
            DetrendingMode::LowessFull => DetrendBuilder::new()
                .fraction(cfg.full_fraction)
                .iterations(cfg.iterations)
                .adapter(Adapter::Full)
                .build()?
                .detrend_masked(time, flux, fit_flux),
            DetrendingMode::None => {
                let mut result = DetrendResult::with_capacity(time.len());
                result.extend(time, flux, &vec![1.0; time.len()]);
                Ok(result)
            }
        }
    }
}

/// Periodogram peaks passing `options`, ranked by power.
pub fn ranked_candidates(result: &BlsResult, options: &PeakOptions) -> Vec<BlsPeak> {
    let peaks = find_peaks(&result.power, options);
    rank_peaks(&result.power, &peaks)
        .into_iter()
        .filter_map(|i| result.peak_at(i))
        .collect()
}
