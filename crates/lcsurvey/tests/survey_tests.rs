//! Tests for the multi-target survey runner.
//!
//! ## Test Organization
//!
//! 1. **Inputs** - Slices, vectors and ndarray columns
//! 2. **Sources** - In-memory, multi-sector and closure-backed targets
//! 3. **Failure Isolation** - Missing and failing targets
//! 4. **Outputs** - Ordering, period table and matrix

use approx::assert_abs_diff_eq;
use lcdetrend::prelude::*;
use lcsurvey::prelude::*;
use ndarray::{Array1, s};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

const PLANET: BoxTransit = BoxTransit {
    period: 3.7,
    epoch: 1326.3,
    duration: 0.12,
    depth: 0.005,
};

/// 27 days of two-minute-like photometry with `PLANET` injected.
fn planet_light_curve(id: &str, seed: u64) -> LightCurve {
    let time: Vec<f64> = (0..1350).map(|i| 1325.0 + i as f64 * 0.02).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 5e-4).unwrap();
    let base: Vec<f64> = time.iter().map(|_| 1.0 + noise.sample(&mut rng)).collect();
    let flux = PLANET.inject(&time, &base).unwrap();
    LightCurve::new(id, 1, time, flux).unwrap()
}

/// Too short for the two-minute smoothing window.
fn short_light_curve(id: &str) -> LightCurve {
    let time: Vec<f64> = (0..100).map(|i| 1325.0 + i as f64 * 0.02).collect();
    LightCurve::new(id, 1, time, vec![1.0; 100]).unwrap()
}

fn quick_config() -> SearchConfig {
    SearchConfig {
        systematics: SystematicsSource::None,
        rotation_grid: None,
        bls: BlsConfig {
            durations: vec![0.08, 0.12, 0.16],
            frequency_factor: 3.0,
            ..BlsConfig::default()
        },
        ..SearchConfig::default()
    }
}

fn loader(id: &str) -> Result<LightCurve, SourceError> {
    match id {
        "missing" => Err(SourceError::Unavailable(format!("no data for {id}"))),
        "broken" => Err(SourceError::Other("corrupt file".to_string())),
        "short" => Ok(short_light_curve(id)),
        "a" => Ok(planet_light_curve(id, 1)),
        "b" => Ok(planet_light_curve(id, 2)),
        _ => Ok(planet_light_curve(id, 3)),
    }
}

// ============================================================================
// Input Tests
// ============================================================================

/// Slices, vectors and contiguous arrays all build light curves.
#[test]
fn test_inputs_build_light_curves() {
    let time = vec![0.0, 1.0, 2.0];
    let flux = Array1::from(vec![1.0, 1.1, 0.9]);
    let err = [0.01, 0.01, 0.01];

    let lc = light_curve_from("x", 4, &time, &flux).unwrap();
    assert_eq!(lc.sector, 4);
    assert_eq!(lc.flux, vec![1.0, 1.1, 0.9]);

    let lc = light_curve_with_errors("x", 4, time.as_slice(), &flux, &err[..]).unwrap();
    assert_eq!(lc.flux_err, Some(vec![0.01; 3]));
}

/// Strided views are rejected rather than copied.
#[test]
fn test_non_contiguous_input_rejected() {
    let full = Array1::from(vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);
    let strided = full.slice(s![..;2]);
    let flux = vec![1.0; 3];

    let err = light_curve_from("x", 1, &strided, &flux).unwrap_err();
    assert!(matches!(err, SurveyError::InvalidInput(_)));
}

/// Mismatched columns surface as search errors.
#[test]
fn test_input_length_mismatch() {
    let err = light_curve_from("x", 1, &vec![0.0, 1.0], &vec![1.0]).unwrap_err();
    assert_eq!(
        err,
        SurveyError::Search(DetrendError::MismatchedInputs { x_len: 2, y_len: 1 })
    );
}

// ============================================================================
// Source Tests
// ============================================================================

/// Sources report their ids and load on demand.
#[test]
fn test_sources_load() {
    let lc = short_light_curve("mem");
    assert_eq!(lc.id(), "mem");
    assert_eq!(lc.load_sectors().unwrap().len(), 1);

    let sectors = vec![short_light_curve("multi"), short_light_curve("multi")];
    assert_eq!(sectors.id(), "multi");
    assert_eq!(sectors.load_sectors().unwrap().len(), 2);

    let none: Vec<LightCurve> = Vec::new();
    assert!(matches!(none.load_sectors(), Err(SourceError::Unavailable(_))));

    let sources = from_fn(&["a", "missing"], loader);
    assert_eq!(sources[0].id(), "a");
    assert!(sources[0].load().is_ok());
    assert!(sources[1].load().is_err());
}

// ============================================================================
// Failure Isolation Tests
// ============================================================================

/// Failing targets are recorded while the others complete.
#[test]
fn test_failures_are_isolated() {
    let sources = from_fn(&["a", "missing", "b", "short", "broken"], loader);
    let outcome = Survey::new(quick_config()).run(&sources);

    assert_eq!(outcome.len(), 5);
    let ok: Vec<&str> = outcome.reports.iter().map(|r| r.target_id.as_str()).collect();
    assert_eq!(ok, vec!["a", "b"]);

    let failed: Vec<(&str, FailureKind)> = outcome
        .failures
        .iter()
        .map(|f| (f.target_id.as_str(), f.kind))
        .collect();
    assert_eq!(
        failed,
        vec![
            ("missing", FailureKind::Unavailable),
            ("short", FailureKind::Search),
            ("broken", FailureKind::Source),
        ]
    );
    assert!(outcome.failures[0].message.contains("no data for missing"));
}

/// A single target can be processed directly.
#[test]
fn test_process_single_target() {
    let survey = Survey::new(quick_config());
    let report = survey.process(&planet_light_curve("solo", 9)).unwrap();
    assert_abs_diff_eq!(report.best.period, PLANET.period, epsilon = 0.03);

    let err = survey.process(&short_light_curve("tiny")).unwrap_err();
    assert!(matches!(
        err,
        SurveyError::Search(DetrendError::NoSegmentsRetained { .. })
    ));
}

// ============================================================================
// Output Tests
// ============================================================================

/// Parallel and serial runs agree and keep input order.
#[test]
fn test_parallel_matches_serial() {
    let targets = vec![
        planet_light_curve("t1", 21),
        planet_light_curve("t2", 22),
        planet_light_curve("t3", 23),
    ];

    let serial = Survey::new(quick_config()).parallel(false).run(&targets);
    let parallel = Survey::new(quick_config()).parallel(true).run(&targets);

    assert!(serial.failures.is_empty());
    assert_eq!(serial.period_table(), parallel.period_table());
    let ids: Vec<String> = parallel.period_table().into_iter().map(|r| r.target_id).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
}

/// The period matrix mirrors the table with NaN for missing values.
#[test]
fn test_period_matrix() {
    let targets = vec![planet_light_curve("m1", 31), planet_light_curve("m2", 32)];
    let outcome = Survey::new(quick_config()).run(&targets);
    let table = outcome.period_table();
    let matrix = outcome.period_matrix();

    assert_eq!(matrix.dim(), (2, PERIOD_MATRIX_COLUMNS));
    for (i, row) in table.iter().enumerate() {
        assert_eq!(matrix[[i, 0]], 1.0);
        assert_eq!(matrix[[i, 1]], row.max_power);
        assert_eq!(matrix[[i, 2]], row.period);
        assert_eq!(matrix[[i, 3]], row.epoch);
        assert!(matrix[[i, 6]].is_nan());
        assert_abs_diff_eq!(row.period, PLANET.period, epsilon = 0.03);
    }
}

/// An empty survey yields an empty outcome.
#[test]
fn test_empty_survey() {
    let targets: Vec<LightCurve> = Vec::new();
    let outcome = Survey::new(quick_config()).run(&targets);
    assert!(outcome.is_empty());
    assert_eq!(outcome.period_matrix().dim(), (0, PERIOD_MATRIX_COLUMNS));
}
