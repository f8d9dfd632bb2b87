//! Detrending and transit-search benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Segmented detrending at both survey cadences
//! - Smoother parameters (window size, iterations)
//! - Box Least Squares and Lomb-Scargle periodograms
//! - A small multi-target survey
//!
//! For serial survey execution, use `LCDETREND_SURVEY_MODE=serial cargo bench`.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lcdetrend::prelude::*;
use lcsurvey::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;
use std::env;
use std::f64::consts::TAU;
use std::hint::black_box;

// ============================================================================
// Helper Functions
// ============================================================================

fn survey_mode() -> (bool, &'static str) {
    match env::var("LCDETREND_SURVEY_MODE").ok().as_deref() {
        Some("serial") => (false, "serial"),
        _ => (true, "parallel"),
    }
}

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Orbit-like light curve: `orbits` stretches of `per_orbit` samples split by
/// one-day downlink gaps, with rotation, white noise and a box transit.
fn generate_light_curve(per_orbit: usize, orbits: usize, cadence: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1e-3).unwrap();
    let transit = BoxTransit {
        period: 3.3,
        epoch: 1.1,
        duration: 0.1,
        depth: 0.004,
    };

    let mut time = Vec::with_capacity(per_orbit * orbits);
    let mut t = 0.0;
    for orbit in 0..orbits {
        if orbit > 0 {
            t += 1.0;
        }
        for _ in 0..per_orbit {
            time.push(t);
            t += cadence;
        }
    }

    let base: Vec<f64> = time
        .iter()
        .map(|&t| 1.0 + 0.005 * (TAU * t / 6.0).sin() + noise.sample(&mut rng))
        .collect();
    let flux = transit.inject(&time, &base).unwrap();
    (time, flux)
}

/// Light curve with 2% of samples replaced by flares and dropouts.
fn generate_outlier_light_curve(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let (time, mut flux) = generate_light_curve(size, 1, 0.02, seed);
    let mut rng = StdRng::seed_from_u64(seed ^ 0xA5A5);
    for _ in 0..size / 50 {
        let idx = rng.random_range(0..size);
        flux[idx] += if rng.random_bool(0.5) { 0.05 } else { -0.05 };
    }
    (time, flux)
}

// ============================================================================
// Benchmark Functions
// ============================================================================

fn bench_segmented_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmented_scalability");
    group.sample_size(30);

    for per_orbit in [1_000, 5_000, 10_000] {
        let (time, flux) = generate_light_curve(per_orbit, 2, 0.0014, 42);
        group.throughput(Throughput::Elements(time.len() as u64));

        group.bench_with_input(BenchmarkId::new("two_minute", per_orbit), &per_orbit, |b, _| {
            b.iter(|| {
                Detrend::new()
                    .window_points(450)
                    .adapter(Segmented)
                    .build()
                    .unwrap()
                    .detrend(black_box(&time), black_box(&flux))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_cadence(c: &mut Criterion) {
    let mut group = c.benchmark_group("cadence");
    group.sample_size(50);

    // Thirty-minute frames over one sector
    let (time, flux) = generate_light_curve(620, 2, 0.0208, 42);
    group.bench_function("cdips_segmented", |b| {
        b.iter(|| {
            Detrend::new()
                .window_points(30)
                .adapter(Segmented)
                .build()
                .unwrap()
                .detrend(black_box(&time), black_box(&flux))
                .unwrap()
        })
    });

    group.bench_function("cdips_full", |b| {
        b.iter(|| {
            Detrend::new()
                .adapter(Full)
                .build()
                .unwrap()
                .detrend(black_box(&time), black_box(&flux))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_window_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_points");
    group.sample_size(50);

    let (time, flux) = generate_light_curve(5_000, 2, 0.0014, 42);
    for window in [30, 150, 450, 1_000] {
        group.bench_with_input(BenchmarkId::new("segmented", window), &window, |b, &window| {
            b.iter(|| {
                Detrend::new()
                    .window_points(window)
                    .adapter(Segmented)
                    .build()
                    .unwrap()
                    .detrend(black_box(&time), black_box(&flux))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterations");
    group.sample_size(50);

    let (time, flux) = generate_outlier_light_curve(5_000, 42);
    for iter in [0, 1, 3, 5] {
        group.bench_with_input(BenchmarkId::new("segmented", iter), &iter, |b, &iter| {
            b.iter(|| {
                Detrend::new()
                    .window_points(450)
                    .iterations(iter)
                    .adapter(Segmented)
                    .build()
                    .unwrap()
                    .detrend(black_box(&time), black_box(&flux))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_bls(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls");
    group.sample_size(10);

    let (time, flux) = generate_light_curve(620, 2, 0.0208, 7);
    let durations = [0.05, 0.1, 0.15];
    for n_periods in [1_000, 5_000] {
        let periods = linspace(0.5, 10.0, n_periods);
        group.throughput(Throughput::Elements(n_periods as u64));
        group.bench_with_input(BenchmarkId::new("power", n_periods), &n_periods, |b, _| {
            let model = BoxLeastSquares::new(&time, &flux, None).unwrap();
            b.iter(|| model.power(black_box(&periods), &durations).unwrap())
        });
    }
    group.finish();
}

fn bench_lomb_scargle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lomb_scargle");
    group.sample_size(10);

    let (time, flux) = generate_light_curve(5_000, 2, 0.0014, 11);
    for step in [1e-3, 1e-4] {
        let grid = FrequencyGrid::range(0.04, 4.1, step).unwrap();
        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(BenchmarkId::new("power", grid.len()), &grid, |b, grid| {
            let ls = LombScargle::new(&time, &flux).unwrap();
            b.iter(|| ls.power(black_box(grid)))
        });
    }
    group.finish();
}

fn bench_survey(c: &mut Criterion) {
    let (parallel, mode_name) = survey_mode();
    let mut group = c.benchmark_group(format!("survey_{mode_name}"));
    group.sample_size(10);

    let targets: Vec<LightCurve> = (0..8)
        .map(|k| {
            let (time, flux) = generate_light_curve(620, 2, 0.0208, 100 + k);
            LightCurve::new(format!("{k}"), 1, time, flux).unwrap()
        })
        .collect();
    let config = SearchConfig {
        systematics: SystematicsSource::None,
        rotation_grid: FrequencyGrid::range(0.04, 4.1, 1e-3).ok(),
        ..SearchConfig::for_pipeline(Pipeline::Cdips)
    };
    let survey = Survey::new(config).parallel(parallel);

    group.bench_function("cdips_targets", |b| b.iter(|| survey.run(black_box(&targets))));
    group.finish();
}

criterion_group!(
    benches,
    bench_segmented_scalability,
    bench_cadence,
    bench_window_points,
    bench_iterations,
    bench_bls,
    bench_lomb_scargle,
    bench_survey,
);
criterion_main!(benches);
