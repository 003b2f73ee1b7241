//! # Concentration Benchmarks
//!
//! Measures Gaussian puff superposition over filament sets of growing size,
//! with and without the line-of-sight gate.
//!
//! Run: `cargo bench --bench concentration_bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gsl_core::Point3;
use gsl_environment::{EnvironmentSpec, OccupancyGrid};
use gsl_olfactory::concentration::{estimate, filament_contribution};
use gsl_olfactory::{Filament, IterationHeader};

fn header() -> IterationHeader {
    IterationHeader {
        filament_moles: 5e-5,
        total_moles_all_gases: 4.09e-5,
    }
}

/// Pluma determinística em torno de (5, 5, 2)
fn plume(count: usize) -> Vec<Filament> {
    (0..count)
        .map(|i| {
            let k = i as f64;
            let position = Point3::new(
                5.0 + (k * 0.37).sin() * 1.5,
                5.0 + (k * 0.53).cos() * 1.5,
                2.0 + (k * 0.11).sin() * 0.5,
            );
            Filament::new(i as i64, position, 10.0 + (i % 30) as f64)
        })
        .collect()
}

/// Benchmark a single filament contribution
fn bench_contribution(c: &mut Criterion) {
    let filament = Filament::new(0, Point3::new(5.0, 5.0, 2.0), 20.0);
    let position = Point3::new(5.1, 5.0, 2.0);
    let header = header();

    c.bench_function("filament_contribution", |b| {
        b.iter(|| black_box(filament_contribution(black_box(&position), &filament, &header)))
    });
}

/// Benchmark the full estimator by plume size
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    let grid = OccupancyGrid::open(EnvironmentSpec::default()).unwrap();
    let position = Point3::new(5.0, 5.0, 2.0);
    let header = header();

    for count in [100, 1_000, 10_000] {
        let filaments = plume(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &filaments, |b, filaments| {
            b.iter(|| black_box(estimate(black_box(&position), filaments, &header, &grid)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_contribution, bench_estimate);

criterion_main!(benches);
