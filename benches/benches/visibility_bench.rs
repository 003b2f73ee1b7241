//! # Visibility Benchmarks
//!
//! Measures the point-sampled line-of-sight test against occupancy grids.
//! Cost grows with `ceil(distance / cell_size) + 1` samples per query.
//!
//! Run: `cargo bench --bench visibility_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gsl_core::Point3;
use gsl_environment::{EnvironmentSpec, OccupancyGrid, is_visible};

fn walled_grid() -> OccupancyGrid {
    let mut grid = OccupancyGrid::open(EnvironmentSpec::default()).unwrap();
    for z in 0..50 {
        for y in 0..40 {
            grid.set(z, 25, y, true);
        }
    }
    grid
}

/// Benchmark visibility by segment length
fn bench_visibility_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_length");
    let grid = OccupancyGrid::open(EnvironmentSpec::default()).unwrap();
    let from = Point3::new(1.0, 1.0, 1.0);

    for length in [0.5, 2.0, 8.0] {
        let to = Point3::new(1.0 + length, 1.0, 1.0);
        group.bench_with_input(BenchmarkId::new("free", length), &to, |b, to| {
            b.iter(|| black_box(is_visible(black_box(&from), to, &grid)))
        });
    }

    group.finish();
}

/// Benchmark early exit on occluded segments
fn bench_visibility_occluded(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_occluded");
    let grid = walled_grid();
    let from = Point3::new(4.0, 2.0, 2.0);

    group.bench_function("blocked", |b| {
        let to = Point3::new(6.0, 2.0, 2.0);
        b.iter(|| black_box(is_visible(black_box(&from), &to, &grid)))
    });

    group.bench_function("around_wall", |b| {
        let to = Point3::new(6.0, 9.0, 2.0);
        b.iter(|| black_box(is_visible(black_box(&from), &to, &grid)))
    });

    group.finish();
}

criterion_group!(benches, bench_visibility_length, bench_visibility_occluded);

criterion_main!(benches);
