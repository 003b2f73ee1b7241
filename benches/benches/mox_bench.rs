//! # MOX Sensor Benchmarks
//!
//! Measures the per-tick cost of the sensor facade: response-only ticks
//! (held concentration) and ticks that reload a snapshot.
//!
//! Run: `cargo bench --bench mox_bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gsl_core::{Point3, RateLimited};
use gsl_environment::{EnvironmentSpec, OccupancyGrid};
use gsl_olfactory::response::MoxResponse;
use gsl_olfactory::{
    CalibrationTables, Filament, GasType, IterationHeader, MemorySource, MoxConfig, MoxSensor, SensorModel, Snapshot,
};
use std::sync::Arc;

fn source(iterations: u32) -> MemorySource {
    let header = IterationHeader {
        filament_moles: 5e-5,
        total_moles_all_gases: 4.09e-5,
    };
    (0..iterations).fold(MemorySource::new(), |source, iteration| {
        let filaments = (0..500)
            .map(|i| {
                let k = (i + iteration as usize) as f64;
                Filament::new(i as i64, Point3::new(5.0 + (k * 0.1).sin(), 5.0 + (k * 0.2).cos(), 2.0), 20.0)
            })
            .collect();
        source.with_snapshot(Snapshot {
            iteration,
            filaments,
            header,
        })
    })
}

/// Benchmark the response model alone
fn bench_response(c: &mut Criterion) {
    let calibration = CalibrationTables::builtin()
        .lookup(SensorModel::Tgs2620, GasType::Ethanol)
        .unwrap();
    let mut response = MoxResponse::new(calibration);
    response.respond(0.25, 0.0);

    c.bench_function("mox_respond", |b| {
        b.iter(|| black_box(response.respond(black_box(0.25), black_box(12.5))))
    });
}

/// Benchmark sensor ticks through the rate gate at 100 Hz physics
fn bench_sensor_ticks(c: &mut Criterion) {
    let grid = Arc::new(OccupancyGrid::open(EnvironmentSpec::default()).unwrap());
    let sensor = MoxSensor::new(MoxConfig::default(), Box::new(source(20)), grid).unwrap();
    let mut sensor = RateLimited::new(sensor);
    let position = Point3::new(5.0, 5.0, 2.0);

    c.bench_function("mox_physics_step", |b| {
        b.iter(|| black_box(sensor.update(black_box(position), 0.01).unwrap()))
    });
}

criterion_group!(benches, bench_response, bench_sensor_ticks);

criterion_main!(benches);
