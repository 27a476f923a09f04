//! Criterion benchmarks for metro-core signal primitives
//!
//! Run with: cargo bench -p metro-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use metro_core::{
    ClickInterval, ClickShape, NoiseBand, PwmModulation, SweepShape, harmonic_sweep, noise,
    periodic_click, pwm,
};

const SAMPLE_RATE: f32 = 44100.0;
const DURATIONS: &[f32] = &[0.1, 1.0];

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("Noise");
    for &secs in DURATIONS {
        group.bench_with_input(BenchmarkId::new("band", secs), &secs, |b, &secs| {
            b.iter(|| {
                black_box(noise(
                    secs,
                    SAMPLE_RATE,
                    NoiseBand::band(40.0, 150.0),
                    0.3,
                    black_box(7),
                ))
            });
        });
    }
    group.finish();
}

fn bench_harmonic_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("HarmonicSweep");
    for &secs in DURATIONS {
        group.bench_with_input(BenchmarkId::new("4_partials", secs), &secs, |b, &secs| {
            b.iter(|| {
                black_box(harmonic_sweep(
                    secs,
                    SAMPLE_RATE,
                    250.0,
                    850.0,
                    SweepShape::Exponential,
                    &[1.0, 0.5, 0.3, 0.2],
                    0.2,
                ))
            });
        });
    }
    group.finish();
}

fn bench_pwm_and_clicks(c: &mut Criterion) {
    c.bench_function("pwm_1s", |b| {
        b.iter(|| {
            black_box(pwm(
                1.0,
                SAMPLE_RATE,
                (4000.0, 7000.0),
                PwmModulation::default(),
                0.02,
                3,
            ))
        });
    });
    c.bench_function("rail_joints_1s", |b| {
        let interval = ClickInterval::SpeedScaled {
            spacing_m: 18.0,
            speed_kmh: 70.0,
        };
        let shape = ClickShape::Double {
            spacing_secs: 0.12,
            decay_secs: 0.006,
        };
        b.iter(|| black_box(periodic_click(1.0, SAMPLE_RATE, interval, shape, 0.2, 5)));
    });
}

criterion_group!(benches, bench_noise, bench_harmonic_sweep, bench_pwm_and_clicks);
criterion_main!(benches);
