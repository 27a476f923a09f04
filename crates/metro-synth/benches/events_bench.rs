//! Criterion benchmarks for metro-synth builders and scheduling
//!
//! Run with: cargo bench -p metro-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use metro_synth::{EventRenderer, JourneyParams, Sequencer, SynthContext, showcase};

// ============================================================================
// Builders
// ============================================================================

fn bench_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("Builders");
    let renderer = EventRenderer::new(SynthContext::default());

    for event in showcase(1) {
        group.bench_with_input(
            BenchmarkId::new(event.kind.name(), format!("{:.1}s", event.duration_secs)),
            &event,
            |b, event| b.iter(|| black_box(renderer.render(black_box(event)))),
        );
    }

    group.finish();
}

// ============================================================================
// Sequencer
// ============================================================================

fn bench_sequencer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sequencer");

    for minutes in [10.0, 60.0] {
        group.bench_with_input(
            BenchmarkId::new("schedule", format!("{minutes}min")),
            &minutes,
            |b, &minutes| {
                b.iter(|| {
                    let seq = Sequencer::new(JourneyParams::default(), 42)
                        .with_budget_secs(minutes * 60.0);
                    black_box(seq.count())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_builders, bench_sequencer);
criterion_main!(benches);
