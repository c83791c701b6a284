use blind_clock::{
    catalog,
    clock::ClockConfig,
    countdown::CountdownEngine,
    notify::NullSink,
    prize::{PrizeDistribution, compute_prizes, prize_pool},
    storage::MemoryStore,
    tournament::Tournament,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::{hint::black_box, sync::Arc};
use tokio::time::{Duration, Instant};

fn fresh_tournament() -> Tournament {
    Tournament::new(
        ClockConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(NullSink),
    )
}

/// Benchmark a single engine tick at sub-second and whole-second offsets
fn bench_engine_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for offset_ms in [250u64, 1_000, 3_600].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}ms", offset_ms)),
            offset_ms,
            |b, &ms| {
                b.iter_batched(
                    || {
                        let t0 = Instant::now();
                        let mut engine = CountdownEngine::new(1200);
                        engine.start(t0);
                        (engine, t0)
                    },
                    |(mut engine, t0)| engine.tick(t0 + Duration::from_millis(ms)),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark a full level played out in 250ms polls
fn bench_level_playthrough(c: &mut Criterion) {
    c.bench_function("level_playthrough", |b| {
        b.iter_batched(
            || {
                let t0 = Instant::now();
                let mut engine = CountdownEngine::new(1200);
                engine.start(t0);
                (engine, t0)
            },
            |(mut engine, t0)| {
                for step in 1..=4_800u64 {
                    engine.tick(t0 + Duration::from_millis(step * 250));
                }
                engine
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark view generation (runs on every display refresh)
fn bench_view(c: &mut Criterion) {
    let mut tournament = fresh_tournament();
    for _ in 0..40 {
        tournament.add_buy_in();
    }
    c.bench_function("tournament_view", |b| b.iter(|| tournament.view()));
}

fn bench_prizes(c: &mut Criterion) {
    let distribution = PrizeDistribution::default();
    c.bench_function("compute_prizes", |b| {
        b.iter(|| {
            let pool = prize_pool(black_box(37), 20.0, black_box(11), 20.0);
            compute_prizes(pool, &distribution)
        });
    });
}

fn bench_preset_lookup(c: &mut Criterion) {
    c.bench_function("preset_lookup", |b| {
        b.iter(|| catalog::preset(black_box("Deep")));
    });
}

criterion_group!(countdown, bench_engine_tick, bench_level_playthrough);

criterion_group!(tournament_operations, bench_view, bench_prizes, bench_preset_lookup);

criterion_main!(countdown, tournament_operations);
