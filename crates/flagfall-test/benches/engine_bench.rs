//! Benchmarks for clock engine operations

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flagfall_core::Side;
use flagfall_engine::ClockEngine;
use flagfall_test::{FuzzerConfig, GameFuzzer};

fn bench_engine_tick(c: &mut Criterion) {
    let mut engine = ClockEngine::new();
    engine.apply_settings(1.0e9, 0.0);
    engine.press(Side::Top);
    let dt = Duration::from_millis(100);

    c.bench_function("engine_tick", |b| {
        b.iter(|| {
            engine.tick(black_box(dt));
            black_box(engine.remaining(Side::Bottom))
        })
    });
}

fn bench_engine_press(c: &mut Criterion) {
    let mut engine = ClockEngine::new();
    engine.apply_settings(600.0, 2.0);
    let mut side = Side::Top;

    c.bench_function("engine_press", |b| {
        b.iter(|| {
            black_box(engine.press(black_box(side)));
            side = side.opponent();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut engine = ClockEngine::new();
    engine.press(Side::Bottom);

    c.bench_function("engine_snapshot", |b| b.iter(|| black_box(engine.snapshot())));
}

fn bench_fuzz_game(c: &mut Criterion) {
    c.bench_function("fuzz_game_1000_steps", |b| {
        b.iter(|| black_box(GameFuzzer::new(FuzzerConfig::default()).run()))
    });
}

criterion_group!(
    benches,
    bench_engine_tick,
    bench_engine_press,
    bench_snapshot,
    bench_fuzz_game,
);
criterion_main!(benches);
