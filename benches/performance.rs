//! Performance benchmarks for the lifting engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rewind::{ActionId, HistoryState, LiftedAction, LiftingEngine, SharedReducer};
use std::sync::Arc;

type Action = u8;

fn counter(state: &i64, action: &Action) -> i64 {
    state + i64::from(*action)
}

fn engine(max_age: Option<usize>) -> LiftingEngine<i64, Action> {
    let reducer: SharedReducer<i64, Action> = Arc::new(counter);
    LiftingEngine::new(reducer, 0, max_age).unwrap()
}

fn history_of_depth(
    engine: &LiftingEngine<i64, Action>,
    depth: usize,
) -> HistoryState<i64, Action> {
    let mut state = engine.initial_history();
    for _ in 0..depth {
        state = engine.transition(&state, &LiftedAction::perform(1));
    }
    state
}

/// Appending to histories of varying depth: only the new entry is computed,
/// so cost should be dominated by the structural copy.
fn bench_perform(c: &mut Criterion) {
    let mut group = c.benchmark_group("perform");

    for depth in [10, 100, 1000] {
        let engine = engine(None);
        let state = history_of_depth(&engine, depth);
        group.bench_with_input(BenchmarkId::new("history_depth", depth), &depth, |b, _| {
            b.iter(|| black_box(engine.transition(&state, &LiftedAction::perform(1))));
        });
    }

    group.finish();
}

/// Toggling near the front of the history forces a near-full recompute.
fn bench_toggle_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_recompute");

    for depth in [10, 100, 1000] {
        let engine = engine(None);
        let state = history_of_depth(&engine, depth);
        let toggle = LiftedAction::ToggleAction { id: ActionId(1) };
        group.bench_with_input(BenchmarkId::new("history_depth", depth), &depth, |b, _| {
            b.iter(|| black_box(engine.transition(&state, &toggle)));
        });
    }

    group.finish();
}

/// Steady-state dispatch under a bounded history, auto-commit included.
fn bench_bounded_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_dispatch");

    for max_age in [10, 100] {
        let engine = engine(Some(max_age));
        let state = history_of_depth(&engine, max_age - 1);
        group.bench_with_input(BenchmarkId::new("max_age", max_age), &max_age, |b, _| {
            b.iter(|| black_box(engine.transition(&state, &LiftedAction::perform(1))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_perform,
    bench_toggle_recompute,
    bench_bounded_dispatch
);
criterion_main!(benches);
