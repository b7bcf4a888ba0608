use criterion::{criterion_group, criterion_main, Criterion};
use nazori::domain::board::{presets, Board, PuyoAttr, PuyoCoord, PuyoType};
use nazori::domain::search::{count_up, solve_all_traces, ExplorationCategory, ExplorationTarget};
use nazori::domain::simulation::Simulator;
use std::hint::black_box;

fn rule1_1() -> Board {
    presets::preset("specialRule1/1")
        .and_then(Result::ok)
        .map(|b| b.with_next_all(PuyoType::Green))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Microbenchmarks
// ---------------------------------------------------------------------------

fn bench_resolve_rule1_1(c: &mut Criterion) {
    let sim = Simulator::from_board(&rule1_1()).unwrap();
    let trace: Vec<PuyoCoord> = [(5, 2), (6, 2)]
        .iter()
        .map(|(x, y)| PuyoCoord::from_xy(*x, *y).unwrap())
        .collect();
    c.bench_function("resolve_rule1_1", |b| {
        b.iter_batched(
            || sim.clone(),
            |mut s| black_box(s.resolve(&trace).unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_count_up_5(c: &mut Criterion) {
    c.bench_function("count_up_5", |b| b.iter(|| black_box(count_up(5).unwrap())));
}

// ---------------------------------------------------------------------------
// Full search
// ---------------------------------------------------------------------------

fn bench_solve_rule1_1(c: &mut Criterion) {
    let sim = Simulator::from_board(&rule1_1()).unwrap();
    let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green));
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    group.bench_function("solve_all_traces_rule1_1", |b| {
        b.iter(|| black_box(solve_all_traces(&sim, &target).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_resolve_rule1_1, bench_count_up_5, bench_solve_rule1_1);
criterion_main!(benches);
