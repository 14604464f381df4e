//! Benchmarks for CFR solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use poker_gto::cfr::{Algorithm, CFRConfig, CFRSolver};
use poker_gto::games::kuhn::KuhnPoker;
use poker_gto::games::random_tree::{RandomTreeConfig, RandomTreeGame};

fn kuhn_iteration_benchmark(c: &mut Criterion) {
    let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::default()).unwrap();

    c.bench_function("kuhn_single_iteration", |b| {
        b.iter(|| {
            solver.run_iteration().unwrap();
            black_box(solver.iteration())
        })
    });
}

fn kuhn_1000_iterations_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("kuhn_1000_iterations");
    for algorithm in [Algorithm::Cfr, Algorithm::CfrPlus] {
        group.bench_function(algorithm.to_string(), |b| {
            b.iter(|| {
                let mut solver = CFRSolver::with_algorithm(KuhnPoker::new(), algorithm, None);
                solver.train(black_box(1000)).unwrap();
                black_box(solver.num_info_sets())
            })
        });
    }
    group.finish();
}

fn kuhn_exploitability_benchmark(c: &mut Criterion) {
    let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::default()).unwrap();
    solver.train(1000).unwrap();

    c.bench_function("kuhn_exploitability", |b| {
        b.iter(|| black_box(solver.exploitability().unwrap()))
    });
}

fn random_tree_benchmark(c: &mut Criterion) {
    let game = RandomTreeGame::new(RandomTreeConfig {
        signals: 4,
        depth: 6,
        max_actions: 3,
        seed: 42,
    })
    .unwrap();
    let mut solver = CFRSolver::new(game, CFRConfig::default()).unwrap();

    c.bench_function("random_tree_single_iteration", |b| {
        b.iter(|| {
            solver.run_iteration().unwrap();
            black_box(solver.iteration())
        })
    });
}

criterion_group!(
    benches,
    kuhn_iteration_benchmark,
    kuhn_1000_iterations_benchmark,
    kuhn_exploitability_benchmark,
    random_tree_benchmark
);
criterion_main!(benches);
