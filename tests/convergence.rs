//! Convergence properties of CFR and CFR+ on Kuhn poker.

use poker_gto::cfr::{Algorithm, CFRSolver};
use poker_gto::games::kuhn::{KuhnConfig, KuhnPoker};

const GAME_VALUE: f64 = -1.0 / 18.0;

fn exploitability_after(algorithm: Algorithm, iterations: u64) -> f64 {
    let mut solver = CFRSolver::with_algorithm(KuhnPoker::new(), algorithm, Some(42));
    solver.train(iterations).unwrap();
    solver.exploitability().unwrap()
}

#[test]
fn exploitability_does_not_grow_tenfold_iterations() {
    for algorithm in [Algorithm::Cfr, Algorithm::CfrPlus] {
        for n in [10, 100] {
            let short = exploitability_after(algorithm, n);
            let long = exploitability_after(algorithm, 10 * n);
            assert!(
                long <= short,
                "{algorithm}: exploitability rose from {short} at {n} to {long} at {}",
                10 * n
            );
        }
    }
}

#[test]
fn resumed_training_matches_single_run() {
    let mut split = CFRSolver::with_algorithm(KuhnPoker::new(), Algorithm::CfrPlus, None);
    split.train(200).unwrap();
    split.train(300).unwrap();

    let mut whole = CFRSolver::with_algorithm(KuhnPoker::new(), Algorithm::CfrPlus, None);
    whole.train(500).unwrap();

    assert_eq!(split.iteration(), 500);
    assert_eq!(split.average_strategies(), whole.average_strategies());
}

#[test]
fn cfr_plus_reaches_low_exploitability() {
    let exploitability = exploitability_after(Algorithm::CfrPlus, 1000);
    assert!(exploitability < 0.01, "exploitability {exploitability}");
}

#[test]
fn game_value_approaches_minus_one_eighteenth() {
    for algorithm in [Algorithm::Cfr, Algorithm::CfrPlus] {
        let mut solver = CFRSolver::with_algorithm(KuhnPoker::new(), algorithm, None);
        solver.train(5000).unwrap();
        let value = solver.game_value().unwrap();
        assert!(
            (value - GAME_VALUE).abs() < 0.005,
            "{algorithm}: game value {value}"
        );
    }
}

#[test]
fn exploitability_history_is_recorded() {
    let mut solver = CFRSolver::with_algorithm(KuhnPoker::new(), Algorithm::CfrPlus, None);
    let mut measured = Vec::new();
    for _ in 0..3 {
        solver.train(100).unwrap();
        measured.push(solver.measure_exploitability().unwrap());
    }

    let history = &solver.stats().exploitability_history;
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].iteration, 300);
    assert_eq!(solver.stats().exploitability, Some(measured[2]));
    assert!(measured[2] <= measured[0]);
}

#[test]
fn doubled_stakes_double_the_game_value() {
    let game = KuhnPoker::with_config(KuhnConfig {
        ante: 2.0,
        bet: 2.0,
    })
    .unwrap();
    let mut solver = CFRSolver::with_algorithm(game, Algorithm::CfrPlus, None);
    solver.train(2000).unwrap();

    let value = solver.game_value().unwrap();
    assert!((value - 2.0 * GAME_VALUE).abs() < 0.02, "game value {value}");
    assert!(solver.exploitability().unwrap() < 0.05);
}
