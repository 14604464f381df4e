//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides a generic, full-traversal implementation of CFR and
//! CFR+ for two-player zero-sum extensive-form games.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Playing the next iteration proportionally to positive regret
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! # Supported Variants
//!
//! - **Vanilla CFR**: signed cumulative regrets, every iteration weighted equally
//! - **CFR+**: regrets floored at zero, iteration `t` weighted by `t`
//!
//! # Example
//!
//! ```
//! use poker_gto::cfr::{Algorithm, CFRSolver};
//! use poker_gto::games::kuhn::KuhnPoker;
//!
//! let mut solver = CFRSolver::with_algorithm(KuhnPoker::new(), Algorithm::CfrPlus, Some(42));
//! let stats = solver.train(500).unwrap();
//! assert_eq!(stats.iterations, 500);
//!
//! let exploitability = solver.exploitability().unwrap();
//! assert!(exploitability < 0.05);
//! ```
//!
//! # Theory
//!
//! **Regret**: counterfactual value of an action minus that of the current strategy,
//! weighted by the probability that the opponent plays to the decision point.
//! ```text
//! Regret(a) = reach_opp * (Value(a) - Value(current_strategy))
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)

pub mod best_response;
pub mod config;
pub mod error;
pub mod game;
pub mod solver;
pub mod storage;

// Re-export main types for convenient access
pub use best_response::{BestResponse, StrategyMap};
pub use config::{Algorithm, CFRConfig, CFRStats, ConfigError, ExploitabilityPoint};
pub use error::SolverError;
pub use game::{Game, GameError, NUM_PLAYERS};
pub use solver::CFRSolver;
pub use storage::{InfoSet, InfoSetTable};
