//! # Poker GTO
//!
//! Counterfactual Regret Minimization (CFR and CFR+) for computing
//! approximate Nash equilibrium strategies in two-player zero-sum
//! extensive-form games with imperfect information.
//!
//! ## Features
//!
//! - **Generic CFR Engine**: Works with any game implementing the `Game` trait
//! - **Two Variants**: vanilla CFR and CFR+ (regret flooring, linear averaging)
//! - **Exact Evaluation**: best response, exploitability and game value
//! - **Reports**: labelled strategy tables and JSON export for Kuhn poker
//!
//! ## Quick Start
//!
//! ```
//! use poker_gto::cfr::{CFRConfig, CFRSolver};
//! use poker_gto::games::kuhn::{format_strategy_table, KuhnPoker};
//!
//! let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::default()).unwrap();
//! solver.train(1_000).unwrap();
//!
//! let table = format_strategy_table(&solver.average_strategies());
//! assert!(table.contains("K|b"));
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR algorithm, storage and evaluation
//! - [`games`]: Game implementations (Kuhn poker, seeded random trees)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      CFR Solver (Generic)                       │
//! │  - Regret accumulation    - Strategy averaging                  │
//! │  - Full traversal         - Best response / exploitability      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Game trait
//!                               ▼
//!              ┌────────────────┴────────────────┐
//!              │                                 │
//!              ▼                                 ▼
//!        ┌───────────┐                    ┌─────────────┐
//!        │   Kuhn    │                    │ Random tree │
//!        │   Poker   │                    │   (seeded)  │
//!        └───────────┘                    └─────────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// This is the core module containing the generic CFR algorithm.
pub mod cfr;

/// Game implementations module.
///
/// Contains Kuhn poker and a seeded synthetic game for testing.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{Algorithm, CFRConfig, CFRSolver, CFRStats, Game, SolverError};
