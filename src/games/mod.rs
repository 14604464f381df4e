//! Game implementations for the CFR solver.
//!
//! This module contains implementations of games that can be solved
//! using the generic CFR solver. These serve as:
//!
//! 1. **Validation**: Games with known Nash equilibria (like Kuhn Poker) verify
//!    that the CFR implementation is correct.
//!
//! 2. **Examples**: Demonstrate how to implement the `Game` trait for new games.
//!
//! 3. **Benchmarks**: Provide standardized games for performance testing.
//!
//! ## Available Games
//!
//! - [`kuhn`]: Kuhn Poker - 3-card single-bet poker with configurable stakes
//! - [`random_tree`]: Seeded random zero-sum games of configurable shape
//!
//! ## Adding New Games
//!
//! To add a new game:
//!
//! 1. Create a new module under `src/games/`
//! 2. Define deal and history types
//! 3. Implement the `Game` trait
//! 4. Add tests that check zero-sum payoffs and contract errors
//!
//! See the [`kuhn`] module for a complete example.

pub mod kuhn;
pub mod random_tree;
