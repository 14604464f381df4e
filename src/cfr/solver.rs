//! Counterfactual Regret Minimization solver.
//!
//! This module implements full-traversal CFR in two variants:
//! - **Vanilla CFR**: signed cumulative regrets, every iteration weighted equally
//! - **CFR+**: regrets floored at zero, iteration `t` weighted by `t` in the average
//!
//! Every iteration enumerates every chance outcome of the game and walks the
//! whole tree depth-first. There is no sampling, so two runs with the same
//! game, algorithm and iteration count produce identical strategies.
//!
//! The solver is generic over any game that implements the `Game` trait.

use std::ops::ControlFlow;
use std::time::Instant;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::cfr::best_response;
use crate::cfr::config::{Algorithm, CFRConfig, CFRStats, ConfigError};
use crate::cfr::error::SolverError;
use crate::cfr::game::{
    checked_next, checked_utility, decision_point, perspective, DecisionPoint, Game, NUM_PLAYERS,
};
use crate::cfr::storage::InfoSetTable;

/// The main CFR solver.
///
/// This struct manages the CFR algorithm for any game implementing the `Game` trait.
/// It owns the infoset table exclusively and mutates it in place on every visit.
///
/// # Type Parameters
/// - `G`: The game type implementing the `Game` trait
///
/// # Example
/// ```
/// use poker_gto::cfr::{CFRConfig, CFRSolver};
/// use poker_gto::games::kuhn::KuhnPoker;
///
/// let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::default()).unwrap();
/// solver.train(1_000).unwrap();
///
/// let strategies = solver.average_strategies();
/// assert_eq!(strategies.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct CFRSolver<G: Game> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: CFRConfig,

    /// Regret and strategy accumulators per infoset.
    storage: InfoSetTable,

    /// Iterations completed so far (across all `train` calls).
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,
}

impl<G: Game> CFRSolver<G> {
    /// Create a new CFR solver for the given game.
    ///
    /// # Arguments
    /// * `game` - The game to solve
    /// * `config` - Configuration options for the solver
    pub fn new(game: G, config: CFRConfig) -> Result<Self, SolverError> {
        config.validate()?;

        Ok(Self {
            game,
            config,
            storage: InfoSetTable::new(),
            iteration: 0,
            stats: CFRStats::new(),
        })
    }

    /// Create a solver from an algorithm and optional seed, with default limits.
    pub fn with_algorithm(game: G, algorithm: Algorithm, seed: Option<u64>) -> Self {
        Self {
            game,
            config: CFRConfig {
                algorithm,
                seed,
                ..CFRConfig::default()
            },
            storage: InfoSetTable::new(),
            iteration: 0,
            stats: CFRStats::new(),
        }
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// Each iteration traverses the full tree once per chance outcome.
    /// Training resumes where a previous call stopped, so CFR+ weights keep
    /// growing across calls.
    ///
    /// # Errors
    /// `ConfigError::ZeroIterations` for `iterations == 0`; any contract
    /// violation by the game aborts the run and leaves the table unusable.
    pub fn train(&mut self, iterations: u64) -> Result<&CFRStats, SolverError> {
        self.train_with_callback(iterations, iterations, |_| ControlFlow::Continue(()))
    }

    /// Train with a callback for progress tracking.
    ///
    /// The callback runs every `callback_interval` iterations and once more
    /// after the final iteration. Returning `ControlFlow::Break` stops
    /// training at that iteration boundary.
    ///
    /// # Arguments
    /// * `iterations` - Maximum number of iterations to run
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Function called with the current statistics
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&CFRStats, SolverError>
    where
        F: FnMut(&CFRStats) -> ControlFlow<()>,
    {
        if iterations == 0 {
            return Err(ConfigError::ZeroIterations.into());
        }

        let deals = self.deals()?;
        let interval = callback_interval.max(1);
        let start_time = Instant::now();

        info!(
            "training {} for {} iterations over {} deals",
            self.config.algorithm,
            iterations,
            deals.len()
        );

        let mut completed = 0;
        while completed < iterations {
            self.run_pass(&deals)?;
            completed += 1;

            if completed % interval == 0 || completed == iterations {
                self.update_stats(start_time, completed);
                debug!(
                    "iteration {} | info sets {}",
                    self.iteration,
                    self.stats.info_sets
                );
                if callback(&self.stats).is_break() {
                    info!("training stopped by callback at iteration {}", self.iteration);
                    break;
                }
            }
        }

        self.update_stats(start_time, completed);
        info!(
            "trained {} iterations in {:.2}s ({} info sets)",
            completed, self.stats.elapsed_seconds, self.stats.info_sets
        );

        Ok(&self.stats)
    }

    /// Run a single iteration: one traversal per chance outcome.
    pub fn run_iteration(&mut self) -> Result<(), SolverError> {
        let deals = self.deals()?;
        self.run_pass(&deals)
    }

    fn deals(&self) -> Result<Vec<G::Deal>, SolverError> {
        let deals = self.game.deals();
        if deals.is_empty() {
            return Err(SolverError::NoDeals);
        }
        Ok(deals)
    }

    fn run_pass(&mut self, deals: &[G::Deal]) -> Result<(), SolverError> {
        self.iteration += 1;
        let weight = self.config.algorithm.iteration_weight(self.iteration);

        for deal in deals {
            let root = self.game.initial_history(deal);
            self.cfr(&root, [1.0; NUM_PLAYERS], weight, 0)?;
        }

        Ok(())
    }

    fn update_stats(&mut self, start_time: Instant, iterations_run: u64) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.storage.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate(iterations_run);
    }

    /// Core CFR recursion.
    ///
    /// Returns the value of `history` from the perspective of its acting
    /// player (player 0 at terminals). `reach` holds each player's own
    /// probability of playing to this history.
    fn cfr(
        &mut self,
        history: &G::History,
        reach: [f64; NUM_PLAYERS],
        weight: f64,
        depth: usize,
    ) -> Result<f64, SolverError> {
        // Terminal node: return payoff
        if self.game.is_terminal(history) {
            return checked_utility(&self.game, history);
        }

        if depth >= self.config.max_depth {
            return Err(SolverError::DepthExceeded {
                max_depth: self.config.max_depth,
                history: format!("{:?}", history),
            });
        }

        let DecisionPoint {
            player,
            key,
            actions,
        } = decision_point(&self.game, history)?;
        let opponent = 1 - player;
        let algorithm = self.config.algorithm;

        let strategy = self
            .storage
            .get_or_insert(&key, actions.len())?
            .get_strategy(reach[player], algorithm);

        // Explore all actions
        let mut action_utils = vec![0.0; actions.len()];
        let mut util = 0.0;
        for (i, &action) in actions.iter().enumerate() {
            let next = checked_next(&self.game, history, action)?;

            let mut next_reach = reach;
            next_reach[player] *= strategy[i];

            let value = self.cfr(&next, next_reach, weight, depth + 1)?;
            // Zero-sum: flip sign whenever the value belongs to the other player
            action_utils[i] = if perspective(&self.game, &next) == Some(player) {
                value
            } else {
                -value
            };
            util += strategy[i] * action_utils[i];
        }

        // Counterfactual regret: weighted by the opponent's reach
        let regrets: Vec<f64> = action_utils
            .iter()
            .map(|&u| reach[opponent] * (u - util))
            .collect();

        let node = self.storage.get_or_insert(&key, actions.len())?;
        node.accumulate_regrets(&regrets, algorithm);
        node.accumulate_strategy(&strategy, weight * reach[opponent]);

        Ok(util)
    }

    /// Average strategy of every visited information set.
    ///
    /// Empty before training. Vectors are aligned with `legal_actions` order.
    pub fn average_strategies(&self) -> FxHashMap<String, Vec<f64>> {
        self.storage.average_strategies()
    }

    /// Average strategy of one information set, if it has been visited.
    pub fn average_strategy(&self, info_key: &str) -> Option<Vec<f64>> {
        self.storage.get(info_key).map(|node| node.average_strategy())
    }

    /// Current (regret-matched) strategy of one information set.
    pub fn current_strategy(&self, info_key: &str) -> Option<Vec<f64>> {
        self.storage.get(info_key).map(|node| node.current_strategy())
    }

    /// Exploitability of the current average strategy profile.
    ///
    /// Zero at a Nash equilibrium.
    pub fn exploitability(&self) -> Result<f64, SolverError> {
        best_response::exploitability(
            &self.game,
            &self.average_strategies(),
            self.config.max_depth,
        )
    }

    /// Compute exploitability and record it in the statistics.
    pub fn measure_exploitability(&mut self) -> Result<f64, SolverError> {
        let value = self.exploitability()?;
        debug!("iteration {} | exploitability {:.6}", self.iteration, value);
        self.stats.record_exploitability(self.iteration, value);
        Ok(value)
    }

    /// Expected player-0 payoff when both players use the average strategies.
    pub fn game_value(&self) -> Result<f64, SolverError> {
        best_response::expected_value(
            &self.game,
            &self.average_strategies(),
            self.config.max_depth,
        )
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.storage.len()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the storage for analysis.
    pub fn storage(&self) -> &InfoSetTable {
        &self.storage
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &CFRConfig {
        &self.config
    }

    /// Reset the solver to initial state.
    pub fn reset(&mut self) {
        self.storage.clear();
        self.iteration = 0;
        self.stats = CFRStats::new();
    }
}
