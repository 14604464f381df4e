//! Seeded random zero-sum games.
//!
//! Each player privately draws one of `signals` values, then the players
//! alternate for `depth` moves. The branching factor of every move is fixed
//! per depth, and every (signal pair, action sequence) leaf gets a payoff in
//! `[-1, 1)`. The same seed always builds the same game, which makes these
//! trees useful for exercising the solver on shapes other than Kuhn poker.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::cfr::config::ConfigError;
use crate::cfr::game::{Game, GameError};

/// Shape of a random game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomTreeConfig {
    /// Number of private signals per player.
    pub signals: usize,
    /// Number of moves before the game ends.
    pub depth: usize,
    /// Upper bound on the branching factor of a move.
    pub max_actions: usize,
    /// Seed for branching factors and payoffs.
    pub seed: u64,
}

impl Default for RandomTreeConfig {
    fn default() -> Self {
        Self {
            signals: 3,
            depth: 4,
            max_actions: 3,
            seed: 42,
        }
    }
}

impl RandomTreeConfig {
    /// Check every size parameter is within its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("signals", self.signals, 1, 8),
            ("depth", self.depth, 1, 8),
            ("max_actions", self.max_actions, 2, 4),
        ];
        for (field, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Private signals of both players.
pub type SignalDeal = [usize; 2];

/// A deal plus the actions taken so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomTreeHistory {
    /// Signal of each player.
    pub signals: SignalDeal,
    /// Action index taken at each depth.
    pub seq: Vec<usize>,
}

/// A randomly generated two-player zero-sum game.
#[derive(Debug, Clone)]
pub struct RandomTreeGame {
    config: RandomTreeConfig,
    /// Branching factor at each depth.
    branching: Vec<usize>,
    /// Number of leaves under one signal pair.
    leaves: usize,
    /// Player-0 payoffs, indexed by signal pair then leaf.
    payoffs: Vec<f64>,
}

impl RandomTreeGame {
    /// Build the game described by `config`.
    pub fn new(config: RandomTreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let branching: Vec<usize> = (0..config.depth)
            .map(|_| rng.gen_range(2..=config.max_actions))
            .collect();
        let leaves = branching.iter().product::<usize>();

        let total = config.signals * config.signals * leaves;
        let payoffs: Vec<f64> = (0..total).map(|_| rng.gen_range(-1.0..1.0)).collect();

        Ok(Self {
            config,
            branching,
            leaves,
            payoffs,
        })
    }

    /// The configuration this game was built from.
    pub fn config(&self) -> &RandomTreeConfig {
        &self.config
    }

    /// Branching factor at each depth.
    pub fn branching(&self) -> &[usize] {
        &self.branching
    }

    fn leaf_index(&self, seq: &[usize]) -> usize {
        seq.iter()
            .zip(&self.branching)
            .fold(0, |index, (&action, &width)| index * width + action)
    }

    fn describe(history: &RandomTreeHistory) -> String {
        format!("{:?}", history)
    }
}

impl Game for RandomTreeGame {
    type Deal = SignalDeal;
    type History = RandomTreeHistory;

    fn deals(&self) -> Vec<SignalDeal> {
        let n = self.config.signals;
        (0..n)
            .flat_map(|first| (0..n).map(move |second| [first, second]))
            .collect()
    }

    fn initial_history(&self, deal: &SignalDeal) -> RandomTreeHistory {
        RandomTreeHistory {
            signals: *deal,
            seq: Vec::with_capacity(self.config.depth),
        }
    }

    fn current_player(&self, history: &RandomTreeHistory) -> Option<usize> {
        if self.is_terminal(history) {
            None
        } else {
            Some(history.seq.len() % 2)
        }
    }

    fn is_terminal(&self, history: &RandomTreeHistory) -> bool {
        history.seq.len() >= self.config.depth
    }

    fn terminal_utility(&self, history: &RandomTreeHistory) -> Result<f64, GameError> {
        if history.seq.len() != self.config.depth {
            return Err(GameError::NotTerminal {
                history: Self::describe(history),
            });
        }

        let [first, second] = history.signals;
        let index = (first * self.config.signals + second) * self.leaves
            + self.leaf_index(&history.seq);
        self.payoffs
            .get(index)
            .copied()
            .ok_or_else(|| GameError::UnexpectedTerminal {
                history: Self::describe(history),
            })
    }

    fn legal_actions(&self, history: &RandomTreeHistory) -> Vec<usize> {
        match self.branching.get(history.seq.len()) {
            Some(&width) => (0..width).collect(),
            None => Vec::new(),
        }
    }

    fn next_history(
        &self,
        history: &RandomTreeHistory,
        action: usize,
    ) -> Result<RandomTreeHistory, GameError> {
        match self.branching.get(history.seq.len()) {
            Some(&width) if action < width => {
                let mut next = history.clone();
                next.seq.push(action);
                Ok(next)
            }
            _ => Err(GameError::IllegalAction {
                history: Self::describe(history),
                action,
            }),
        }
    }

    fn infoset_key(&self, history: &RandomTreeHistory) -> (String, usize) {
        let player = history.seq.len() % 2;
        let seq: Vec<String> = history.seq.iter().map(|a| a.to_string()).collect();
        let key = format!("s{}|{}", history.signals[player], seq.join("."));
        (key, self.legal_actions(history).len())
    }
}
