//! Errors raised while training or evaluating strategies.
//!
//! Every variant aborts the run. A broken game contract cannot produce a
//! meaningful strategy, so nothing here is retried or masked.

use crate::cfr::config::ConfigError;
use crate::cfr::game::GameError;

/// Errors returned by [`CFRSolver`](crate::cfr::CFRSolver) and the best-response evaluator.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The configuration was rejected before any traversal started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The game rejected a transition or could not score a terminal.
    #[error("game contract violated at {history}: {source}")]
    Game {
        /// Debug rendering of the history being processed.
        history: String,
        /// The game's own error.
        source: GameError,
    },

    /// A non-terminal history has nobody to act.
    #[error("no player to act at non-terminal history {history}")]
    NoPlayerToAct {
        /// Debug rendering of the history.
        history: String,
    },

    /// The game named a player outside `0..2`.
    #[error("player {player} is out of range at {history}")]
    InvalidPlayer {
        /// Debug rendering of the history.
        history: String,
        /// The reported player index.
        player: usize,
    },

    /// An information set reported zero actions.
    #[error("info set {key} has no actions")]
    EmptyInfoSet {
        /// The infoset key.
        key: String,
    },

    /// An information set recurred with a different branching factor.
    #[error("info set {key} reported {found} actions, previously {expected}")]
    ActionCountMismatch {
        /// The infoset key.
        key: String,
        /// Action count fixed at first creation.
        expected: usize,
        /// Action count reported now.
        found: usize,
    },

    /// `legal_actions` and `infoset_key` disagree on the branching factor.
    #[error("info set {key} has {legal} legal actions but reports {num_actions}")]
    LegalActionsMismatch {
        /// The infoset key.
        key: String,
        /// Number of actions from `legal_actions`.
        legal: usize,
        /// Number of actions from `infoset_key`.
        num_actions: usize,
    },

    /// Traversal went deeper than the configured limit.
    #[error("traversal exceeded maximum depth {max_depth} at {history}")]
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
        /// Debug rendering of the history where the limit was hit.
        history: String,
    },

    /// The game enumerated no chance outcomes.
    #[error("game has no deals")]
    NoDeals,
}
