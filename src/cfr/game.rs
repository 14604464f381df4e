//! Game trait definition for CFR solver.
//!
//! Any two-player zero-sum game that implements the `Game` trait can be solved
//! using CFR. This provides a clean abstraction between the algorithm and
//! specific games: the solver never looks inside a history, it only asks the
//! game the questions below.

use std::fmt::Debug;

use crate::cfr::error::SolverError;

/// Number of players supported by the solver.
pub const NUM_PLAYERS: usize = 2;

/// Errors a game definition reports when asked about a history it cannot handle.
///
/// These always indicate a bug in the game (or in the caller feeding it
/// histories), never a condition the solver can recover from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// `terminal_utility` was called on a history that is still in play.
    #[error("history {history} is not terminal")]
    NotTerminal {
        /// The offending history.
        history: String,
    },

    /// The history claims to be terminal but matches no known ending.
    #[error("unexpected terminal sequence {history}")]
    UnexpectedTerminal {
        /// The offending history.
        history: String,
    },

    /// An action index outside `legal_actions` was applied.
    #[error("action {action} is not legal at {history}")]
    IllegalAction {
        /// The history the action was applied to.
        history: String,
        /// The rejected action index.
        action: usize,
    },
}

/// The main Game trait that defines the interface for any game.
///
/// Implementations must be pure: every method is deterministic given its
/// inputs and has no side effects. Histories are immutable values; a
/// transition returns a new history.
///
/// # Type Parameters
/// - `Deal`: one chance outcome (for example the private cards of both players)
/// - `History`: a deal plus the public action sequence taken so far
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type Deal = MyDeal;
///     type History = MyHistory;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game: Clone + Send + Sync {
    /// A single chance outcome.
    type Deal: Clone + Debug;

    /// A path through the game tree.
    type History: Clone + Debug;

    /// Enumerate every chance outcome, without duplicates.
    ///
    /// Outcomes are assumed to be equally likely.
    fn deals(&self) -> Vec<Self::Deal>;

    /// The root history for a chance outcome.
    fn initial_history(&self, deal: &Self::Deal) -> Self::History;

    /// The player to act, or `None` at terminal histories.
    fn current_player(&self, history: &Self::History) -> Option<usize>;

    /// True iff no further action is legal.
    fn is_terminal(&self, history: &Self::History) -> bool;

    /// Payoff to player 0 at a terminal history.
    ///
    /// Player 1's payoff is the negation; the solver performs the sign flip.
    fn terminal_utility(&self, history: &Self::History) -> Result<f64, GameError>;

    /// Action indices available at this decision point, `0..num_actions`.
    ///
    /// The order must be stable so strategy vectors line up across visits.
    fn legal_actions(&self, history: &Self::History) -> Vec<usize>;

    /// Apply an action index and return the resulting history.
    fn next_history(&self, history: &Self::History, action: usize)
        -> Result<Self::History, GameError>;

    /// Information set key for the acting player, plus the branching factor.
    ///
    /// The key must hide everything the acting player cannot observe. The
    /// action count for a given key must be the same every time it recurs.
    fn infoset_key(&self, history: &Self::History) -> (String, usize);
}

/// A validated non-terminal node: who acts, where, and with which actions.
#[derive(Debug, Clone)]
pub(crate) struct DecisionPoint {
    pub player: usize,
    pub key: String,
    pub actions: Vec<usize>,
}

/// Query the game at a non-terminal history and check the answers agree
/// with each other.
pub(crate) fn decision_point<G: Game>(
    game: &G,
    history: &G::History,
) -> Result<DecisionPoint, SolverError> {
    let player = game
        .current_player(history)
        .ok_or_else(|| SolverError::NoPlayerToAct {
            history: format!("{:?}", history),
        })?;

    if player >= NUM_PLAYERS {
        return Err(SolverError::InvalidPlayer {
            history: format!("{:?}", history),
            player,
        });
    }

    let (key, num_actions) = game.infoset_key(history);
    if num_actions == 0 {
        return Err(SolverError::EmptyInfoSet { key });
    }

    let actions = game.legal_actions(history);
    if actions.len() != num_actions {
        return Err(SolverError::LegalActionsMismatch {
            key,
            legal: actions.len(),
            num_actions,
        });
    }

    Ok(DecisionPoint {
        player,
        key,
        actions,
    })
}

/// Player-0 utility at a terminal history, with the history attached to any error.
pub(crate) fn checked_utility<G: Game>(game: &G, history: &G::History) -> Result<f64, SolverError> {
    game.terminal_utility(history)
        .map_err(|source| SolverError::Game {
            history: format!("{:?}", history),
            source,
        })
}

/// Apply an action, with the history attached to any error.
pub(crate) fn checked_next<G: Game>(
    game: &G,
    history: &G::History,
    action: usize,
) -> Result<G::History, SolverError> {
    game.next_history(history, action)
        .map_err(|source| SolverError::Game {
            history: format!("{:?}", history),
            source,
        })
}

/// The player whose perspective a history's value is expressed in.
///
/// Terminal values are player-0 payoffs; decision values belong to the
/// acting player.
pub(crate) fn perspective<G: Game>(game: &G, history: &G::History) -> Option<usize> {
    if game.is_terminal(history) {
        Some(0)
    } else {
        game.current_player(history)
    }
}
