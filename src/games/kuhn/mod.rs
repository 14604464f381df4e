//! Kuhn Poker implementation for CFR validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because it has a known, mathematically proven Nash equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack < Queen < King
//! - 2 players, each antes `ante` chips
//! - Each player receives 1 card
//! - Player 0 acts first: Check or Bet (`bet` chips)
//! - At most one bet; the player facing it calls or folds
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! Action index 0 is check/call (`c`), index 1 is bet (`b`) or fold (`f`).
//!
//! ```text
//! P0
//! ├── c
//! │   └── P1
//! │       ├── c → Showdown
//! │       └── b
//! │           └── P0
//! │               ├── c → Showdown (called)
//! │               └── f → P1 wins
//! └── b
//!     └── P1
//!         ├── c → Showdown (called)
//!         └── f → P0 wins
//! ```
//!
//! ## Known Nash Equilibrium (ante 1, bet 1)
//!
//! - **Player 0 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 0 with Queen**: Always Check
//! - **Player 0 with King**: Bet with probability 3α
//! - **Player 1 facing Bet with Jack**: Always Fold
//! - **Player 1 facing Bet with Queen**: Call with probability 1/3
//! - **Player 1 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 0 EV = -1/18 ≈ -0.0556

pub mod output;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::config::ConfigError;
use crate::cfr::game::{Game, GameError};

pub use output::{action_labels, format_strategy_table, StrategyEntry, StrategyReport};

/// Stakes for a Kuhn game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KuhnConfig {
    /// Forced contribution of each player before the cards are dealt.
    #[serde(default = "default_stake")]
    pub ante: f64,
    /// Size of the single bet (and of the call).
    #[serde(default = "default_stake")]
    pub bet: f64,
}

fn default_stake() -> f64 {
    1.0
}

impl Default for KuhnConfig {
    fn default() -> Self {
        Self {
            ante: 1.0,
            bet: 1.0,
        }
    }
}

impl KuhnConfig {
    /// Check both stakes are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("ante", self.ante), ("bet", self.bet)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidStake { field, value });
            }
        }
        Ok(())
    }
}

/// A card in the three-card deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Card {
    /// Lowest card.
    Jack,
    /// Middle card.
    Queen,
    /// Highest card.
    King,
}

impl Card {
    /// The deck in rank order.
    pub const ALL: [Card; 3] = [Card::Jack, Card::Queen, Card::King];

    /// Single-letter name used in infoset keys.
    pub fn symbol(self) -> char {
        match self {
            Card::Jack => 'J',
            Card::Queen => 'Q',
            Card::King => 'K',
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Private cards: `deal[0]` belongs to player 0, `deal[1]` to player 1.
pub type KuhnDeal = [Card; 2];

/// A deal plus the public action sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KuhnHistory {
    /// Cards dealt to each player.
    pub cards: KuhnDeal,
    /// Actions so far: `c` check/call, `b` bet, `f` fold.
    pub seq: String,
}

impl KuhnHistory {
    /// Whether the player to act is facing a bet.
    pub fn facing_bet(&self) -> bool {
        self.seq.ends_with('b')
    }
}

impl fmt::Display for KuhnHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P0:{} P1:{} History:{}", self.cards[0], self.cards[1], self.seq)
    }
}

const TERMINALS: [&str; 5] = ["cc", "bc", "bf", "cbc", "cbf"];

/// Kuhn Poker game.
#[derive(Debug, Clone, Default)]
pub struct KuhnPoker {
    config: KuhnConfig,
}

impl KuhnPoker {
    /// Create a game with ante 1 and bet 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game with custom stakes.
    pub fn with_config(config: KuhnConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The stakes of this game.
    pub fn config(&self) -> &KuhnConfig {
        &self.config
    }

    /// Chips each player has put in over the sequence `seq`.
    fn contributions(&self, seq: &str) -> [f64; 2] {
        let mut pot = [self.config.ante; 2];
        let mut bet_open = false;
        for (i, action) in seq.chars().enumerate() {
            let player = i % 2;
            match action {
                'b' => {
                    pot[player] += self.config.bet;
                    bet_open = true;
                }
                'c' if bet_open => {
                    pot[player] += self.config.bet;
                    bet_open = false;
                }
                _ => {}
            }
        }
        pot
    }
}

impl Game for KuhnPoker {
    type Deal = KuhnDeal;
    type History = KuhnHistory;

    fn deals(&self) -> Vec<KuhnDeal> {
        let mut deals = Vec::with_capacity(6);
        for &first in &Card::ALL {
            for &second in &Card::ALL {
                if first != second {
                    deals.push([first, second]);
                }
            }
        }
        deals
    }

    fn initial_history(&self, deal: &KuhnDeal) -> KuhnHistory {
        KuhnHistory {
            cards: *deal,
            seq: String::new(),
        }
    }

    fn current_player(&self, history: &KuhnHistory) -> Option<usize> {
        if self.is_terminal(history) {
            None
        } else {
            Some(history.seq.len() % 2)
        }
    }

    fn is_terminal(&self, history: &KuhnHistory) -> bool {
        TERMINALS.contains(&history.seq.as_str())
    }

    fn terminal_utility(&self, history: &KuhnHistory) -> Result<f64, GameError> {
        if !self.is_terminal(history) {
            return Err(GameError::NotTerminal {
                history: history.to_string(),
            });
        }

        let pot = self.contributions(&history.seq);
        let winner = if let Some(folded) = history.seq.rfind('f') {
            // The player after the folder takes the pot
            1 - folded % 2
        } else if history.cards[0] > history.cards[1] {
            0
        } else {
            1
        };

        // Player 0 nets whatever player 1 put in, or loses its own share
        Ok(if winner == 0 { pot[1] } else { -pot[0] })
    }

    fn legal_actions(&self, history: &KuhnHistory) -> Vec<usize> {
        if self.is_terminal(history) {
            Vec::new()
        } else {
            vec![0, 1]
        }
    }

    fn next_history(&self, history: &KuhnHistory, action: usize) -> Result<KuhnHistory, GameError> {
        let illegal = || GameError::IllegalAction {
            history: history.to_string(),
            action,
        };

        if self.is_terminal(history) || !matches!(history.seq.as_str(), "" | "c" | "b" | "cb") {
            return Err(illegal());
        }

        let symbol = match (action, history.facing_bet()) {
            (0, _) => 'c',
            (1, false) => 'b',
            (1, true) => 'f',
            _ => return Err(illegal()),
        };

        let mut seq = history.seq.clone();
        seq.push(symbol);
        Ok(KuhnHistory {
            cards: history.cards,
            seq,
        })
    }

    fn infoset_key(&self, history: &KuhnHistory) -> (String, usize) {
        let player = history.seq.len() % 2;
        let key = format!("{}|{}", history.cards[player], history.seq);
        (key, self.legal_actions(history).len())
    }
}
