//! Exact best response, exploitability and game value.
//!
//! The exploiter cannot see the opponent's private information, so its best
//! response is chosen per information set: every exploiter history in an
//! infoset is collected with its weight (chance probability times the
//! opponent's reach), and the action with the highest summed value wins.
//! This assumes perfect recall, which every game the solver accepts has.

use rustc_hash::FxHashMap;

use crate::cfr::error::SolverError;
use crate::cfr::game::{
    checked_next, checked_utility, decision_point, DecisionPoint, Game, NUM_PLAYERS,
};
use crate::cfr::storage::uniform;

/// Strategy profile keyed by infoset, as returned by `average_strategies`.
pub type StrategyMap = FxHashMap<String, Vec<f64>>;

/// Exploitability of a strategy profile.
///
/// Mean of the two best-response values, which is zero exactly at a Nash
/// equilibrium of a zero-sum game. Infosets missing from `strategies`, or
/// with a vector of the wrong length, are played uniformly.
pub fn exploitability<G: Game>(
    game: &G,
    strategies: &StrategyMap,
    max_depth: usize,
) -> Result<f64, SolverError> {
    let evaluator = BestResponse::new(game, strategies, max_depth);
    let total = (0..NUM_PLAYERS)
        .map(|player| evaluator.value(player))
        .sum::<Result<f64, SolverError>>()?;
    Ok(total / NUM_PLAYERS as f64)
}

/// Expected payoff to player 0 when both players follow `strategies`.
pub fn expected_value<G: Game>(
    game: &G,
    strategies: &StrategyMap,
    max_depth: usize,
) -> Result<f64, SolverError> {
    let evaluator = BestResponse::new(game, strategies, max_depth);
    let deals = evaluator.deals()?;
    let chance = 1.0 / deals.len() as f64;

    let mut total = 0.0;
    for deal in &deals {
        let root = game.initial_history(deal);
        total += chance * evaluator.on_policy(&root, 0)?;
    }
    Ok(total)
}

/// Best-response evaluator against a fixed strategy profile.
#[derive(Debug)]
pub struct BestResponse<'a, G: Game> {
    game: &'a G,
    strategies: &'a StrategyMap,
    max_depth: usize,
}

/// Exploiter histories grouped by infoset key, with their weights and depths.
type Groups<H> = FxHashMap<String, Vec<(H, f64, usize)>>;

impl<'a, G: Game> BestResponse<'a, G> {
    /// Create an evaluator for `game` against `strategies`.
    pub fn new(game: &'a G, strategies: &'a StrategyMap, max_depth: usize) -> Self {
        Self {
            game,
            strategies,
            max_depth,
        }
    }

    /// Expected payoff to `exploiter` when it best-responds and the other
    /// player follows the profile.
    pub fn value(&self, exploiter: usize) -> Result<f64, SolverError> {
        let deals = self.deals()?;
        let chance = 1.0 / deals.len() as f64;

        let mut groups: Groups<G::History> = FxHashMap::default();
        for deal in &deals {
            let root = self.game.initial_history(deal);
            self.collect(&root, exploiter, chance, 0, &mut groups)?;
        }

        let mut choices: FxHashMap<String, usize> = FxHashMap::default();
        let mut total = 0.0;
        for deal in &deals {
            let root = self.game.initial_history(deal);
            total += chance * self.evaluate(&root, exploiter, &groups, &mut choices, 0)?;
        }
        Ok(total)
    }

    fn deals(&self) -> Result<Vec<G::Deal>, SolverError> {
        let deals = self.game.deals();
        if deals.is_empty() {
            return Err(SolverError::NoDeals);
        }
        Ok(deals)
    }

    fn check_depth(&self, history: &G::History, depth: usize) -> Result<(), SolverError> {
        if depth >= self.max_depth {
            return Err(SolverError::DepthExceeded {
                max_depth: self.max_depth,
                history: format!("{:?}", history),
            });
        }
        Ok(())
    }

    /// Profile strategy at an infoset, uniform when unknown.
    fn strategy(&self, key: &str, num_actions: usize) -> Vec<f64> {
        match self.strategies.get(key) {
            Some(s) if s.len() == num_actions => s.clone(),
            _ => uniform(num_actions),
        }
    }

    /// Payoff of a terminal from `player`'s point of view.
    fn terminal_value(&self, history: &G::History, player: usize) -> Result<f64, SolverError> {
        let utility = checked_utility(self.game, history)?;
        Ok(if player == 0 { utility } else { -utility })
    }

    fn collect(
        &self,
        history: &G::History,
        exploiter: usize,
        weight: f64,
        depth: usize,
        groups: &mut Groups<G::History>,
    ) -> Result<(), SolverError> {
        if self.game.is_terminal(history) {
            return Ok(());
        }
        self.check_depth(history, depth)?;

        let DecisionPoint {
            player,
            key,
            actions,
        } = decision_point(self.game, history)?;

        if player == exploiter {
            for &action in &actions {
                let next = checked_next(self.game, history, action)?;
                self.collect(&next, exploiter, weight, depth + 1, groups)?;
            }
            groups
                .entry(key)
                .or_default()
                .push((history.clone(), weight, depth));
        } else {
            let strategy = self.strategy(&key, actions.len());
            for (i, &action) in actions.iter().enumerate() {
                let next = checked_next(self.game, history, action)?;
                self.collect(&next, exploiter, weight * strategy[i], depth + 1, groups)?;
            }
        }
        Ok(())
    }

    fn evaluate(
        &self,
        history: &G::History,
        exploiter: usize,
        groups: &Groups<G::History>,
        choices: &mut FxHashMap<String, usize>,
        depth: usize,
    ) -> Result<f64, SolverError> {
        if self.game.is_terminal(history) {
            return self.terminal_value(history, exploiter);
        }
        self.check_depth(history, depth)?;

        let DecisionPoint {
            player,
            key,
            actions,
        } = decision_point(self.game, history)?;

        if player == exploiter {
            let cached = choices.get(&key).copied();
            let index = match cached {
                Some(index) => index,
                None => {
                    let index = self.choose(&key, &actions, exploiter, groups, choices)?;
                    choices.insert(key, index);
                    index
                }
            };
            let next = checked_next(self.game, history, actions[index])?;
            self.evaluate(&next, exploiter, groups, choices, depth + 1)
        } else {
            let strategy = self.strategy(&key, actions.len());
            let mut value = 0.0;
            for (i, &action) in actions.iter().enumerate() {
                let next = checked_next(self.game, history, action)?;
                value += strategy[i] * self.evaluate(&next, exploiter, groups, choices, depth + 1)?;
            }
            Ok(value)
        }
    }

    /// Pick the action with the highest weighted value over the whole infoset.
    ///
    /// Each member is expanded from its own depth.
    fn choose(
        &self,
        key: &str,
        actions: &[usize],
        exploiter: usize,
        groups: &Groups<G::History>,
        choices: &mut FxHashMap<String, usize>,
    ) -> Result<usize, SolverError> {
        let members = groups.get(key).map(Vec::as_slice).unwrap_or_default();

        let mut best = (0, f64::NEG_INFINITY);
        for (index, &action) in actions.iter().enumerate() {
            let mut value = 0.0;
            for (member, weight, depth) in members {
                let next = checked_next(self.game, member, action)?;
                value += weight * self.evaluate(&next, exploiter, groups, choices, depth + 1)?;
            }
            if value > best.1 {
                best = (index, value);
            }
        }
        Ok(best.0)
    }

    /// Value for player 0 when both players follow the profile.
    fn on_policy(&self, history: &G::History, depth: usize) -> Result<f64, SolverError> {
        if self.game.is_terminal(history) {
            return self.terminal_value(history, 0);
        }
        self.check_depth(history, depth)?;

        let DecisionPoint { key, actions, .. } = decision_point(self.game, history)?;
        let strategy = self.strategy(&key, actions.len());

        let mut value = 0.0;
        for (i, &action) in actions.iter().enumerate() {
            let next = checked_next(self.game, history, action)?;
            value += strategy[i] * self.on_policy(&next, depth + 1)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::game::GameError;
    use crate::games::kuhn::KuhnPoker;

    fn kuhn_nash(alpha: f64) -> StrategyMap {
        // Actions: check/bet before a bet, call/fold facing one.
        let entries: [(&str, [f64; 2]); 12] = [
            ("J|", [1.0 - alpha, alpha]),
            ("Q|", [1.0, 0.0]),
            ("K|", [1.0 - 3.0 * alpha, 3.0 * alpha]),
            ("J|c", [2.0 / 3.0, 1.0 / 3.0]),
            ("Q|c", [1.0, 0.0]),
            ("K|c", [0.0, 1.0]),
            ("J|b", [0.0, 1.0]),
            ("Q|b", [1.0 / 3.0, 2.0 / 3.0]),
            ("K|b", [1.0, 0.0]),
            ("J|cb", [0.0, 1.0]),
            ("Q|cb", [alpha + 1.0 / 3.0, 2.0 / 3.0 - alpha]),
            ("K|cb", [1.0, 0.0]),
        ];
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_known_equilibrium_is_unexploitable() {
        let game = KuhnPoker::new();
        for alpha in [0.0, 0.2, 1.0 / 3.0] {
            let profile = kuhn_nash(alpha);
            let exploit = exploitability(&game, &profile, 16).unwrap();
            assert!(exploit.abs() < 1e-9, "alpha {alpha}: exploitability {exploit}");

            let value = expected_value(&game, &profile, 16).unwrap();
            assert!((value + 1.0 / 18.0).abs() < 1e-9, "game value {value}");
        }
    }

    #[test]
    fn test_uniform_profile_is_exploitable() {
        let game = KuhnPoker::new();
        let exploit = exploitability(&game, &StrategyMap::default(), 16).unwrap();
        assert!(exploit > 0.1, "uniform play should be exploitable: {exploit}");
    }

    #[test]
    fn test_best_response_beats_game_value() {
        let game = KuhnPoker::new();
        let profile = kuhn_nash(0.1);
        let evaluator = BestResponse::new(&game, &profile, 16);

        let br0 = evaluator.value(0).unwrap();
        let br1 = evaluator.value(1).unwrap();
        assert!((br0 + 1.0 / 18.0).abs() < 1e-9);
        assert!((br1 - 1.0 / 18.0).abs() < 1e-9);
    }

    /// Player 1's infoset `x` is reached at depth 2 (after `[0, 0]`) and at
    /// depth 1 (after `[1]`). Only the shallow branch continues, down to a
    /// decision at depth 3.
    #[derive(Debug, Clone)]
    struct UnevenDepths;

    impl Game for UnevenDepths {
        type Deal = ();
        type History = Vec<usize>;

        fn deals(&self) -> Vec<()> {
            vec![()]
        }

        fn initial_history(&self, _deal: &()) -> Vec<usize> {
            Vec::new()
        }

        fn current_player(&self, history: &Vec<usize>) -> Option<usize> {
            if self.is_terminal(history) {
                return None;
            }
            match history.as_slice() {
                [0, 0] | [1] => Some(1),
                _ => Some(0),
            }
        }

        fn is_terminal(&self, history: &Vec<usize>) -> bool {
            matches!(history.as_slice(), [0, 1] | [0, 0, _] | [1, _, _, _])
        }

        fn terminal_utility(&self, history: &Vec<usize>) -> Result<f64, GameError> {
            let sum: usize = history.iter().sum();
            Ok(if sum % 2 == 0 { 1.0 } else { -1.0 })
        }

        fn legal_actions(&self, history: &Vec<usize>) -> Vec<usize> {
            if self.is_terminal(history) {
                Vec::new()
            } else {
                vec![0, 1]
            }
        }

        fn next_history(
            &self,
            history: &Vec<usize>,
            action: usize,
        ) -> Result<Vec<usize>, GameError> {
            if action > 1 || self.is_terminal(history) {
                return Err(GameError::IllegalAction {
                    history: format!("{:?}", history),
                    action,
                });
            }
            let mut next = history.clone();
            next.push(action);
            Ok(next)
        }

        fn infoset_key(&self, history: &Vec<usize>) -> (String, usize) {
            let key = match history.as_slice() {
                [0, 0] | [1] => "x".to_string(),
                _ => format!("{:?}", history),
            };
            (key, self.legal_actions(history).len())
        }
    }

    #[test]
    fn test_infoset_members_keep_their_own_depth() {
        let game = UnevenDepths;
        let profile = StrategyMap::default();

        // Deepest decision is at depth 3, so a limit of 4 must be enough.
        let evaluator = BestResponse::new(&game, &profile, 4);
        assert!(evaluator.value(0).is_ok());
        assert!(evaluator.value(1).is_ok());
        assert!(exploitability(&game, &profile, 4).is_ok());

        match exploitability(&game, &profile, 3).unwrap_err() {
            SolverError::DepthExceeded { max_depth, history } => {
                assert_eq!(max_depth, 3);
                assert_eq!(history, "[1, 0, 0]");
            }
            other => panic!("expected DepthExceeded, got {other}"),
        }
    }

    #[test]
    fn test_depth_limit_applies() {
        let game = KuhnPoker::new();
        let err = exploitability(&game, &StrategyMap::default(), 1).unwrap_err();
        assert!(matches!(err, SolverError::DepthExceeded { max_depth: 1, .. }));
    }
}
