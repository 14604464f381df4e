//! Storage for CFR regrets and strategies.
//!
//! One [`InfoSet`] per decision point holds the cumulative regrets and the
//! cumulative strategy mass. The [`InfoSetTable`] owns all of them for the
//! duration of a training run; entries are created lazily and never removed.

use rustc_hash::FxHashMap;

use crate::cfr::config::Algorithm;
use crate::cfr::error::SolverError;

/// Accumulators for a single information set.
///
/// `regret_sum` and `strategy_sum` always have exactly `num_actions` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoSet {
    num_actions: usize,
    regret_sum: Vec<f64>,
    strategy_sum: Vec<f64>,
}

impl InfoSet {
    /// Create an information set with zeroed accumulators.
    pub fn new(num_actions: usize) -> Self {
        Self {
            num_actions,
            regret_sum: vec![0.0; num_actions],
            strategy_sum: vec![0.0; num_actions],
        }
    }

    /// Number of actions at this decision point.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Cumulative regret per action.
    pub fn regret_sum(&self) -> &[f64] {
        &self.regret_sum
    }

    /// Cumulative strategy mass per action.
    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    /// Regret matching without touching the accumulators.
    ///
    /// The strategy is proportional to positive regrets. If no regret is
    /// positive, returns a uniform strategy. CFR and CFR+ share this rule;
    /// they differ only in how regrets and strategy mass accumulate.
    pub fn current_strategy(&self) -> Vec<f64> {
        let positive: Vec<f64> = self.regret_sum.iter().map(|&r| r.max(0.0)).collect();
        let sum: f64 = positive.iter().sum();

        if sum > 0.0 {
            positive.iter().map(|&r| r / sum).collect()
        } else {
            uniform(self.num_actions)
        }
    }

    /// Regret matching, accumulating `reach_probability * strategy` into the
    /// strategy sum.
    ///
    /// The returned vector is not stored; the caller uses it for one
    /// traversal step. Both variants use the same matching rule.
    pub fn get_strategy(&mut self, reach_probability: f64, _algorithm: Algorithm) -> Vec<f64> {
        let strategy = self.current_strategy();
        self.accumulate_strategy(&strategy, reach_probability);
        strategy
    }

    /// Add instantaneous regrets.
    ///
    /// CFR keeps signed sums; CFR+ floors every entry at zero after adding.
    pub fn accumulate_regrets(&mut self, regrets: &[f64], algorithm: Algorithm) {
        debug_assert_eq!(regrets.len(), self.num_actions);

        for (sum, &regret) in self.regret_sum.iter_mut().zip(regrets) {
            *sum += regret;
            if algorithm.floors_regret() {
                *sum = sum.max(0.0);
            }
        }
    }

    /// Add `weight * strategy[a]` to the strategy sum of every action.
    pub fn accumulate_strategy(&mut self, strategy: &[f64], weight: f64) {
        debug_assert_eq!(strategy.len(), self.num_actions);

        for (sum, &prob) in self.strategy_sum.iter_mut().zip(strategy) {
            *sum += weight * prob;
        }
    }

    /// Normalized strategy sum (the Nash equilibrium approximation).
    ///
    /// Falls back to uniform when no mass has accumulated.
    pub fn average_strategy(&self) -> Vec<f64> {
        let total: f64 = self.strategy_sum.iter().sum();
        if total > 0.0 {
            self.strategy_sum.iter().map(|&s| s / total).collect()
        } else {
            uniform(self.num_actions)
        }
    }
}

/// Uniform distribution over `num_actions` actions.
pub(crate) fn uniform(num_actions: usize) -> Vec<f64> {
    vec![1.0 / num_actions as f64; num_actions]
}

/// Mapping from infoset key to accumulators.
///
/// Owned exclusively by the solver; grows monotonically during a run.
#[derive(Debug, Clone, Default)]
pub struct InfoSetTable {
    infosets: FxHashMap<String, InfoSet>,
}

impl InfoSetTable {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the information set for `key`, creating it on first visit.
    ///
    /// Fails if the key was seen before with a different action count.
    pub fn get_or_insert(
        &mut self,
        key: &str,
        num_actions: usize,
    ) -> Result<&mut InfoSet, SolverError> {
        if num_actions == 0 {
            return Err(SolverError::EmptyInfoSet {
                key: key.to_string(),
            });
        }

        let node = self
            .infosets
            .entry(key.to_string())
            .or_insert_with(|| InfoSet::new(num_actions));

        if node.num_actions != num_actions {
            return Err(SolverError::ActionCountMismatch {
                key: key.to_string(),
                expected: node.num_actions,
                found: num_actions,
            });
        }

        Ok(node)
    }

    /// Look up an information set.
    pub fn get(&self, key: &str) -> Option<&InfoSet> {
        self.infosets.get(key)
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, key: &str) -> bool {
        self.infosets.contains_key(key)
    }

    /// Get the number of information sets stored.
    pub fn len(&self) -> usize {
        self.infosets.len()
    }

    /// True if nothing has been visited yet.
    pub fn is_empty(&self) -> bool {
        self.infosets.is_empty()
    }

    /// Iterate over all information sets.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoSet)> {
        self.infosets.iter()
    }

    /// All infoset keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.infosets.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Average strategy of every information set.
    pub fn average_strategies(&self) -> FxHashMap<String, Vec<f64>> {
        self.infosets
            .iter()
            .map(|(key, node)| (key.clone(), node.average_strategy()))
            .collect()
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.infosets.clear();
    }

    /// Get total memory usage estimate in bytes.
    pub fn memory_usage(&self) -> usize {
        self.infosets
            .iter()
            .map(|(k, v)| k.len() + 2 * v.num_actions * std::mem::size_of::<f64>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regret_matching_positive_part() {
        let mut node = InfoSet::new(3);
        node.accumulate_regrets(&[2.0, -1.0, 6.0], Algorithm::Cfr);

        let strategy = node.current_strategy();
        assert_eq!(strategy, vec![0.25, 0.0, 0.75]);
        assert_eq!(node.regret_sum(), &[2.0, -1.0, 6.0]);
    }

    #[test]
    fn test_regret_matching_uniform_fallback() {
        let mut node = InfoSet::new(4);
        assert_eq!(node.current_strategy(), vec![0.25; 4]);

        node.accumulate_regrets(&[-1.0, -2.0, 0.0, -0.5], Algorithm::Cfr);
        assert_eq!(node.current_strategy(), vec![0.25; 4]);
    }

    #[test]
    fn test_cfr_plus_floors_regret() {
        let mut node = InfoSet::new(2);
        node.accumulate_regrets(&[1.0, -3.0], Algorithm::CfrPlus);
        assert_eq!(node.regret_sum(), &[1.0, 0.0]);

        node.accumulate_regrets(&[-4.0, 0.5], Algorithm::CfrPlus);
        assert_eq!(node.regret_sum(), &[0.0, 0.5]);
    }

    #[test]
    fn test_get_strategy_accumulates_reach_weighted_mass() {
        let mut node = InfoSet::new(2);
        node.accumulate_regrets(&[3.0, 1.0], Algorithm::Cfr);

        let strategy = node.get_strategy(0.5, Algorithm::Cfr);
        assert_eq!(strategy, vec![0.75, 0.25]);
        assert_eq!(node.strategy_sum(), &[0.375, 0.125]);

        node.accumulate_strategy(&strategy, 2.0);
        assert_eq!(node.strategy_sum(), &[1.875, 0.625]);
        assert_eq!(node.average_strategy(), vec![0.75, 0.25]);
    }

    #[test]
    fn test_average_strategy_zero_mass_is_uniform() {
        let node = InfoSet::new(3);
        let avg = node.average_strategy();
        assert_eq!(avg.len(), 3);
        assert!(avg.iter().all(|&p| (p - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_table_rejects_action_count_change() {
        let mut table = InfoSetTable::new();
        table.get_or_insert("Q|", 2).unwrap();
        assert!(table.get_or_insert("Q|", 2).is_ok());

        match table.get_or_insert("Q|", 3) {
            Err(SolverError::ActionCountMismatch {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "Q|");
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected ActionCountMismatch, got {:?}", other),
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_rejects_empty_infoset() {
        let mut table = InfoSetTable::new();
        assert!(matches!(
            table.get_or_insert("x", 0),
            Err(SolverError::EmptyInfoSet { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_average_strategies_and_keys() {
        let mut table = InfoSetTable::new();
        table
            .get_or_insert("b", 2)
            .unwrap()
            .accumulate_strategy(&[1.0, 0.0], 3.0);
        table.get_or_insert("a", 2).unwrap();

        assert_eq!(table.keys(), vec!["a".to_string(), "b".to_string()]);
        let avg = table.average_strategies();
        assert_eq!(avg["a"], vec![0.5, 0.5]);
        assert_eq!(avg["b"], vec![1.0, 0.0]);
        assert!(table.memory_usage() > 0);

        table.clear();
        assert!(table.average_strategies().is_empty());
    }
}
