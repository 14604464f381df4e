//! Strategy presentation and export for Kuhn poker.
//!
//! The solver only knows action indices. This module turns them into the
//! labels a reader expects (`check`/`bet`, `call`/`fold`) and writes
//! solved strategies as text tables or JSON reports.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::{Algorithm, CFRSolver, SolverError};

use super::KuhnPoker;

/// Human-readable labels for the actions at an infoset.
///
/// `seq` is the public action sequence (the part of the key after `|`).
/// Sequences this game does not produce get generic `a{i}` labels.
pub fn action_labels(seq: &str, num_actions: usize) -> Vec<String> {
    let named: Option<[&str; 2]> = match seq {
        "" | "c" => Some(["check", "bet"]),
        "b" | "cb" => Some(["call", "fold"]),
        _ => None,
    };

    match named {
        Some(labels) if labels.len() == num_actions => {
            labels.iter().map(|s| s.to_string()).collect()
        }
        _ => (0..num_actions).map(|i| format!("a{}", i)).collect(),
    }
}

/// Labels for an infoset key of the form `card|sequence`.
fn key_labels(key: &str, num_actions: usize) -> Vec<String> {
    match key.split_once('|') {
        Some((_, seq)) => action_labels(seq, num_actions),
        None => action_labels("?", num_actions),
    }
}

/// Render average strategies one infoset per line, sorted by key.
///
/// ```text
///   J|cb: call=0.000, fold=1.000
/// ```
pub fn format_strategy_table(strategies: &FxHashMap<String, Vec<f64>>) -> String {
    let mut keys: Vec<&String> = strategies.keys().collect();
    keys.sort();

    let mut out = String::new();
    for key in keys {
        let strategy = &strategies[key];
        let parts: Vec<String> = key_labels(key, strategy.len())
            .iter()
            .zip(strategy)
            .map(|(label, p)| format!("{}={:.3}", label, p))
            .collect();
        out.push_str(&format!("  {}: {}\n", key, parts.join(", ")));
    }
    out
}

/// Strategy for a single infoset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    /// Infoset key (`card|sequence`).
    pub info_key: String,
    /// Label of each action, aligned with `strategy`.
    pub actions: Vec<String>,
    /// Average strategy probabilities.
    pub strategy: Vec<f64>,
}

/// Run metadata stored alongside the strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Variant that produced the strategies.
    pub algorithm: Algorithm,
    /// Iterations completed.
    pub iterations: u64,
    /// Seed recorded in the solver configuration.
    pub seed: Option<u64>,
    /// Number of infosets discovered.
    pub info_sets: usize,
    /// Exploitability of the average strategy, if measured.
    pub exploitability: Option<f64>,
    /// Ante used by the game.
    pub ante: f64,
    /// Bet size used by the game.
    pub bet: f64,
    /// Seconds since the Unix epoch when the report was built.
    pub timestamp: u64,
}

/// Complete solved strategy for Kuhn poker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Solver metadata.
    pub metadata: ReportMetadata,
    /// Strategies sorted by infoset key.
    pub strategies: Vec<StrategyEntry>,
}

impl StrategyReport {
    /// Build a report from a trained solver.
    ///
    /// Uses the last exploitability recorded in the solver's statistics.
    pub fn from_solver(solver: &CFRSolver<KuhnPoker>) -> Self {
        let averages = solver.average_strategies();
        let mut keys: Vec<&String> = averages.keys().collect();
        keys.sort();

        let strategies = keys
            .into_iter()
            .map(|key| {
                let strategy = averages[key].clone();
                StrategyEntry {
                    info_key: key.clone(),
                    actions: key_labels(key, strategy.len()),
                    strategy,
                }
            })
            .collect();

        let config = solver.config();
        let stakes = solver.game().config();
        Self {
            metadata: ReportMetadata {
                algorithm: config.algorithm,
                iterations: solver.iteration(),
                seed: config.seed,
                info_sets: solver.num_info_sets(),
                exploitability: solver.stats().exploitability,
                ante: stakes.ante,
                bet: stakes.bet,
                timestamp: unix_timestamp(),
            },
            strategies,
        }
    }

    /// Build a report and measure exploitability for it.
    pub fn measured(solver: &mut CFRSolver<KuhnPoker>) -> Result<Self, SolverError> {
        solver.measure_exploitability()?;
        Ok(Self::from_solver(solver))
    }

    /// Get strategy for a specific infoset.
    pub fn get_strategy(&self, key: &str) -> Option<&StrategyEntry> {
        self.strategies.iter().find(|entry| entry.info_key == key)
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

fn unix_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
