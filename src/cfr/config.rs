//! Configuration options for the CFR solver.
//!
//! This module provides configuration structs that control the behavior
//! of the CFR algorithm, and the statistics collected while training.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default recursion limit for a single traversal.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The regret-minimization variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Vanilla CFR: signed regrets, uniform averaging weight.
    #[serde(rename = "cfr")]
    Cfr,
    /// CFR+: regrets floored at zero, linear averaging weight.
    #[default]
    #[serde(rename = "cfr+")]
    CfrPlus,
}

impl Algorithm {
    /// Averaging weight for iteration `t` (1-based).
    ///
    /// CFR+ weights iteration `t` by `t` (linear averaging).
    pub fn iteration_weight(self, t: u64) -> f64 {
        match self {
            Algorithm::Cfr => 1.0,
            Algorithm::CfrPlus => t as f64,
        }
    }

    /// Whether cumulative regrets are floored at zero after every update.
    pub fn floors_regret(self) -> bool {
        matches!(self, Algorithm::CfrPlus)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Cfr => write!(f, "cfr"),
            Algorithm::CfrPlus => write!(f, "cfr+"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cfr" => Ok(Algorithm::Cfr),
            "cfr+" | "cfrplus" | "cfr-plus" => Ok(Algorithm::CfrPlus),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Configuration for the CFR solver.
///
/// # Example
/// ```
/// use poker_gto::cfr::{Algorithm, CFRConfig};
///
/// let config = CFRConfig::default();
/// assert_eq!(config.algorithm, Algorithm::CfrPlus); // CFR+ is the default
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CFRConfig {
    /// Which variant to run.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Random seed.
    ///
    /// Full traversal is deterministic, so the seed has no effect on the
    /// result. It is recorded for reproducibility of reports.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Maximum recursion depth of a single traversal.
    ///
    /// A game whose tree is deeper than this is treated as broken.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for CFRConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::CfrPlus,
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CFRConfig {
    /// Create a new CFRConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for vanilla CFR.
    pub fn cfr() -> Self {
        Self {
            algorithm: Algorithm::Cfr,
            ..Default::default()
        }
    }

    /// Configuration for CFR+.
    pub fn cfr_plus() -> Self {
        Self {
            algorithm: Algorithm::CfrPlus,
            ..Default::default()
        }
    }

    /// Builder method: set the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors raised when configuration is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `train` was asked for zero iterations.
    #[error("iteration count must be positive")]
    ZeroIterations,

    /// The recursion limit is zero.
    #[error("max_depth must be positive")]
    ZeroMaxDepth,

    /// The algorithm name is not `cfr` or `cfr+`.
    #[error("unknown algorithm '{0}' (expected 'cfr' or 'cfr+')")]
    UnknownAlgorithm(String),

    /// A game stake is not a positive finite number.
    #[error("{field} must be positive and finite, got {value}")]
    InvalidStake {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A game size parameter is outside its supported range.
    #[error("{field} must be in {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(String),

    /// The config file is not valid JSON for this struct.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Time spent in the most recent training call (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second of the most recent training call.
    pub iterations_per_second: f64,

    /// Most recent exploitability measurement, if any.
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability value (game units per hand).
    pub exploitability: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second from the iterations run in `elapsed_seconds`.
    pub fn update_rate(&mut self, iterations_run: u64) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = iterations_run as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}
