//! Configuration options for the CFR solver.
//!
//! This module provides configuration structs that control the behavior
//! of the MCCFR trainer, plus the statistics it reports back.

use serde::{Deserialize, Serialize};

use crate::cfr::error::ConfigError;

/// Configuration for the CFR solver.
///
/// The defaults are plain MCCFR: regrets and strategy sums are raw
/// accumulators with no flooring, weighting or discounting.
///
/// # Example
/// ```
/// use mccfr_solver::cfr::CFRConfig;
///
/// let config = CFRConfig::default().with_seed(7);
/// assert!(!config.use_cfr_plus);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CFRConfig {
    /// Use CFR+ regret flooring (reset negative regrets to 0).
    pub use_cfr_plus: bool,

    /// Use Linear CFR weighting (weight strategy sums by iteration).
    ///
    /// Later iterations count more toward the average strategy. Strategy
    /// sums stay monotonically non-decreasing.
    pub use_linear_cfr: bool,

    /// Exploration probability for opponent sampling.
    ///
    /// Opponent actions are sampled from `(1 - e) * strategy + e * uniform`
    /// and the sampled value is reweighted by `strategy / sampling`
    /// so the estimate stays unbiased. 0 samples straight from the strategy.
    pub exploration: f64,

    /// Random seed for reproducibility.
    ///
    /// With a seed, two runs with the same game and iteration count produce
    /// bit-identical strategy tables. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Emit an `info!` progress line every this many iterations (0 = never).
    pub log_interval: u64,
}

impl Default for CFRConfig {
    fn default() -> Self {
        Self {
            use_cfr_plus: false,
            use_linear_cfr: false,
            exploration: 0.0,
            seed: None,
            log_interval: 0,
        }
    }
}

impl CFRConfig {
    /// Create a new CFRConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for fast convergence.
    ///
    /// This uses CFR+ with linear weighting.
    pub fn fast() -> Self {
        Self {
            use_cfr_plus: true,
            use_linear_cfr: true,
            ..Default::default()
        }
    }

    /// Builder method: set whether to use CFR+.
    pub fn with_cfr_plus(mut self, enable: bool) -> Self {
        self.use_cfr_plus = enable;
        self
    }

    /// Builder method: set whether to use Linear CFR.
    pub fn with_linear_cfr(mut self, enable: bool) -> Self {
        self.use_linear_cfr = enable;
        self
    }

    /// Builder method: set exploration probability.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the progress log interval.
    pub fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = interval;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(ConfigError::InvalidExploration(self.exploration));
        }
        Ok(())
    }
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Most recent exploitability (if calculated).
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability value in chips per hand.
    pub exploitability: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain_mccfr() {
        let config = CFRConfig::default();
        assert!(!config.use_cfr_plus);
        assert!(!config.use_linear_cfr);
        assert_eq!(config.exploration, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_exploration_out_of_range() {
        let config = CFRConfig::new().with_exploration(1.5);
        assert_eq!(config.validate(), Err(ConfigError::InvalidExploration(1.5)));

        let config = CFRConfig::new().with_exploration(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stats_record_exploitability() {
        let mut stats = CFRStats::new();
        stats.record_exploitability(1_000, 0.25);
        stats.record_exploitability(2_000, 0.1);

        assert_eq!(stats.exploitability, Some(0.1));
        assert_eq!(stats.exploitability_history.len(), 2);
        assert_eq!(stats.exploitability_history[0].iteration, 1_000);
    }

    #[test]
    fn test_update_rate() {
        let mut stats = CFRStats {
            iterations: 500,
            elapsed_seconds: 2.0,
            ..Default::default()
        };
        stats.update_rate();
        assert_eq!(stats.iterations_per_second, 250.0);
    }
}
