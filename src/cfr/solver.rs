//! Monte Carlo Counterfactual Regret Minimization (MCCFR) Solver.
//!
//! Each iteration walks the game tree once per seat. The walking seat (the
//! traverser) expands every one of its own actions, while chance and the
//! other seats are sampled along a single path:
//! - **Chance** outcomes are drawn from the true deal distribution.
//! - **Opponent** actions are drawn from their current strategy, optionally
//!   mixed with uniform exploration and reweighted by `strategy / sampling`.
//!
//! The solver is generic over any game that implements the `Game` trait.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cfr::config::{CFRConfig, CFRStats};
use crate::cfr::error::{GameError, SolverError};
use crate::cfr::exploitability::exploitability;
use crate::cfr::game::{Game, InfoState};
use crate::cfr::storage::RegretStorage;
use crate::cfr::strategy::{sample_index, StrategyTable};

/// Reach probabilities carried down one traversal.
#[derive(Debug, Clone)]
struct Reach {
    /// Probability each seat's own strategy plays to the current state.
    players: Vec<f64>,
    /// Probability the sampler chose the opponent actions on this path.
    sampling: f64,
}

impl Reach {
    fn root(num_players: usize) -> Self {
        Self {
            players: vec![1.0; num_players],
            sampling: 1.0,
        }
    }

    /// Opponents' reach over their sampling probability.
    ///
    /// Chance is drawn at its true probability and cancels out.
    fn importance_weight(&self, traverser: usize) -> f64 {
        let opponents: f64 = self
            .players
            .iter()
            .enumerate()
            .filter(|&(p, _)| p != traverser)
            .map(|(_, &r)| r)
            .product();
        opponents / self.sampling
    }
}

/// The main CFR solver.
///
/// This struct manages the MCCFR algorithm for any game implementing the
/// `Game` trait. It owns the regret storage for the whole run; dropping the
/// solver drops every node.
///
/// # Example
/// ```
/// use mccfr_solver::cfr::{CFRConfig, CFRSolver};
/// use mccfr_solver::games::poker::{GameConfig, PokerGame};
///
/// let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
/// let mut solver = CFRSolver::new(game, CFRConfig::default().with_seed(1)).unwrap();
/// solver.train(1_000).unwrap();
///
/// let jack = solver.average_strategy("J|", 2);
/// assert!((jack.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
pub struct CFRSolver<G: Game> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: CFRConfig,

    /// Storage for regrets and strategy sums.
    storage: RegretStorage,

    /// Current iteration count.
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,

    /// Random number generator.
    rng: StdRng,
}

impl<G: Game> CFRSolver<G> {
    /// Create a new CFR solver for the given game.
    ///
    /// # Errors
    /// Returns the validation error if `config` is out of range.
    pub fn new(game: G, config: CFRConfig) -> Result<Self, SolverError> {
        Self::with_capacity(game, config, 0)
    }

    /// Create a solver with pre-allocated storage capacity.
    ///
    /// Use this when you have an estimate of how many info sets the game has
    /// to avoid reallocations during training.
    pub fn with_capacity(game: G, config: CFRConfig, capacity: usize) -> Result<Self, SolverError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            game,
            config,
            storage: RegretStorage::with_capacity(capacity),
            iteration: 0,
            stats: CFRStats::new(),
            rng,
        })
    }

    /// Run a single iteration of MCCFR.
    ///
    /// This traverses the game tree once for each player, updating regrets
    /// and strategy sums along the way, so every seat trains on the full
    /// iteration budget.
    pub fn run_iteration(&mut self) -> Result<(), SolverError> {
        self.iteration += 1;

        for player in 0..self.game.num_players() {
            let initial_state = self.game.initial_state();
            let reach = Reach::root(self.game.num_players());

            self.traverse(&initial_state, player, reach)?;
        }

        if self.config.log_interval > 0 && self.iteration % self.config.log_interval == 0 {
            log::info!(
                "iteration {:>10}  info sets {:>8}",
                self.iteration,
                self.storage.num_info_sets()
            );
        }

        Ok(())
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self, iterations: u64) -> Result<&CFRStats, SolverError> {
        log::info!("training {} iterations of MCCFR", iterations);
        let start_time = Instant::now();

        for _ in 0..iterations {
            self.run_iteration()?;
        }

        self.finish_stats(start_time);
        log::info!(
            "trained to iteration {} ({} info sets, {:.0} it/s)",
            self.stats.iterations,
            self.stats.info_sets,
            self.stats.iterations_per_second
        );

        Ok(&self.stats)
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&CFRStats, SolverError>
    where
        F: FnMut(&CFRStats),
    {
        let start_time = Instant::now();
        let interval = callback_interval.max(1);

        for i in 0..iterations {
            self.run_iteration()?;

            if (i + 1) % interval == 0 {
                self.finish_stats(start_time);
                callback(&self.stats);
            }
        }

        self.finish_stats(start_time);
        Ok(&self.stats)
    }

    /// Train up to each checkpoint in turn and measure exact exploitability
    /// there.
    ///
    /// Checkpoints are absolute iteration counts; ones already passed are
    /// skipped. Measurements land in `stats().exploitability_history`.
    pub fn train_with_checkpoints(&mut self, checkpoints: &[u64]) -> Result<&CFRStats, SolverError> {
        let start_time = Instant::now();
        let mut sorted = checkpoints.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        for checkpoint in sorted {
            if checkpoint <= self.iteration {
                continue;
            }
            while self.iteration < checkpoint {
                self.run_iteration()?;
            }

            let value = exploitability(&self.game, &self.strategy_table())?;
            log::debug!("exploitability {:.6} at iteration {}", value, self.iteration);
            self.stats.record_exploitability(self.iteration, value);
        }

        self.finish_stats(start_time);
        Ok(&self.stats)
    }

    fn finish_stats(&mut self, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.storage.num_info_sets();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }

    /// Core MCCFR traversal function.
    ///
    /// Returns the sampled expected utility of `state` for `traverser`.
    fn traverse(&mut self, state: &G::State, traverser: usize, reach: Reach) -> Result<f64, GameError> {
        // Terminal node: return utility
        if self.game.is_terminal(state) {
            return self.game.utility(state, traverser);
        }

        // Chance node: sample outcome and continue
        if self.game.is_chance(state) {
            let new_state = self.game.sample_chance(state, &mut self.rng)?;
            return self.traverse(&new_state, traverser, reach);
        }

        let current_player = match self.game.current_player(state) {
            Some(p) => p,
            None => return self.game.utility(state, traverser),
        };

        let actions = self.game.legal_actions(state);
        if actions.is_empty() {
            return self.game.utility(state, traverser);
        }

        let info_key = self.game.info_state(state).key();
        let strategy = self.storage.current_strategy(&info_key, actions.len());

        if current_player == traverser {
            // Traverser: explore all actions, update regrets
            self.traverse_player(state, traverser, &reach, &actions, &strategy, &info_key)
        } else {
            // Opponent: sample one action according to strategy
            self.traverse_opponent(state, traverser, reach, &actions, &strategy, current_player)
        }
    }

    /// Handle traversal when it's the traversing player's turn.
    ///
    /// Explores all actions and updates regrets based on counterfactual values.
    fn traverse_player(
        &mut self,
        state: &G::State,
        traverser: usize,
        reach: &Reach,
        actions: &[G::Action],
        strategy: &[f64],
        info_key: &str,
    ) -> Result<f64, GameError> {
        let mut action_values = vec![0.0; actions.len()];

        for (i, action) in actions.iter().enumerate() {
            let new_state = self.game.apply_action(state, action)?;

            let mut new_reach = reach.clone();
            new_reach.players[traverser] *= strategy[i];

            action_values[i] = self.traverse(&new_state, traverser, new_reach)?;
        }

        // Node value: expectation over the current strategy
        let node_value: f64 = strategy
            .iter()
            .zip(action_values.iter())
            .map(|(&s, &v)| s * v)
            .sum();

        let weight = reach.importance_weight(traverser);
        let regret_updates: Vec<f64> = action_values
            .iter()
            .map(|&v| (v - node_value) * weight)
            .collect();

        self.storage
            .update_regrets(info_key, &regret_updates, self.config.use_cfr_plus);

        // Store action names (only stored once per info set)
        let action_names: Vec<String> = actions.iter().map(|a| self.game.action_name(a)).collect();
        self.storage.set_action_names(info_key, action_names);

        let mut strategy_weight = weight * reach.players[traverser];
        if self.config.use_linear_cfr {
            strategy_weight *= self.iteration as f64;
        }
        self.storage
            .accumulate_strategy(info_key, strategy_weight, strategy);

        Ok(node_value)
    }

    /// Handle traversal when it's an opponent's turn.
    ///
    /// Samples one action and reweights its value by the inverse of the
    /// sampling probability times the strategy probability.
    fn traverse_opponent(
        &mut self,
        state: &G::State,
        traverser: usize,
        mut reach: Reach,
        actions: &[G::Action],
        strategy: &[f64],
        current_player: usize,
    ) -> Result<f64, GameError> {
        let sampling = self.sampling_distribution(strategy);
        let action_idx = sample_index(&sampling, self.rng.gen());

        let new_state = self.game.apply_action(state, &actions[action_idx])?;

        reach.players[current_player] *= strategy[action_idx];
        reach.sampling *= sampling[action_idx];

        let value = self.traverse(&new_state, traverser, reach)?;
        Ok(value * strategy[action_idx] / sampling[action_idx])
    }

    /// Opponent sampling distribution: strategy mixed with uniform exploration.
    fn sampling_distribution(&self, strategy: &[f64]) -> Vec<f64> {
        let epsilon = self.config.exploration;
        if epsilon == 0.0 {
            return strategy.to_vec();
        }
        let uniform = 1.0 / strategy.len() as f64;
        strategy
            .iter()
            .map(|&s| (1.0 - epsilon) * s + epsilon * uniform)
            .collect()
    }

    /// Get the current strategy for an information set.
    ///
    /// This returns the strategy based on current regrets (regret matching).
    pub fn current_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        self.storage.current_strategy(info_key, num_actions)
    }

    /// Get the average strategy for an information set.
    ///
    /// This returns the time-averaged strategy which converges to Nash equilibrium.
    pub fn average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        self.storage.average_strategy(info_key, num_actions)
    }

    /// Average strategy of every visited information set.
    pub fn strategy_table(&self) -> StrategyTable {
        StrategyTable::from_storage(&self.storage)
    }

    /// Exact exploitability of the current average strategy.
    pub fn exploitability(&self) -> Result<f64, SolverError> {
        exploitability(&self.game, &self.strategy_table())
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.storage.num_info_sets()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the storage for analysis.
    pub fn storage(&self) -> &RegretStorage {
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
    ///
    /// The random generator is reseeded from the configured seed.
    pub fn reset(&mut self) {
        self.storage.clear();
        self.iteration = 0;
        self.stats = CFRStats::new();
        self.rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::poker::{GameConfig, PokerGame};

    fn kuhn_solver(seed: u64) -> CFRSolver<PokerGame> {
        let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
        CFRSolver::new(game, CFRConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
        let result = CFRSolver::new(game, CFRConfig::default().with_exploration(3.0));
        assert!(matches!(result, Err(SolverError::Config(_))));
    }

    #[test]
    fn test_importance_weight() {
        let mut reach = Reach::root(3);
        assert_eq!(reach.importance_weight(0), 1.0);

        reach.players[1] = 0.5;
        reach.players[2] = 0.4;
        reach.players[0] = 0.1;
        reach.sampling = 0.25;
        assert!((reach.importance_weight(0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_distribution_mixes_uniform() {
        let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
        let solver = CFRSolver::new(game, CFRConfig::default().with_exploration(0.5)).unwrap();
        let sampling = solver.sampling_distribution(&[1.0, 0.0]);
        assert_eq!(sampling, vec![0.75, 0.25]);
    }

    #[test]
    fn test_kuhn_discovers_all_info_sets() {
        let mut solver = kuhn_solver(7);
        solver.train(2_000).unwrap();

        // 3 cards x 4 decision histories ("", "k", "b", "kb")
        assert_eq!(solver.num_info_sets(), 12);
        assert_eq!(solver.stats().iterations, 2_000);
    }

    #[test]
    fn test_strategies_are_distributions() {
        let mut solver = kuhn_solver(11);
        solver.train(1_000).unwrap();

        for key in solver.storage().keys() {
            let node = solver.storage().get(&key).unwrap();
            for probs in [node.current_strategy(), node.average_strategy()] {
                let sum: f64 = probs.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", key, sum);
                assert!(probs.iter().all(|&p| p >= 0.0));
            }
        }
    }

    #[test]
    fn test_same_seed_same_table() {
        let mut a = kuhn_solver(42);
        let mut b = kuhn_solver(42);
        a.train(3_000).unwrap();
        b.train(3_000).unwrap();
        assert_eq!(a.strategy_table(), b.strategy_table());
    }

    #[test]
    fn test_reset_replays_identically() {
        let mut solver = kuhn_solver(5);
        solver.train(500).unwrap();
        let first = solver.strategy_table();

        solver.reset();
        assert_eq!(solver.num_info_sets(), 0);
        solver.train(500).unwrap();
        assert_eq!(solver.strategy_table(), first);
    }

    #[test]
    fn test_callback_interval() {
        let mut solver = kuhn_solver(1);
        let mut seen = Vec::new();
        solver
            .train_with_callback(100, 25, |stats| seen.push(stats.iterations))
            .unwrap();
        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_checkpoints_record_history() {
        let mut solver = kuhn_solver(3);
        solver.train_with_checkpoints(&[200, 100, 200]).unwrap();

        let history = &solver.stats().exploitability_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].iteration, 100);
        assert_eq!(history[1].iteration, 200);
        assert!(history.iter().all(|p| p.exploitability >= 0.0));
        assert_eq!(solver.iteration(), 200);
    }

    #[test]
    fn test_exploration_still_converges() {
        let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
        let config = CFRConfig::default().with_seed(9).with_exploration(0.3);
        let mut solver = CFRSolver::new(game, config).unwrap();
        solver.train(20_000).unwrap();
        let value = solver.exploitability().unwrap();
        assert!(value < 0.1, "exploitability {} with exploration", value);
    }

    #[test]
    fn test_cfr_plus_keeps_regrets_non_negative() {
        let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
        let mut solver = CFRSolver::new(game, CFRConfig::fast().with_seed(2)).unwrap();
        solver.train(1_000).unwrap();
        for key in solver.storage().keys() {
            let node = solver.storage().get(&key).unwrap();
            assert!(node.regrets().iter().all(|&r| r >= 0.0), "{}", key);
        }
    }
}
