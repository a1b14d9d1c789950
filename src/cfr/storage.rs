//! Storage for CFR regrets and strategies.
//!
//! One [`Node`] per information set holds the cumulative regret and
//! cumulative strategy weight for each legal action. [`RegretStorage`] is the
//! table of nodes shared by a whole training run.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Normalize non-negative weights to sum 1, falling back to uniform when the
/// total mass is zero.
fn normalize_or_uniform(weights: Vec<f64>) -> Vec<f64> {
    let n = weights.len();
    if n == 0 {
        return weights;
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.into_iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / n as f64; n]
    }
}

/// Accumulators for a single information set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Cumulative counterfactual regret per action. Any sign.
    regrets: Vec<f64>,
    /// Cumulative reach-weighted strategy per action. Never decreases.
    strategy_sum: Vec<f64>,
}

impl Node {
    /// Create a zeroed node for `num_actions` legal actions.
    pub fn new(num_actions: usize) -> Self {
        Self {
            regrets: vec![0.0; num_actions],
            strategy_sum: vec![0.0; num_actions],
        }
    }

    /// Number of legal actions at this information set.
    pub fn len(&self) -> usize {
        self.regrets.len()
    }

    /// True for a node without actions.
    pub fn is_empty(&self) -> bool {
        self.regrets.is_empty()
    }

    /// Cumulative regrets.
    pub fn regrets(&self) -> &[f64] {
        &self.regrets
    }

    /// Cumulative strategy weights.
    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    /// Regret matching over the positive part of cumulative regret.
    ///
    /// Uniform when no action has positive regret.
    pub fn current_strategy(&self) -> Vec<f64> {
        normalize_or_uniform(self.regrets.iter().map(|&r| r.max(0.0)).collect())
    }

    /// Normalized cumulative strategy weight.
    ///
    /// Uniform when the node was never reached with positive probability.
    pub fn average_strategy(&self) -> Vec<f64> {
        normalize_or_uniform(self.strategy_sum.clone())
    }

    /// Add `delta` to the cumulative regret of one action.
    pub fn update_regret(&mut self, action: usize, delta: f64) {
        self.regrets[action] += delta;
    }

    /// Add `reach_probability * strategy[a]` to every action's strategy weight.
    pub fn accumulate_strategy(&mut self, reach_probability: f64, strategy: &[f64]) {
        debug_assert!(reach_probability >= 0.0, "negative reach probability");
        debug_assert_eq!(strategy.len(), self.strategy_sum.len());

        for (sum, &prob) in self.strategy_sum.iter_mut().zip(strategy) {
            *sum += reach_probability * prob;
        }
    }
}

/// Thread-safe storage for regrets and strategy sums.
///
/// This struct manages the core data structure used by CFR: a map from
/// information-set key to [`Node`]. Every mutating method takes the write
/// lock for its whole read-modify-write, so two trajectories touching the
/// same information set never interleave inside one update.
///
/// Nodes are created lazily on first visit and never removed.
#[derive(Debug)]
pub struct RegretStorage {
    /// info_key -> accumulators
    nodes: RwLock<FxHashMap<String, Node>>,

    /// info_key -> [action name per action]
    action_names: RwLock<FxHashMap<String, Vec<String>>>,
}

impl Default for RegretStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegretStorage {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(FxHashMap::default()),
            action_names: RwLock::new(FxHashMap::default()),
        }
    }

    /// Create storage with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: RwLock::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
            action_names: RwLock::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<String, Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<String, Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the node for `info_key`, inserting a zeroed one if absent.
    ///
    /// Returns a snapshot; later updates go through the storage methods.
    pub fn get_or_create(&self, info_key: &str, num_actions: usize) -> Node {
        let mut nodes = self.write();
        let node = nodes
            .entry(info_key.to_string())
            .or_insert_with(|| Node::new(num_actions));
        debug_assert_eq!(
            node.len(),
            num_actions,
            "Action count mismatch for info set {}",
            info_key
        );
        node.clone()
    }

    /// Snapshot of a node if it has been visited.
    pub fn get(&self, info_key: &str) -> Option<Node> {
        self.read().get(info_key).cloned()
    }

    /// Get current strategy for an info set using regret matching.
    ///
    /// Unseen info sets get the uniform strategy.
    pub fn current_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.read().get(info_key) {
            Some(node) => node.current_strategy(),
            None => Node::new(num_actions).current_strategy(),
        }
    }

    /// Get average strategy for an info set (Nash equilibrium approximation).
    pub fn average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.read().get(info_key) {
            Some(node) => node.average_strategy(),
            None => Node::new(num_actions).average_strategy(),
        }
    }

    /// Add `delta` to the regret of one action.
    pub fn update_regret(&self, info_key: &str, num_actions: usize, action: usize, delta: f64) {
        let mut nodes = self.write();
        nodes
            .entry(info_key.to_string())
            .or_insert_with(|| Node::new(num_actions))
            .update_regret(action, delta);
    }

    /// Update regrets for every action of an info set.
    ///
    /// # Arguments
    /// * `info_key` - The information set key
    /// * `regret_updates` - Regret delta for each action (action_value - node_value)
    /// * `use_cfr_plus` - If true, floor negative regrets to 0
    pub fn update_regrets(&self, info_key: &str, regret_updates: &[f64], use_cfr_plus: bool) {
        let mut nodes = self.write();
        let node = nodes
            .entry(info_key.to_string())
            .or_insert_with(|| Node::new(regret_updates.len()));
        debug_assert_eq!(node.len(), regret_updates.len());

        for (action, &delta) in regret_updates.iter().enumerate() {
            node.update_regret(action, delta);
            if use_cfr_plus && node.regrets[action] < 0.0 {
                node.regrets[action] = 0.0;
            }
        }
    }

    /// Add `reach_probability * strategy` to the strategy sum of an info set.
    pub fn accumulate_strategy(&self, info_key: &str, reach_probability: f64, strategy: &[f64]) {
        let mut nodes = self.write();
        nodes
            .entry(info_key.to_string())
            .or_insert_with(|| Node::new(strategy.len()))
            .accumulate_strategy(reach_probability, strategy);
    }

    /// Store action names for an info set (only stores if not already present).
    pub fn set_action_names(&self, info_key: &str, names: Vec<String>) {
        let mut action_names = self
            .action_names
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        action_names.entry(info_key.to_string()).or_insert(names);
    }

    /// Get action names for an info set.
    pub fn action_names(&self, info_key: &str) -> Option<Vec<String>> {
        self.action_names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(info_key)
            .cloned()
    }

    /// Get the number of information sets stored.
    pub fn num_info_sets(&self) -> usize {
        self.read().len()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, info_key: &str) -> bool {
        self.read().contains_key(info_key)
    }

    /// All information set keys, in arbitrary order.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Average strategy of every stored node.
    pub fn average_strategies(&self) -> Vec<(String, Vec<f64>)> {
        self.read()
            .iter()
            .map(|(key, node)| (key.clone(), node.average_strategy()))
            .collect()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.write().clear();
        self.action_names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Clone for RegretStorage {
    fn clone(&self) -> Self {
        Self {
            nodes: RwLock::new(self.read().clone()),
            action_names: RwLock::new(
                self.action_names
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_distribution(probs: &[f64]) {
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "sum {} != 1", sum);
        assert!(probs.iter().all(|&p| p >= 0.0), "negative entry in {:?}", probs);
    }

    #[test]
    fn test_regret_matching() {
        let mut node = Node::new(3);
        node.update_regret(0, 3.0);
        node.update_regret(1, -5.0);
        node.update_regret(2, 1.0);

        let strategy = node.current_strategy();
        assert_distribution(&strategy);
        assert_eq!(strategy, vec![0.75, 0.0, 0.25]);
    }

    #[test]
    fn test_non_positive_regrets_give_uniform() {
        let mut node = Node::new(4);
        node.update_regret(0, -1.0);
        node.update_regret(2, -0.5);

        assert_eq!(node.current_strategy(), vec![0.25; 4]);
        assert_eq!(Node::new(3).current_strategy(), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_average_strategy_fallback_and_normalization() {
        let mut node = Node::new(2);
        assert_eq!(node.average_strategy(), vec![0.5, 0.5]);

        node.accumulate_strategy(0.0, &[0.3, 0.7]);
        assert_eq!(node.average_strategy(), vec![0.5, 0.5]);

        node.accumulate_strategy(2.0, &[0.25, 0.75]);
        node.accumulate_strategy(2.0, &[0.75, 0.25]);
        let avg = node.average_strategy();
        assert_distribution(&avg);
        assert!((avg[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_strategy_sum_monotone() {
        let mut node = Node::new(2);
        let mut previous = node.strategy_sum().to_vec();
        for step in 0..10 {
            let reach = step as f64 * 0.1;
            node.accumulate_strategy(reach, &[0.4, 0.6]);
            for (now, before) in node.strategy_sum().iter().zip(&previous) {
                assert!(now >= before);
            }
            previous = node.strategy_sum().to_vec();
        }
    }

    #[test]
    fn test_storage_get_or_create() {
        let storage = RegretStorage::new();
        assert!(!storage.contains("J|"));

        let node = storage.get_or_create("J|", 2);
        assert_eq!(node, Node::new(2));
        assert!(storage.contains("J|"));
        assert_eq!(storage.num_info_sets(), 1);

        storage.update_regret("J|", 2, 1, 4.0);
        let node = storage.get_or_create("J|", 2);
        assert_eq!(node.regrets(), &[0.0, 4.0]);
        assert_eq!(storage.num_info_sets(), 1);
    }

    #[test]
    fn test_storage_unseen_is_uniform() {
        let storage = RegretStorage::new();
        assert_eq!(storage.current_strategy("missing", 3), vec![1.0 / 3.0; 3]);
        assert_eq!(storage.average_strategy("missing", 2), vec![0.5, 0.5]);
        assert!(!storage.contains("missing"));
    }

    #[test]
    fn test_update_regrets_cfr_plus_floor() {
        let storage = RegretStorage::new();
        storage.update_regrets("K|b", &[-2.0, 3.0], true);
        storage.update_regrets("Q|b", &[-2.0, 3.0], false);

        assert_eq!(storage.get("K|b").map(|n| n.regrets().to_vec()), Some(vec![0.0, 3.0]));
        assert_eq!(storage.get("Q|b").map(|n| n.regrets().to_vec()), Some(vec![-2.0, 3.0]));
    }

    #[test]
    fn test_accumulate_and_average() {
        let storage = RegretStorage::new();
        storage.accumulate_strategy("Q|", 1.0, &[1.0, 0.0]);
        storage.accumulate_strategy("Q|", 3.0, &[0.0, 1.0]);

        assert_eq!(storage.average_strategy("Q|", 2), vec![0.25, 0.75]);
    }

    #[test]
    fn test_action_names_stored_once() {
        let storage = RegretStorage::new();
        storage.set_action_names("J|", vec!["Check".into(), "Bet".into()]);
        storage.set_action_names("J|", vec!["x".into(), "y".into()]);
        assert_eq!(
            storage.action_names("J|"),
            Some(vec!["Check".to_string(), "Bet".to_string()])
        );
    }

    #[test]
    fn test_concurrent_updates_are_atomic() {
        let storage = RegretStorage::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1_000 {
                        storage.update_regret("shared", 2, 0, 1.0);
                        storage.accumulate_strategy("shared", 1.0, &[0.5, 0.5]);
                    }
                });
            }
        });

        let node = storage.get("shared").unwrap();
        assert_eq!(node.regrets()[0], 4_000.0);
        assert_eq!(node.strategy_sum(), &[2_000.0, 2_000.0]);
    }

    #[test]
    fn test_clear() {
        let storage = RegretStorage::with_capacity(16);
        storage.get_or_create("a", 2);
        storage.set_action_names("a", vec!["p".into(), "b".into()]);
        storage.clear();
        assert_eq!(storage.num_info_sets(), 0);
        assert!(storage.action_names("a").is_none());
    }
}
