//! The trained strategy table.
//!
//! A [`StrategyTable`] maps information-set keys to a probability
//! distribution over that set's legal actions, in `legal_actions` order.
//! It is what training produces and what evaluation and play consume.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cfr::storage::RegretStorage;

/// Distribution over the legal actions of one information set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSetStrategy {
    /// Action names, when known.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    /// Probability per action, summing to 1.
    pub probabilities: Vec<f64>,
}

/// Mapping from information-set key to action distribution.
///
/// Keys iterate in sorted order, so two tables built from the same training
/// run print and compare identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyTable {
    entries: BTreeMap<String, InfoSetStrategy>,
}

impl StrategyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the average-strategy table from trained storage.
    pub fn from_storage(storage: &RegretStorage) -> Self {
        let entries = storage
            .average_strategies()
            .into_iter()
            .map(|(key, probabilities)| {
                let actions = storage.action_names(&key).unwrap_or_default();
                (key, InfoSetStrategy { actions, probabilities })
            })
            .collect();
        Self { entries }
    }

    /// Insert or replace the distribution for `key`.
    pub fn insert(&mut self, key: impl Into<String>, probabilities: Vec<f64>) {
        self.entries.insert(
            key.into(),
            InfoSetStrategy {
                actions: Vec::new(),
                probabilities,
            },
        );
    }

    /// Look up a stored distribution.
    pub fn get(&self, key: &str) -> Option<&InfoSetStrategy> {
        self.entries.get(key)
    }

    /// Distribution for `key`, uniform over `num_actions` if the key was
    /// never visited during training.
    pub fn probabilities(&self, key: &str, num_actions: usize) -> Vec<f64> {
        match self.entries.get(key) {
            Some(entry) => {
                debug_assert_eq!(entry.probabilities.len(), num_actions, "at {}", key);
                entry.probabilities.clone()
            }
            None if num_actions == 0 => Vec::new(),
            None => vec![1.0 / num_actions as f64; num_actions],
        }
    }

    /// Sample an action index for an agent playing this table.
    pub fn sample_action<R: Rng>(&self, key: &str, num_actions: usize, rng: &mut R) -> usize {
        sample_index(&self.probabilities(key, num_actions), rng.gen())
    }

    /// Number of information sets in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys and distributions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoSetStrategy)> {
        self.entries.iter()
    }
}

/// Pick the index whose cumulative probability first exceeds `r` in [0, 1).
pub(crate) fn sample_index(probabilities: &[f64], r: f64) -> usize {
    let mut cumsum = 0.0;

    for (i, &prob) in probabilities.iter().enumerate() {
        cumsum += prob;
        if r < cumsum {
            return i;
        }
    }

    // Floating point shortfall lands on the last action that can be played
    probabilities
        .iter()
        .rposition(|&p| p > 0.0)
        .unwrap_or(probabilities.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_index() {
        let probs = [0.2, 0.5, 0.3];
        assert_eq!(sample_index(&probs, 0.0), 0);
        assert_eq!(sample_index(&probs, 0.19), 0);
        assert_eq!(sample_index(&probs, 0.2), 1);
        assert_eq!(sample_index(&probs, 0.69), 1);
        assert_eq!(sample_index(&probs, 0.99), 2);
        assert_eq!(sample_index(&[0.5, 0.4999999], 0.9999999999), 1);
        assert_eq!(sample_index(&[0.9999999, 0.0], 0.99999999), 0);
    }

    #[test]
    fn test_unknown_key_is_uniform() {
        let table = StrategyTable::new();
        assert_eq!(table.probabilities("J|", 2), vec![0.5, 0.5]);
        assert!(table.probabilities("J|", 0).is_empty());
    }

    #[test]
    fn test_sample_action_follows_pure_strategy() {
        let mut table = StrategyTable::new();
        table.insert("K|", vec![0.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(table.sample_action("K|", 2, &mut rng), 1);
        }
    }

    #[test]
    fn test_json_output_is_keyed_by_info_set() {
        let mut table = StrategyTable::new();
        table.insert("Q|", vec![1.0, 0.0]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Q|":{"probabilities":[1.0,0.0]}}"#);
    }

    #[test]
    fn test_from_storage_carries_names() {
        let storage = RegretStorage::new();
        storage.accumulate_strategy("J|", 1.0, &[0.75, 0.25]);
        storage.set_action_names("J|", vec!["Check".into(), "Bet".into()]);

        let table = StrategyTable::from_storage(&storage);
        let entry = table.get("J|").unwrap();
        assert_eq!(entry.actions, vec!["Check", "Bet"]);
        assert_eq!(entry.probabilities, vec![0.75, 0.25]);
        assert_eq!(table.len(), 1);
    }
}
