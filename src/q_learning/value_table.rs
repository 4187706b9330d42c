//! Value table for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Mapping from (position key, action) to an estimated return.
///
/// Reading a pair that was never written yields `0.0` and does **not** insert
/// it, so probing the table during action selection never grows it. Entries
/// are only written by the agent's update rule.
///
/// ```compile_fail
/// use qlearn_ttt::{StateKey, q_learning::ValueTable};
///
/// let mut table = ValueTable::new();
/// table.set(StateKey::new("X........"), 4, 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<StateKey, HashMap<usize, f64>>,
}

impl ValueTable {
    /// Value returned for pairs that were never written
    pub const DEFAULT_VALUE: f64 = 0.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a state-action pair, `0.0` if absent
    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(Self::DEFAULT_VALUE)
    }

    /// Whether a value has been stored for the pair
    pub fn contains(&self, state: &StateKey, action: usize) -> bool {
        self.values
            .get(state)
            .is_some_and(|actions| actions.contains_key(&action))
    }

    /// Set the value for a state-action pair
    pub(crate) fn set(&mut self, state: StateKey, action: usize, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Maximum value over `legal_actions`, `None` when there are none
    pub fn max_value(&self, state: &StateKey, legal_actions: &[usize]) -> Option<f64> {
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
    }

    /// All legal actions attaining the maximum value, in input order
    pub fn best_actions(&self, state: &StateKey, legal_actions: &[usize]) -> Vec<usize> {
        let Some(max) = self.max_value(state, legal_actions) else {
            return Vec::new();
        };
        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == max)
            .collect()
    }

    /// Number of stored state-action values
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct positions with at least one stored value
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Iterate over every stored `(state, action, value)`
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, usize, f64)> {
        self.values.iter().flat_map(|(state, actions)| {
            actions
                .iter()
                .map(move |(&action, &value)| (state, action, value))
        })
    }

    /// Remove every stored value
    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}
