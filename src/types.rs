//! Newtype wrappers shared across environments and the value table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical string form of an environment position, used as a value-table key.
///
/// Tic-Tac-Toe positions encode as nine characters (`.`, `X`, `O`) in
/// row-major order; the line world encodes its cell index in decimal.
/// Keys are exact: no symmetry reduction is applied.
///
/// # Examples
///
/// ```
/// use qlearn_ttt::types::StateKey;
///
/// let key = StateKey::new("X...O....");
/// assert_eq!(key.as_str(), "X...O....");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn new(key: impl Into<String>) -> Self {
        StateKey(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateKey {
    fn from(value: &str) -> Self {
        StateKey(value.to_string())
    }
}

impl From<usize> for StateKey {
    fn from(index: usize) -> Self {
        StateKey(index.to_string())
    }
}

/// Board size constant for Tic-Tac-Toe.
pub const BOARD_SIZE: usize = 9;

/// Result of an episode from the rewarded side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Classify an episode by the sign of its reward.
    pub fn from_reward(reward: f64) -> Self {
        if reward > 0.0 {
            Outcome::Win
        } else if reward < 0.0 {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_from_index() {
        assert_eq!(StateKey::from(3).as_str(), "3");
    }

    #[test]
    fn test_outcome_from_reward() {
        assert_eq!(Outcome::from_reward(1.0), Outcome::Win);
        assert_eq!(Outcome::from_reward(-1.0), Outcome::Loss);
        assert_eq!(Outcome::from_reward(0.0), Outcome::Draw);
    }

    #[test]
    fn test_state_key_serializes_as_plain_string() {
        let key = StateKey::new("XO.......");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"XO.......\"");
    }
}
