//! Hyperparameters for a Q-learning agent.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Learning and exploration parameters for one training run.
///
/// Defaults are the tic-tac-toe settings: α = 0.2, γ = 0.9, and ε starting
/// at 0.3, decaying ×0.999 per episode with a floor of 0.2.
///
/// # Examples
///
/// ```
/// use qlearn_ttt::q_learning::QLearningConfig;
///
/// let config = QLearningConfig::default()
///     .with_learning_rate(0.5)
///     .with_epsilon(0.5, 0.05, 0.99);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Exploration floor
    pub epsilon_min: f64,
    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_factor: 0.9,
            epsilon: 0.3,
            epsilon_min: 0.2,
            epsilon_decay: 0.999,
        }
    }
}

impl QLearningConfig {
    /// Settings used for the 1D line world
    pub fn line_world() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.2,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the whole exploration schedule at once.
    pub fn with_epsilon(mut self, epsilon: f64, epsilon_min: f64, epsilon_decay: f64) -> Self {
        self.epsilon = epsilon;
        self.epsilon_min = epsilon_min;
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Exploration rate after one more episode: `max(ε_min, ε · decay)`.
    pub fn decayed(&self, epsilon: f64) -> f64 {
        (epsilon * self.epsilon_decay).max(self.epsilon_min)
    }

    /// Reject parameters outside their meaningful ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, message: String) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::invalid_config(message))
            }
        }

        check(
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            format!("learning rate {} must be in (0, 1]", self.learning_rate),
        )?;
        check(
            (0.0..=1.0).contains(&self.discount_factor),
            format!("discount factor {} must be in [0, 1]", self.discount_factor),
        )?;
        check(
            (0.0..=1.0).contains(&self.epsilon),
            format!("epsilon {} must be in [0, 1]", self.epsilon),
        )?;
        check(
            (0.0..=self.epsilon).contains(&self.epsilon_min),
            format!(
                "epsilon_min {} must be in [0, epsilon={}]",
                self.epsilon_min, self.epsilon
            ),
        )?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            format!("epsilon decay {} must be in (0, 1]", self.epsilon_decay),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(QLearningConfig::default().validate().is_ok());
        assert!(QLearningConfig::line_world().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let bad = [
            QLearningConfig::default().with_learning_rate(0.0),
            QLearningConfig::default().with_learning_rate(1.5),
            QLearningConfig::default().with_discount_factor(-0.1),
            QLearningConfig::default().with_epsilon(1.2, 0.1, 0.99),
            QLearningConfig::default().with_epsilon(0.1, 0.3, 0.99),
            QLearningConfig::default().with_epsilon(0.3, 0.1, 0.0),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decay_respects_floor() {
        let config = QLearningConfig::default();
        assert!((config.decayed(0.3) - 0.2997).abs() < 1e-12);
        assert_eq!(config.decayed(0.2), 0.2);
    }
}
