//! Epsilon-greedy Q-learning agent
//!
//! The agent owns its value table, its exploration rate and its random
//! source. Nothing here is shared between agents.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    ports::{Learner, Policy, Transition},
    q_learning::{config::QLearningConfig, value_table::ValueTable},
    types::StateKey,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Greedy choice with uniform tie-breaking among maximal actions.
pub(crate) fn greedy_choice(
    table: &ValueTable,
    rng: &mut StdRng,
    state: &StateKey,
    legal_actions: &[usize],
) -> Option<usize> {
    table.best_actions(state, legal_actions).choose(rng).copied()
}

/// Q-learning agent (off-policy TD control)
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    table: ValueTable,
    config: QLearningConfig,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters.
    pub fn new(config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_table(ValueTable::new(), config))
    }

    /// Wrap an existing table; exploration starts at `config.epsilon`.
    pub fn from_table(table: ValueTable, config: QLearningConfig) -> Self {
        Self {
            table,
            epsilon: config.epsilon,
            config,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// ε-greedy action selection.
    ///
    /// With probability `epsilon` a uniformly random legal action is
    /// returned; otherwise one of the maximal-value actions, chosen
    /// uniformly among ties. Returns `None` for an empty action set.
    pub fn select_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        if legal_actions.is_empty() {
            return None;
        }
        if self.rng.random::<f64>() < self.epsilon {
            legal_actions.choose(&mut self.rng).copied()
        } else {
            self.greedy_action(state, legal_actions)
        }
    }

    /// Greedy action selection (exploration forced to zero).
    pub fn greedy_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        greedy_choice(&self.table, &mut self.rng, state, legal_actions)
    }

    /// Q-learning update, applied immediately.
    ///
    /// The target is `reward` alone when `terminal` is set or there are no
    /// next actions, otherwise `reward + γ · max_a' Q(next_state, a')`.
    /// Returns the new value stored for `(state, action)`.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[usize],
        terminal: bool,
    ) -> f64 {
        let target = match self.table.max_value(next_state, next_legal_actions) {
            Some(max_next) if !terminal => reward + self.config.discount_factor * max_next,
            _ => reward,
        };
        let current = self.table.get(state, action);
        let updated = current + self.config.learning_rate * (target - current);
        self.table.set(state.clone(), action, updated);
        updated
    }

    /// Decay epsilon after an episode, never below the floor
    pub fn decay_epsilon(&mut self) {
        self.epsilon = self.config.decayed(self.epsilon);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate (0.0 for evaluation).
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Clear learned values and restore the initial exploration rate
    pub fn reset(&mut self) {
        self.table.clear();
        self.epsilon = self.config.epsilon;
        self.rng = build_rng(self.rng_seed);
    }
}

impl Policy for QLearningAgent {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        self.select_action(state, legal_actions)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

impl Learner for QLearningAgent {
    fn update(&mut self, transition: &Transition) {
        QLearningAgent::update(
            self,
            &transition.state,
            transition.action,
            transition.reward,
            &transition.next_state,
            &transition.next_legal_actions,
            transition.terminal,
        );
    }

    fn finish_episode(&mut self) {
        self.decay_epsilon();
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon
    }
}

/// Borrowed view of an agent that always acts greedily.
///
/// Used for evaluation episodes and as a "challenge mode" opponent.
pub struct Greedy<'a>(pub &'a mut QLearningAgent);

impl Policy for Greedy<'_> {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        self.0.greedy_action(state, legal_actions)
    }

    fn name(&self) -> &str {
        "Q-Learning (greedy)"
    }
}
