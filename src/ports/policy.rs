//! Policy and learner ports
//!
//! Every move source (the learning agent, a frozen greedy table, a random or
//! scripted opponent, a human at the terminal) implements [`Policy`], so the
//! episode runner can be driven by deterministic stand-ins in tests.

use crate::types::StateKey;

/// Anything that can pick a move from a position.
pub trait Policy {
    /// Choose one of `legal_actions` for `state`.
    ///
    /// Returns `None` when `legal_actions` is empty; callers must check for
    /// this before stepping the environment.
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize>;

    /// Get the policy's name.
    ///
    /// Used for identification in logs and error messages.
    fn name(&self) -> &str;
}

/// One recorded agent transition, consumed immediately by [`Learner::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StateKey,
    pub action: usize,
    pub reward: f64,
    pub next_state: StateKey,
    pub next_legal_actions: Vec<usize>,
    pub terminal: bool,
}

/// A policy that learns from transitions.
pub trait Learner: Policy {
    /// Apply the learning rule for one transition, immediately.
    fn update(&mut self, transition: &Transition);

    /// Called once after every training episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for learners without an exploration schedule.
    fn finish_episode(&mut self) {}

    /// Current exploration probability.
    fn exploration_rate(&self) -> f64 {
        0.0
    }
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        (**self).choose_action(state, legal_actions)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        (**self).choose_action(state, legal_actions)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
