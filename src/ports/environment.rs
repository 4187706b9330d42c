//! Environment port - the pure state-transition model episodes run against

use std::fmt::Debug;

use crate::{Result, types::StateKey};

/// Outcome of applying one action
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Position after the action
    pub state: StateKey,
    /// Immediate reward, from the environment's fixed reward perspective
    pub reward: f64,
    /// Whether the episode ended with this action
    pub done: bool,
}

/// A resettable, turn-based environment.
///
/// Environments own no learning logic. They only know the current position,
/// whose turn it is, which actions are legal, and what reward an action
/// produces. Rewards are always reported from one fixed perspective, the
/// side returned by [`Environment::agent_side`].
///
/// # Event Sequence
///
/// 1. `reset()` - the only way to begin an episode
/// 2. `legal_actions()` / `current_mover()` - inspect the position
/// 3. `step(action)` - repeated until `done`
pub trait Environment {
    /// Identity of the side to move (`()` for single-mover worlds)
    type Mover: Copy + Eq + Debug;

    /// Reinitialize to the start position and return its key.
    fn reset(&mut self) -> StateKey;

    /// Key of the current position.
    fn state_key(&self) -> StateKey;

    /// Legal actions in the current position (empty once done).
    fn legal_actions(&self) -> Vec<usize>;

    /// Apply `action` as the current mover's move.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] (or [`crate::Error::GameOver`]
    /// after termination) when the action is not legal. This is a caller
    /// contract violation; the episode must be aborted.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Side to move in the current position.
    fn current_mover(&self) -> Self::Mover;

    /// The side whose interests the reward signal represents.
    fn agent_side(&self) -> Self::Mover;

    /// Whether the current episode has ended.
    fn is_done(&self) -> bool;

    /// Safety bound on plies per episode.
    fn max_plies(&self) -> usize;

    /// Human-readable rendering of the current position.
    fn render(&self) -> String;

    /// Short identifier used in logs and saved metadata.
    fn name(&self) -> &str;
}
