//! Per-episode reports and the rolling reward average used for monitoring.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::Outcome;

/// What happened in one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Plies played by both sides
    pub plies: usize,
    /// Most recent reward observed
    pub final_reward: f64,
    /// Sum of rewards credited to the agent
    pub total_reward: f64,
    /// Learning updates applied
    pub updates: usize,
}

impl EpisodeReport {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_reward(self.total_reward)
    }
}

/// One monitoring point on the learning curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// 1-based episode index
    pub episode: usize,
    /// Exploration rate after the episode's decay
    pub epsilon: f64,
    /// Mean episode reward over the trailing window
    pub average_reward: f64,
}

/// Mean over the most recent `capacity` values.
#[derive(Debug, Clone)]
pub struct RollingAverage {
    window: VecDeque<f64>,
    capacity: usize,
}

impl RollingAverage {
    /// `capacity` is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    /// Mean of the buffered values, `0.0` when empty.
    pub fn mean(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().sum::<f64>() / self.window.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
