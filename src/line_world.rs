//! One-dimensional toy world
//!
//! A line of cells `[S, ., ., ., ., ., G]`. The walker starts at `start` and
//! moves left (action 0) or right (action 1). Reaching `goal` pays `+1.0` and
//! ends the episode; stepping off the left edge pays `-1.0`, ends the
//! episode, and snaps the reported position back to cell 0.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Environment, Step},
    q_learning::ValueTable,
    types::StateKey,
};

/// Move one cell left
pub const LEFT: usize = 0;
/// Move one cell right
pub const RIGHT: usize = 1;

/// Shape of the line world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWorldConfig {
    pub n_cells: usize,
    pub start: usize,
    pub goal: usize,
    pub max_steps: usize,
}

impl Default for LineWorldConfig {
    fn default() -> Self {
        Self {
            n_cells: 7,
            start: 0,
            goal: 6,
            max_steps: 50,
        }
    }
}

impl LineWorldConfig {
    /// Check that start and goal lie on the line and differ.
    pub fn validate(&self) -> Result<()> {
        if self.n_cells < 2 {
            return Err(Error::invalid_config("line world needs at least 2 cells"));
        }
        if self.start >= self.n_cells || self.goal >= self.n_cells {
            return Err(Error::invalid_config(format!(
                "start ({}) and goal ({}) must be below n_cells ({})",
                self.start, self.goal, self.n_cells
            )));
        }
        if self.start == self.goal {
            return Err(Error::invalid_config("start and goal must differ"));
        }
        if self.max_steps == 0 {
            return Err(Error::invalid_config("max_steps must be positive"));
        }
        Ok(())
    }
}

/// The 1D environment itself
#[derive(Debug, Clone)]
pub struct LineWorld {
    config: LineWorldConfig,
    pos: usize,
    done: bool,
}

impl LineWorld {
    /// Create a world, validating its shape.
    pub fn new(config: LineWorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pos: config.start,
            done: false,
        })
    }

    pub fn config(&self) -> &LineWorldConfig {
        &self.config
    }

    /// Current cell index
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Greedy policy per cell: arrows, `S`/`G` markers, `•` where values tie.
    pub fn render_policy(&self, table: &ValueTable) -> String {
        (0..self.config.n_cells)
            .map(|cell| {
                if cell == self.config.start {
                    return "S";
                }
                if cell == self.config.goal {
                    return "G";
                }
                let key = StateKey::from(cell);
                let left = table.get(&key, LEFT);
                let right = table.get(&key, RIGHT);
                if left > right {
                    "←"
                } else if right > left {
                    "→"
                } else {
                    "•"
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for LineWorld {
    fn default() -> Self {
        Self {
            config: LineWorldConfig::default(),
            pos: 0,
            done: false,
        }
    }
}

impl Environment for LineWorld {
    type Mover = ();

    fn reset(&mut self) -> StateKey {
        self.pos = self.config.start;
        self.done = false;
        StateKey::from(self.pos)
    }

    fn state_key(&self) -> StateKey {
        StateKey::from(self.pos)
    }

    fn legal_actions(&self) -> Vec<usize> {
        if self.done {
            Vec::new()
        } else {
            vec![LEFT, RIGHT]
        }
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if self.done {
            return Err(Error::InvalidAction {
                action,
                reason: "episode already ended".to_string(),
            });
        }

        let target = match action {
            LEFT => self.pos.checked_sub(1),
            RIGHT => Some((self.pos + 1).min(self.config.n_cells - 1)),
            _ => {
                return Err(Error::InvalidAction {
                    action,
                    reason: "expected 0 (left) or 1 (right)".to_string(),
                });
            }
        };

        let (next, reward, done) = match target {
            // Fell off the left edge; snap to 0 for display.
            None => (0, -1.0, true),
            Some(cell) if cell == self.config.goal => (cell, 1.0, true),
            Some(cell) => (cell, 0.0, false),
        };

        self.pos = next;
        self.done = done;

        Ok(Step {
            state: StateKey::from(next),
            reward,
            done,
        })
    }

    fn current_mover(&self) {}

    fn agent_side(&self) {}

    fn is_done(&self) -> bool {
        self.done
    }

    fn max_plies(&self) -> usize {
        self.config.max_steps
    }

    fn render(&self) -> String {
        (0..self.config.n_cells)
            .map(|cell| {
                if cell == self.pos {
                    'A'
                } else if cell == self.config.goal {
                    'G'
                } else {
                    '.'
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "line_world"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walking_right_reaches_goal() {
        let mut world = LineWorld::default();
        world.reset();
        for expected in 1..6 {
            let step = world.step(RIGHT).unwrap();
            assert_eq!(step.state, StateKey::from(expected));
            assert!(!step.done);
            assert_eq!(step.reward, 0.0);
        }
        let step = world.step(RIGHT).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, 1.0);
        assert!(world.legal_actions().is_empty());
    }

    #[test]
    fn test_falling_off_left_edge_snaps_back() {
        let mut world = LineWorld::default();
        world.reset();
        let step = world.step(LEFT).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, -1.0);
        assert_eq!(step.state, StateKey::from(0));
        assert_eq!(world.position(), 0);
    }

    #[test]
    fn test_right_edge_is_truncated_when_goal_is_interior() {
        let config = LineWorldConfig {
            n_cells: 4,
            start: 2,
            goal: 0,
            max_steps: 10,
        };
        let mut world = LineWorld::new(config).unwrap();
        world.reset();
        world.step(RIGHT).unwrap();
        let step = world.step(RIGHT).unwrap();
        assert_eq!(step.state, StateKey::from(3));
        assert!(!step.done);

        world.step(LEFT).unwrap();
        world.step(LEFT).unwrap();
        let step = world.step(LEFT).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, 1.0);
    }

    #[test]
    fn test_invalid_action_and_step_after_done() {
        let mut world = LineWorld::default();
        world.reset();
        assert!(matches!(
            world.step(2),
            Err(Error::InvalidAction { action: 2, .. })
        ));
        world.step(LEFT).unwrap();
        assert!(matches!(
            world.step(RIGHT),
            Err(Error::InvalidAction { action: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LineWorldConfig {
            n_cells: 3,
            start: 0,
            goal: 5,
            max_steps: 10,
        };
        assert!(LineWorld::new(config).is_err());
    }

    #[test]
    fn test_render_policy_marks_ties_and_preferences() {
        let world = LineWorld::default();
        let mut table = ValueTable::new();
        table.set(StateKey::from(1), RIGHT, 0.5);
        table.set(StateKey::from(2), LEFT, 0.5);
        assert_eq!(world.render_policy(&table), "S → ← • • • G");
    }
}
