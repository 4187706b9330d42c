//! Saved form of a trained agent.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    line_world::LineWorldConfig,
    q_learning::{
        agent::QLearningAgent, config::QLearningConfig, frozen::FrozenAgent,
        value_table::ValueTable,
    },
};

/// Which environment a table was trained on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentKind {
    #[default]
    TicTacToe,
    LineWorld(LineWorldConfig),
}

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes_trained: Option<usize>,
    /// Opponent trained against
    pub opponent: Option<String>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Environment the table belongs to
    pub environment: EnvironmentKind,
    /// Seconds since the Unix epoch when saved
    pub saved_at_unix: Option<u64>,
}

impl TrainingMetadata {
    /// Stamp the current time
    pub fn stamped(mut self) -> Self {
        self.saved_at_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());
        self
    }
}

/// Serializable snapshot of a trained agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub config: QLearningConfig,
    pub table: ValueTable,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            config: *agent.config(),
            table: agent.table().clone(),
            metadata,
        }
    }

    /// Fail unless written by this format version
    pub fn check_version(&self) -> Result<()> {
        if self.version == Self::VERSION {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            })
        }
    }

    /// Rebuild an agent for evaluation; exploration is forced to zero.
    ///
    /// # Errors
    ///
    /// Fails on a foreign format version or out-of-range hyperparameters.
    pub fn into_agent(self) -> Result<QLearningAgent> {
        self.check_version()?;
        self.config.validate()?;
        let mut agent = QLearningAgent::from_table(self.table, self.config);
        if let Some(seed) = self.metadata.seed {
            agent = agent.with_seed(seed.wrapping_add(1));
        }
        agent.set_epsilon(0.0);
        Ok(agent)
    }

    /// Rebuild a read-only greedy agent.
    pub fn into_frozen(self) -> Result<FrozenAgent> {
        self.check_version()?;
        Ok(FrozenAgent::new(self.table))
    }
}
