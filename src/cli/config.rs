//! Run configuration files for CLI commands
//!
//! Every field is optional; explicit command-line flags win over the file,
//! and the file wins over the environment's built-in defaults.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which environment to train on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EnvChoice {
    /// Tic-tac-toe, agent plays O against a random X
    #[value(name = "tictactoe", alias = "ttt")]
    #[serde(alias = "tictactoe")]
    TicTacToe,
    /// 1D line world: walk from the start cell to the goal
    #[value(name = "line", alias = "line-world")]
    Line,
}

/// Hyperparameters read from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub env: Option<EnvChoice>,
    pub episodes: Option<usize>,
    pub learning_rate: Option<f64>,
    pub discount_factor: Option<f64>,
    pub epsilon: Option<f64>,
    pub epsilon_min: Option<f64>,
    pub epsilon_decay: Option<f64>,
    pub log_slices: Option<usize>,
    pub avg_window_frac: Option<f64>,
    pub seed: Option<u64>,
    pub opponent: Option<String>,
    pub line_cells: Option<usize>,
    pub line_start: Option<usize>,
    pub line_goal: Option<usize>,
    pub line_max_steps: Option<usize>,
}

impl RunConfig {
    /// Load a run configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// First of `flag` and `file` that is set
pub(crate) fn pick<T>(flag: Option<T>, file: Option<T>) -> Option<T> {
    flag.or(file)
}
