//! Training and evaluation pipeline
//!
//! This module provides:
//! - The two-ply episode runner that feeds transitions to a learner
//! - The training loop with exploration decay and rolling monitoring
//! - Greedy evaluation and interactive play
//! - Observers for progress bars, console logs, CSV curves and JSONL episodes

pub mod episode;
pub mod evaluation;
pub mod metrics;
pub mod observers;
pub mod opponents;
pub mod training;

pub use episode::run_training_episode;
pub use evaluation::{EvaluationSummary, evaluate, play_episode, play_greedy_episode};
pub use metrics::{CurvePoint, EpisodeReport, RollingAverage};
pub use observers::{ConsoleLogObserver, CsvCurveObserver, JsonlEpisodeObserver, ProgressObserver};
pub use opponents::{HumanPolicy, RandomOpponent, ScriptedPolicy};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult, train_q_learning};

pub use crate::ports::{Learner, Observer};
