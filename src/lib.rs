//! Tabular Q-learning for tic-tac-toe
//!
//! This crate provides:
//! - Tic-tac-toe and a 1D line world as turn-based environments
//! - An ε-greedy Q-learning agent over exact position keys
//! - A two-ply episode runner crediting opponent replies to the agent's move
//! - Training with exploration decay and rolling-average monitoring
//! - Greedy evaluation, interactive play and table persistence

pub mod adapters;
pub mod cli;
pub mod error;
pub mod line_world;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use types::{Outcome, StateKey};
