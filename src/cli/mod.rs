//! CLI infrastructure for the Q-learning trainer
//!
//! This module provides the command-line interface for training, evaluating
//! and playing against tabular Q-learning agents.

pub mod commands;
pub mod config;
pub mod output;
