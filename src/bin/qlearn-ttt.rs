//! qlearn-ttt CLI - Tabular Q-learning for tic-tac-toe and a 1D line world
//!
//! This CLI provides a unified interface for:
//! - Training an agent against a random opponent
//! - Evaluating a saved agent
//! - Playing against a saved agent from the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qlearn-ttt")]
#[command(version, about = "Tabular Q-learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(Box<qlearn_ttt::cli::commands::train::TrainArgs>),

    /// Evaluate a trained agent against a random opponent
    Evaluate(qlearn_ttt::cli::commands::evaluate::EvaluateArgs),

    /// Play against a trained agent
    Play(qlearn_ttt::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qlearn_ttt::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => qlearn_ttt::cli::commands::evaluate::execute(args),
        Commands::Play(args) => qlearn_ttt::cli::commands::play::execute(args),
    }
}
