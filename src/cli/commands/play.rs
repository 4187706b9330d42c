//! Play command - A human plays X against a saved agent playing O

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    Error,
    adapters::load_agent,
    pipeline::HumanPolicy,
    ports::{Environment, Policy},
    q_learning::{EnvironmentKind, FrozenAgent},
    tictactoe::{Player, TicTacToeEnv},
    types::Outcome,
};

#[derive(Parser, Debug)]
#[command(about = "Play tic-tac-toe against a trained agent")]
pub struct PlayArgs {
    /// Path to trained agent file
    pub agent: PathBuf,

    /// Seed for the agent's tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run one interactive game; the human is X and moves first.
///
/// Returns the outcome from the agent's side.
pub fn play_session<R: BufRead, W: Write>(
    agent: &mut FrozenAgent,
    input: R,
    output: W,
) -> crate::Result<Outcome> {
    let mut human = HumanPolicy::new(input, output);
    let mut env = TicTacToeEnv::new();
    env.reset();

    writeln!(human.output(), "\nYou are X and move first. Cells are 0..8.")?;
    writeln!(human.output(), "{}", env.render())?;

    let mut reward = 0.0;
    while !env.is_done() {
        let legal = env.legal_actions();
        let (who, action) = if env.current_mover() == Player::X {
            let action = human.choose_action(&env.state_key(), &legal);
            match action {
                Some(action) => ("You", action),
                None => {
                    if let Some(source) = human.take_error() {
                        return Err(Error::Io {
                            operation: "read move".to_string(),
                            source,
                        });
                    }
                    if human.input_closed() {
                        return Err(Error::InputClosed);
                    }
                    return Err(Error::NoActionChosen {
                        policy: human.name().to_string(),
                    });
                }
            }
        } else {
            let action = agent.choose_move(env.board()).ok_or_else(|| Error::NoActionChosen {
                policy: agent.name().to_string(),
            })?;
            ("O", action)
        };

        reward = env.step(action)?.reward;
        writeln!(human.output(), "\n{who} played {action}")?;
        writeln!(human.output(), "{}", env.render())?;
    }

    let outcome = Outcome::from_reward(reward);
    let message = match outcome {
        Outcome::Win => "O wins!",
        Outcome::Loss => "You (X) win!",
        Outcome::Draw => "Draw",
    };
    writeln!(human.output(), "\nResult: {message}")?;
    Ok(outcome)
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let saved = load_agent(&args.agent)
        .with_context(|| format!("Failed to load agent from {}", args.agent.display()))?;
    if saved.metadata.environment != EnvironmentKind::TicTacToe {
        bail!(
            "{} was trained on {:?}; only tic-tac-toe agents can be played",
            args.agent.display(),
            saved.metadata.environment
        );
    }

    let mut agent = saved.into_frozen()?;
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    let stdin = std::io::stdin();
    play_session(&mut agent, stdin.lock(), std::io::stdout())?;
    Ok(())
}
