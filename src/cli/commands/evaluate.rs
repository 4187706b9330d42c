//! Evaluate command - Evaluate a saved agent against a random opponent

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::load_agent,
    cli::output::{format_count_rate, format_number, print_kv, print_section, print_subsection},
    line_world::LineWorld,
    pipeline::{EvaluationSummary, RandomOpponent, evaluate, play_episode},
    ports::Environment,
    q_learning::{EnvironmentKind, FrozenAgent},
    tictactoe::TicTacToeEnv,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to trained agent file
    pub agent: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print one greedy game before the batch
    #[arg(long, default_value_t = false)]
    pub show_game: bool,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn evaluate_on<E: Environment>(
    env: &mut E,
    agent: &mut FrozenAgent,
    args: &EvaluateArgs,
) -> Result<EvaluationSummary> {
    let mut opponent = match args.seed {
        Some(seed) => RandomOpponent::with_seed(seed.wrapping_add(1)),
        None => RandomOpponent::new(),
    };

    if args.show_game {
        print_subsection(&format!("Greedy game on {}", env.name()));
        let agent_side = env.agent_side();
        let mut stdout = std::io::stdout();
        let report = play_episode(env, agent_side, agent, &mut opponent, Some(&mut stdout))?;
        println!("\nFinal reward: {}", report.final_reward);
    }

    Ok(evaluate(env, agent, &mut opponent, args.games)?)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading trained agent from: {}", args.agent.display());
    let saved = load_agent(&args.agent)
        .with_context(|| format!("Failed to load agent from {}", args.agent.display()))?;

    print_section("Loaded Agent Info");
    print_kv("Environment", &format!("{:?}", saved.metadata.environment));
    if let Some(episodes) = saved.metadata.episodes_trained {
        print_kv("Episodes trained", &format_number(episodes));
    }
    if let Some(opponent) = &saved.metadata.opponent {
        print_kv("Trained against", opponent);
    }
    print_kv("Table entries", &format_number(saved.table.len()));
    print_kv("Positions", &format_number(saved.table.state_count()));

    let environment = saved.metadata.environment;
    let mut agent = saved.into_frozen()?;
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    let summary = match environment {
        EnvironmentKind::TicTacToe => evaluate_on(&mut TicTacToeEnv::new(), &mut agent, &args)?,
        EnvironmentKind::LineWorld(config) => {
            let mut env = LineWorld::new(config)?;
            print_subsection("Greedy policy");
            println!("{}", env.render_policy(agent.table()));
            evaluate_on(&mut env, &mut agent, &args)?
        }
    };

    print_section("Evaluation Results");
    print_kv("Games", &format_number(summary.games));
    print_kv("Wins", &format_count_rate(summary.wins, summary.win_rate()));
    print_kv("Draws", &format_count_rate(summary.draws, summary.draw_rate()));
    print_kv("Losses", &format_count_rate(summary.losses, summary.loss_rate()));
    print_kv("Average reward", &format!("{:.3}", summary.average_reward));

    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("\nResults exported to {}", path.display());
    }

    Ok(())
}
