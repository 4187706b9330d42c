//! Train command - Train a Q-learning agent on tic-tac-toe or the line world

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::save_agent,
    cli::{
        config::{EnvChoice, RunConfig, pick},
        output::{format_count_rate, format_number, print_kv, print_section, print_subsection},
    },
    line_world::{LineWorld, LineWorldConfig},
    pipeline::{
        ConsoleLogObserver, CsvCurveObserver, EvaluationSummary, JsonlEpisodeObserver, Observer,
        ProgressObserver, RandomOpponent, TrainingConfig, TrainingResult, evaluate,
        play_greedy_episode, train_q_learning,
    },
    ports::Environment,
    q_learning::{
        EnvironmentKind, Greedy, QLearningAgent, QLearningConfig, SavedAgent, TrainingMetadata,
    },
    tictactoe::TicTacToeEnv,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    environment: &'a EnvironmentKind,
    agent: &'a QLearningConfig,
    schedule: &'a TrainingConfig,
    opponent: &'a str,
    training: &'a TrainingResult,
    win_rate: f64,
    draw_rate: f64,
    loss_rate: f64,
    table_entries: usize,
    evaluation: Option<&'a EvaluationSummary>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // A trailing separator names a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    if !normalized
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        normalized.set_extension("json");
    }
    normalized
}

#[derive(Parser, Debug, Default)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Environment to train on [default: tictactoe]
    #[arg(long, value_enum)]
    pub env: Option<EnvChoice>,

    /// Number of training episodes [default: 80000, line world 400]
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Learning rate α in (0, 1] [default: 0.2, line world 0.1]
    #[arg(long, alias = "alpha")]
    pub learning_rate: Option<f64>,

    /// Discount factor γ in [0, 1] [default: 0.9, line world 0.95]
    #[arg(long, alias = "gamma")]
    pub discount_factor: Option<f64>,

    /// Initial exploration rate [default: 0.3, line world 0.2]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Exploration floor [default: 0.2, line world 0.01]
    #[arg(long)]
    pub epsilon_min: Option<f64>,

    /// Multiplicative exploration decay per episode [default: 0.999, line world 0.995]
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Number of monitoring points over the run [default: 20]
    #[arg(long)]
    pub log_slices: Option<usize>,

    /// Fraction of the run averaged at each monitoring point [default: 0.2]
    #[arg(long)]
    pub avg_window_frac: Option<f64>,

    /// Opponent to train against (only `random` is available)
    #[arg(long, short = 'o')]
    pub opponent: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Line world: number of cells [default: 7]
    #[arg(long)]
    pub line_cells: Option<usize>,

    /// Line world: start cell [default: 0]
    #[arg(long)]
    pub line_start: Option<usize>,

    /// Line world: goal cell [default: last cell]
    #[arg(long)]
    pub line_goal: Option<usize>,

    /// Line world: step limit per episode [default: 50]
    #[arg(long)]
    pub line_max_steps: Option<usize>,

    /// JSON file with default values for the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file for the trained agent (`.json` for JSON, otherwise MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Write the learning curve as CSV
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// Write one JSON line per training episode
    #[arg(long)]
    pub episode_log: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print monitoring lines instead of a progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Play and print one greedy game after training
    #[arg(long, default_value_t = false)]
    pub show_game: bool,

    /// Greedy games against a random opponent after training
    #[arg(long, default_value_t = 0)]
    pub eval_games: usize,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub env: EnvChoice,
    pub agent: QLearningConfig,
    pub training: TrainingConfig,
    pub line: LineWorldConfig,
    pub opponent: String,
}

impl TrainArgs {
    /// Merge flags, the optional config file and environment defaults.
    pub fn resolve(&self) -> Result<ResolvedRun> {
        let file = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        let env = pick(self.env, file.env).unwrap_or(EnvChoice::TicTacToe);
        let (base_agent, base_training) = match env {
            EnvChoice::TicTacToe => (QLearningConfig::default(), TrainingConfig::default()),
            EnvChoice::Line => (QLearningConfig::line_world(), TrainingConfig::line_world()),
        };

        let agent = QLearningConfig {
            learning_rate: pick(self.learning_rate, file.learning_rate)
                .unwrap_or(base_agent.learning_rate),
            discount_factor: pick(self.discount_factor, file.discount_factor)
                .unwrap_or(base_agent.discount_factor),
            epsilon: pick(self.epsilon, file.epsilon).unwrap_or(base_agent.epsilon),
            epsilon_min: pick(self.epsilon_min, file.epsilon_min)
                .unwrap_or(base_agent.epsilon_min),
            epsilon_decay: pick(self.epsilon_decay, file.epsilon_decay)
                .unwrap_or(base_agent.epsilon_decay),
        };
        agent.validate()?;

        let training = TrainingConfig {
            episodes: pick(self.episodes, file.episodes).unwrap_or(base_training.episodes),
            log_slices: pick(self.log_slices, file.log_slices).unwrap_or(base_training.log_slices),
            avg_window_frac: pick(self.avg_window_frac, file.avg_window_frac)
                .unwrap_or(base_training.avg_window_frac),
            seed: pick(self.seed, file.seed),
        };
        training.validate()?;

        let default_line = LineWorldConfig::default();
        let n_cells = pick(self.line_cells, file.line_cells).unwrap_or(default_line.n_cells);
        let line = LineWorldConfig {
            n_cells,
            start: pick(self.line_start, file.line_start).unwrap_or(default_line.start),
            goal: pick(self.line_goal, file.line_goal).unwrap_or(n_cells.saturating_sub(1)),
            max_steps: pick(self.line_max_steps, file.line_max_steps)
                .unwrap_or(default_line.max_steps),
        };
        if env == EnvChoice::Line {
            line.validate()?;
        }

        let opponent = pick(self.opponent.clone(), file.opponent)
            .unwrap_or_else(|| "random".to_string())
            .to_lowercase();
        if opponent != "random" {
            return Err(anyhow!(
                "Unknown opponent type: '{opponent}'. Supported: random"
            ));
        }

        Ok(ResolvedRun {
            env,
            agent,
            training,
            line,
            opponent,
        })
    }
}

struct TrainedRun {
    agent: QLearningAgent,
    result: TrainingResult,
    evaluation: Option<EvaluationSummary>,
}

fn observers(args: &TrainArgs, training: &TrainingConfig) -> Result<Vec<Box<dyn Observer>>> {
    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if args.no_progress {
        observers.push(Box::new(ConsoleLogObserver::stdout(
            training.average_window(),
        )));
    } else {
        observers.push(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.curve {
        observers.push(Box::new(
            CsvCurveObserver::new(path)
                .with_context(|| format!("Failed to create curve file {}", path.display()))?,
        ));
    }
    if let Some(path) = &args.episode_log {
        observers.push(Box::new(
            JsonlEpisodeObserver::new(path)
                .with_context(|| format!("Failed to create episode log {}", path.display()))?,
        ));
    }
    Ok(observers)
}

fn run_on<E: Environment>(
    env: &mut E,
    args: &TrainArgs,
    run: &ResolvedRun,
) -> Result<TrainedRun> {
    let (mut agent, result) =
        train_q_learning(env, run.agent, run.training, observers(args, &run.training)?)?;

    let eval_seed = run.training.seed.map(|seed| seed.wrapping_add(2));
    let mut opponent = match eval_seed {
        Some(seed) => RandomOpponent::with_seed(seed),
        None => RandomOpponent::new(),
    };

    if args.show_game {
        print_subsection(&format!("Greedy game on {}", env.name()));
        let mut stdout = std::io::stdout();
        let reward = play_greedy_episode(env, &mut agent, &mut opponent, Some(&mut stdout))?;
        println!("\nFinal reward: {reward}");
    }

    let evaluation = if args.eval_games > 0 {
        Some(evaluate(
            env,
            &mut Greedy(&mut agent),
            &mut opponent,
            args.eval_games,
        )?)
    } else {
        None
    };

    Ok(TrainedRun {
        agent,
        result,
        evaluation,
    })
}

fn print_result(result: &TrainingResult) {
    print_section("Training Results");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Wins", &format_count_rate(result.wins, result.win_rate()));
    print_kv("Draws", &format_count_rate(result.draws, result.draw_rate()));
    print_kv("Losses", &format_count_rate(result.losses, result.loss_rate()));
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    if let Some(last) = result.curve.last() {
        print_kv("Final avg reward", &format!("{:.3}", last.average_reward));
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let run = args.resolve()?;

    if let Some(path) = &args.output
        && path.exists()
        && !args.force
    {
        return Err(anyhow!(
            "Output file {} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    print_section("Q-Learning Training");
    print_kv("Environment", &format!("{:?}", run.env));
    print_kv("Episodes", &format_number(run.training.episodes));
    print_kv(
        "Learning rate / γ",
        &format!("{} / {}", run.agent.learning_rate, run.agent.discount_factor),
    );
    print_kv(
        "Epsilon",
        &format!(
            "{} → {} (×{})",
            run.agent.epsilon, run.agent.epsilon_min, run.agent.epsilon_decay
        ),
    );
    print_kv("Opponent", &run.opponent);
    if let Some(seed) = run.training.seed {
        print_kv("Seed", &seed.to_string());
    }

    let (trained, environment) = match run.env {
        EnvChoice::TicTacToe => {
            let mut env = TicTacToeEnv::new();
            (run_on(&mut env, &args, &run)?, EnvironmentKind::TicTacToe)
        }
        EnvChoice::Line => {
            let mut env = LineWorld::new(run.line)?;
            let trained = run_on(&mut env, &args, &run)?;
            print_subsection("Greedy policy");
            println!("{}", env.render_policy(trained.agent.table()));
            (trained, EnvironmentKind::LineWorld(run.line))
        }
    };

    print_result(&trained.result);
    print_kv("Table entries", &format_number(trained.agent.table().len()));

    if let Some(evaluation) = &trained.evaluation {
        print_subsection("Greedy evaluation vs random");
        print_kv("Games", &format_number(evaluation.games));
        print_kv("Wins", &format_count_rate(evaluation.wins, evaluation.win_rate()));
        print_kv("Draws", &format_count_rate(evaluation.draws, evaluation.draw_rate()));
        print_kv("Losses", &format_count_rate(evaluation.losses, evaluation.loss_rate()));
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if path != *raw {
            println!("Summary path normalized to {}", path.display());
        }
        let summary = TrainingSummaryFile {
            environment: &environment,
            agent: &run.agent,
            schedule: &run.training,
            opponent: &run.opponent,
            training: &trained.result,
            win_rate: trained.result.win_rate(),
            draw_rate: trained.result.draw_rate(),
            loss_rate: trained.result.loss_rate(),
            table_entries: trained.agent.table().len(),
            evaluation: trained.evaluation.as_ref(),
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", path.display());
    }

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(trained.result.episodes),
            opponent: Some(run.opponent.clone()),
            seed: run.training.seed,
            environment,
            saved_at_unix: None,
        }
        .stamped();
        let saved = SavedAgent::from_agent(&trained.agent, metadata);
        save_agent(&saved, path, args.force)
            .with_context(|| format!("Failed to save agent to {}", path.display()))?;
        println!("\nSaved trained agent to {}", path.display());
    }

    Ok(())
}
