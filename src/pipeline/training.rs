//! Training pipeline for learnable agents

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    episode::run_training_episode,
    metrics::{CurvePoint, RollingAverage},
    opponents::RandomOpponent,
};
use crate::{
    Error, Result,
    ports::{Environment, Learner, Observer, Policy},
    q_learning::{QLearningAgent, QLearningConfig},
    types::Outcome,
};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Number of monitoring points over the run
    pub log_slices: usize,

    /// Fraction of the run covered by the rolling reward window
    pub avg_window_frac: f64,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 80_000,
            log_slices: 20,
            avg_window_frac: 0.2,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Line-world run length
    pub fn line_world() -> Self {
        Self {
            episodes: 400,
            ..Self::default()
        }
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Episodes between monitoring points: `max(1, episodes / log_slices)`
    pub fn log_every(&self) -> usize {
        (self.episodes / self.log_slices.max(1)).max(1)
    }

    /// Rolling window length: `max(5, floor(episodes * avg_window_frac))`
    pub fn average_window(&self) -> usize {
        ((self.episodes as f64 * self.avg_window_frac).floor() as usize).max(5)
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_slices == 0 {
            return Err(Error::invalid_config("log_slices must be positive"));
        }
        if !(0.0..=1.0).contains(&self.avg_window_frac) {
            return Err(Error::invalid_config(format!(
                "avg_window_frac {} must be in [0, 1]",
                self.avg_window_frac
            )));
        }
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played
    pub episodes: usize,

    /// Exploration rate after the last decay
    pub final_epsilon: f64,

    /// Episodes with positive total reward
    pub wins: usize,

    /// Episodes with zero total reward
    pub draws: usize,

    /// Episodes with negative total reward
    pub losses: usize,

    /// Monitoring points, in episode order
    pub curve: Vec<CurvePoint>,
}

impl TrainingResult {
    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.episodes)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.episodes)
    }

    pub fn loss_rate(&self) -> f64 {
        rate(self.losses, self.episodes)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

pub(crate) fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Training pipeline for a single learner against an opponent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training with the given environment, learner and opponent.
    ///
    /// After every episode the learner's exploration is decayed, then
    /// observers see the episode. Every [`TrainingConfig::log_every`]
    /// episodes a [`CurvePoint`] with the trailing reward average is
    /// recorded and broadcast.
    pub fn run<E>(
        &mut self,
        env: &mut E,
        learner: &mut dyn Learner,
        opponent: &mut dyn Policy,
    ) -> Result<TrainingResult>
    where
        E: Environment + ?Sized,
    {
        self.config.validate()?;

        let agent_side = env.agent_side();
        let log_every = self.config.log_every();
        let mut window = RollingAverage::new(self.config.average_window());
        let mut curve = Vec::new();
        let (mut wins, mut draws, mut losses) = (0, 0, 0);

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 1..=self.config.episodes {
            let report = run_training_episode(env, agent_side, learner, opponent)?;
            learner.finish_episode();
            let epsilon = learner.exploration_rate();

            match report.outcome() {
                Outcome::Win => wins += 1,
                Outcome::Draw => draws += 1,
                Outcome::Loss => losses += 1,
            }
            window.push(report.total_reward);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &report, epsilon)?;
            }

            if episode.is_multiple_of(log_every) {
                let point = CurvePoint {
                    episode,
                    epsilon,
                    average_reward: window.mean(),
                };
                for observer in &mut self.observers {
                    observer.on_curve_point(&point)?;
                }
                curve.push(point);
            }
        }

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult {
            episodes: self.config.episodes,
            final_epsilon: learner.exploration_rate(),
            wins,
            draws,
            losses,
            curve,
        })
    }
}

/// Train a fresh Q-learning agent against a uniformly random opponent.
///
/// With `training.seed` set, the agent uses that seed and the opponent the
/// next one, so runs are reproducible.
pub fn train_q_learning<E>(
    env: &mut E,
    agent_config: QLearningConfig,
    training: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
) -> Result<(QLearningAgent, TrainingResult)>
where
    E: Environment + ?Sized,
{
    let mut agent = QLearningAgent::new(agent_config)?;
    let mut opponent = match training.seed {
        Some(seed) => {
            agent = agent.with_seed(seed);
            RandomOpponent::with_seed(seed.wrapping_add(1))
        }
        None => RandomOpponent::new(),
    };

    let mut pipeline = observers
        .into_iter()
        .fold(TrainingPipeline::new(training), TrainingPipeline::with_observer);
    let result = pipeline.run(env, &mut agent, &mut opponent)?;
    Ok((agent, result))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        line_world::{LineWorld, RIGHT},
        pipeline::metrics::EpisodeReport,
        tictactoe::TicTacToeEnv,
        types::StateKey,
    };

    #[derive(Default)]
    struct Events {
        started: Option<usize>,
        episodes: usize,
        points: Vec<CurvePoint>,
        ended: bool,
    }

    struct Recording(Rc<RefCell<Events>>);

    impl Observer for Recording {
        fn on_training_start(&mut self, total: usize) -> Result<()> {
            self.0.borrow_mut().started = Some(total);
            Ok(())
        }

        fn on_episode_end(&mut self, _: usize, _: &EpisodeReport, _: f64) -> Result<()> {
            self.0.borrow_mut().episodes += 1;
            Ok(())
        }

        fn on_curve_point(&mut self, point: &CurvePoint) -> Result<()> {
            self.0.borrow_mut().points.push(point.clone());
            Ok(())
        }

        fn on_training_end(&mut self) -> Result<()> {
            self.0.borrow_mut().ended = true;
            Ok(())
        }
    }

    #[test]
    fn test_schedule_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.log_every(), 4000);
        assert_eq!(config.average_window(), 16_000);

        let small = TrainingConfig::default().with_episodes(10);
        assert_eq!(small.log_every(), 1);
        assert_eq!(small.average_window(), 5);
    }

    #[test]
    fn test_observers_see_every_event() {
        let events = Rc::new(RefCell::new(Events::default()));
        let training = TrainingConfig::default().with_episodes(100).with_seed(Some(3));
        let mut env = TicTacToeEnv::new();

        let (_, result) = train_q_learning(
            &mut env,
            QLearningConfig::default(),
            training,
            vec![Box::new(Recording(Rc::clone(&events)))],
        )
        .unwrap();

        let events = events.borrow();
        assert_eq!(events.started, Some(100));
        assert_eq!(events.episodes, 100);
        assert!(events.ended);
        assert_eq!(events.points, result.curve);
        assert_eq!(
            result.curve.iter().map(|p| p.episode).collect::<Vec<_>>(),
            (1..=20).map(|i| i * 5).collect::<Vec<_>>()
        );
        assert_eq!(result.wins + result.draws + result.losses, 100);
    }

    #[test]
    fn test_epsilon_decays_to_floor_over_run() {
        let mut env = TicTacToeEnv::new();
        let agent_config = QLearningConfig::default().with_epsilon(0.5, 0.1, 0.9);
        let training = TrainingConfig::default().with_episodes(200).with_seed(Some(1));

        let (agent, result) = train_q_learning(&mut env, agent_config, training, Vec::new()).unwrap();

        assert_eq!(agent.epsilon(), 0.1);
        assert_eq!(result.final_epsilon, 0.1);
        let epsilons: Vec<f64> = result.curve.iter().map(|p| p.epsilon).collect();
        assert!(epsilons.windows(2).all(|w| w[1] <= w[0]));
        assert!(epsilons.iter().all(|&e| e >= 0.1));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut env = TicTacToeEnv::new();
            let training = TrainingConfig::default().with_episodes(300).with_seed(Some(42));
            train_q_learning(&mut env, QLearningConfig::default(), training, Vec::new()).unwrap()
        };
        let (first_agent, first) = run();
        let (second_agent, second) = run();
        assert_eq!(first, second);
        assert_eq!(first_agent.table(), second_agent.table());
    }

    #[test]
    fn test_line_world_learns_to_walk_right() {
        let mut env = LineWorld::default();
        let training = TrainingConfig::line_world().with_seed(Some(0));

        let (agent, result) =
            train_q_learning(&mut env, QLearningConfig::line_world(), training, Vec::new())
                .unwrap();

        for cell in 0..6 {
            let best = agent.table().best_actions(&StateKey::from(cell), &[0, 1]);
            assert_eq!(best, vec![RIGHT], "cell {cell} should prefer right");
        }
        let last = result.curve.last().unwrap();
        assert!(last.average_reward > 0.5);
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let mut env = TicTacToeEnv::new();
        let training = TrainingConfig {
            log_slices: 0,
            ..TrainingConfig::default()
        };
        let result = train_q_learning(&mut env, QLearningConfig::default(), training, Vec::new());
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }
}
