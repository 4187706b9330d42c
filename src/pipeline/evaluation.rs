//! Non-learning episodes: greedy evaluation and interactive play.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::{episode::choose, metrics::EpisodeReport, training::rate};
use crate::{
    Error, Result,
    ports::{Environment, Policy},
    q_learning::{Greedy, QLearningAgent},
    types::Outcome,
};

fn show<E: Environment + ?Sized>(render: &mut Option<&mut dyn Write>, env: &E) -> Result<()> {
    if let Some(out) = render.as_deref_mut() {
        writeln!(out, "{}", env.render()).map_err(|source| Error::Io {
            operation: "render position".to_string(),
            source,
        })?;
    }
    Ok(())
}

fn announce(render: &mut Option<&mut dyn Write>, who: &str, action: usize) -> Result<()> {
    if let Some(out) = render.as_deref_mut() {
        writeln!(out, "\n{who} plays {action}").map_err(|source| Error::Io {
            operation: "render move".to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Play one episode without learning.
///
/// Both policies are consulted as-is; pass a greedy view of a learner to
/// evaluate it. When `render` is given, every position is written to it.
/// The returned report has `updates == 0` and `total_reward` summing every
/// reward the environment produced.
pub fn play_episode<E, A, O>(
    env: &mut E,
    agent_side: E::Mover,
    agent: &mut A,
    opponent: &mut O,
    mut render: Option<&mut dyn Write>,
) -> Result<EpisodeReport>
where
    E: Environment + ?Sized,
    A: Policy + ?Sized,
    O: Policy + ?Sized,
{
    let mut state = env.reset();
    let mut report = EpisodeReport::default();
    show(&mut render, env)?;

    while !env.is_done() && report.plies < env.max_plies() {
        let legal = env.legal_actions();
        if legal.is_empty() {
            break;
        }
        let (action, who) = if env.current_mover() == agent_side {
            (choose(agent, &state, &legal)?, agent.name().to_string())
        } else {
            (choose(opponent, &state, &legal)?, opponent.name().to_string())
        };

        let step = env.step(action)?;
        report.plies += 1;
        report.final_reward = step.reward;
        report.total_reward += step.reward;
        state = step.state;

        announce(&mut render, &who, action)?;
        show(&mut render, env)?;
    }

    Ok(report)
}

/// One greedy episode of `agent` against `opponent`; returns the last reward.
pub fn play_greedy_episode<E, O>(
    env: &mut E,
    agent: &mut QLearningAgent,
    opponent: &mut O,
    render: Option<&mut dyn Write>,
) -> Result<f64>
where
    E: Environment + ?Sized,
    O: Policy + ?Sized,
{
    let agent_side = env.agent_side();
    let report = play_episode(env, agent_side, &mut Greedy(agent), opponent, render)?;
    Ok(report.final_reward)
}

/// Outcome counts over a batch of evaluation games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Mean of the per-game total reward
    pub average_reward: f64,
}

impl EvaluationSummary {
    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.games)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.games)
    }

    pub fn loss_rate(&self) -> f64 {
        rate(self.losses, self.games)
    }
}

/// Play `games` non-learning episodes and tally their outcomes.
pub fn evaluate<E, A, O>(
    env: &mut E,
    agent: &mut A,
    opponent: &mut O,
    games: usize,
) -> Result<EvaluationSummary>
where
    E: Environment + ?Sized,
    A: Policy + ?Sized,
    O: Policy + ?Sized,
{
    let agent_side = env.agent_side();
    let mut summary = EvaluationSummary {
        games,
        ..EvaluationSummary::default()
    };
    let mut reward_sum = 0.0;

    for _ in 0..games {
        let report = play_episode(env, agent_side, agent, opponent, None)?;
        reward_sum += report.total_reward;
        match report.outcome() {
            Outcome::Win => summary.wins += 1,
            Outcome::Draw => summary.draws += 1,
            Outcome::Loss => summary.losses += 1,
        }
    }

    if games > 0 {
        summary.average_reward = reward_sum / games as f64;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::{opponents::RandomOpponent, opponents::ScriptedPolicy},
        q_learning::QLearningConfig,
        tictactoe::{Player, TicTacToeEnv},
        types::StateKey,
    };

    #[test]
    fn test_play_episode_renders_each_position() {
        let mut env = TicTacToeEnv::new();
        let mut agent = ScriptedPolicy::new([4, 2, 6]);
        let mut opponent = ScriptedPolicy::new([0, 1, 8]);
        let mut out = Vec::new();

        let report = play_episode(
            &mut env,
            Player::O,
            &mut agent,
            &mut opponent,
            Some(&mut out),
        )
        .unwrap();

        assert_eq!(report.plies, 6);
        assert_eq!(report.final_reward, 1.0);
        assert_eq!(report.updates, 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(" plays ").count(), 6);
        assert!(text.contains("scripted plays 6"));
    }

    #[test]
    fn test_greedy_episode_does_not_learn() {
        let mut env = TicTacToeEnv::new();
        let mut agent = QLearningAgent::new(QLearningConfig::default())
            .unwrap()
            .with_seed(2);
        let state = StateKey::new("X........");
        agent.update(&state, 4, 0.5, &state, &[], true);
        let before = agent.table().clone();

        let mut opponent = RandomOpponent::with_seed(9);
        let reward = play_greedy_episode(&mut env, &mut agent, &mut opponent, None).unwrap();

        assert!([-1.0, 0.0, 1.0].contains(&reward));
        assert_eq!(agent.table(), &before);
    }

    #[test]
    fn test_evaluate_tallies_every_game() {
        let mut env = TicTacToeEnv::new();
        let mut agent = RandomOpponent::with_seed(1);
        let mut opponent = RandomOpponent::with_seed(2);

        let summary = evaluate(&mut env, &mut agent, &mut opponent, 50).unwrap();

        assert_eq!(summary.games, 50);
        assert_eq!(summary.wins + summary.draws + summary.losses, 50);
        let rates = summary.win_rate() + summary.draw_rate() + summary.loss_rate();
        assert!((rates - 1.0).abs() < 1e-12);
    }
}
