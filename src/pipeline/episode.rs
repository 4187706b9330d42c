//! Episode runner for learning episodes.
//!
//! The agent's transition spans its own move and the opponent's reply, so
//! the opponent's winning move is credited to the agent's preceding action.

use crate::{
    Error, Result,
    pipeline::metrics::EpisodeReport,
    ports::{Environment, Learner, Policy, Transition},
    types::StateKey,
};

/// Ask `policy` for a move, failing if it declines while moves exist.
pub(crate) fn choose<P: Policy + ?Sized>(
    policy: &mut P,
    state: &StateKey,
    legal_actions: &[usize],
) -> Result<usize> {
    policy
        .choose_action(state, legal_actions)
        .ok_or_else(|| Error::NoActionChosen {
            policy: policy.name().to_string(),
        })
}

/// Play one training episode, updating `learner` after each of its moves.
///
/// For each agent move:
/// 1. the agent steps; if that ends the episode, update with its reward
/// 2. otherwise the opponent replies; if that ends the episode, update with
///    the reply's reward as a terminal transition
/// 3. otherwise update non-terminally toward the position after the reply
///
/// Environments that leave the agent to move again after its own step are
/// updated directly from that step. When the opponent is to move first, it
/// plays without any update. Plies are bounded by [`Environment::max_plies`].
///
/// # Errors
///
/// Returns [`Error::NoActionChosen`] if a policy declines to move, or any
/// error from [`Environment::step`]. Updates applied before the error stay.
pub fn run_training_episode<E, L, P>(
    env: &mut E,
    agent_side: E::Mover,
    learner: &mut L,
    opponent: &mut P,
) -> Result<EpisodeReport>
where
    E: Environment + ?Sized,
    L: Learner + ?Sized,
    P: Policy + ?Sized,
{
    let mut state = env.reset();
    let mut report = EpisodeReport::default();
    let max_plies = env.max_plies();

    while !env.is_done() && report.plies < max_plies {
        let legal = env.legal_actions();
        if legal.is_empty() {
            break;
        }

        if env.current_mover() != agent_side {
            let action = choose(opponent, &state, &legal)?;
            let step = env.step(action)?;
            report.plies += 1;
            report.final_reward = step.reward;
            state = step.state;
            continue;
        }

        let action = choose(learner, &state, &legal)?;
        let step = env.step(action)?;
        report.plies += 1;
        report.final_reward = step.reward;

        let reply_pending =
            !step.done && env.current_mover() != agent_side && report.plies < max_plies;
        if !reply_pending {
            let next_legal_actions = if step.done {
                Vec::new()
            } else {
                env.legal_actions()
            };
            learner.update(&Transition {
                state,
                action,
                reward: step.reward,
                next_state: step.state.clone(),
                next_legal_actions,
                terminal: step.done,
            });
            report.updates += 1;
            report.total_reward += step.reward;
            state = step.state;
            continue;
        }

        let reply_legal = env.legal_actions();
        let reply = choose(opponent, &step.state, &reply_legal)?;
        let after = env.step(reply)?;
        report.plies += 1;
        report.final_reward = after.reward;

        let (reward, next_legal_actions) = if after.done {
            (after.reward, Vec::new())
        } else {
            (step.reward, env.legal_actions())
        };
        learner.update(&Transition {
            state,
            action,
            reward,
            next_state: after.state.clone(),
            next_legal_actions,
            terminal: after.done,
        });
        report.updates += 1;
        report.total_reward += reward;
        state = after.state;
    }

    Ok(report)
}
