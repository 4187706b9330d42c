//! Non-learning move sources: random, scripted and human players.

use std::{
    collections::VecDeque,
    io::{BufRead, Write},
};

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{ports::Policy, q_learning::agent::build_rng, types::StateKey};

/// Uniformly random legal moves.
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomOpponent {
    fn choose_action(&mut self, _state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        legal_actions.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Plays a fixed sequence of moves, then declines.
///
/// A scripted move that is not legal in the current position is returned
/// as `None` rather than skipped, so a broken script fails loudly.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    moves: VecDeque<usize>,
}

impl ScriptedPolicy {
    pub fn new(moves: impl IntoIterator<Item = usize>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Moves not yet played
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Policy for ScriptedPolicy {
    fn choose_action(&mut self, _state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        let next = self.moves.pop_front()?;
        legal_actions.contains(&next).then_some(next)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Reads moves from a line-oriented input, re-prompting until one is legal.
///
/// End of input makes the policy decline; [`HumanPolicy::input_closed`]
/// tells that apart from an ordinary refusal. A failed read or prompt write
/// also declines, and the error is kept for [`HumanPolicy::take_error`].
pub struct HumanPolicy<R, W> {
    input: R,
    output: W,
    closed: bool,
    last_error: Option<std::io::Error>,
}

impl<R: BufRead, W: Write> HumanPolicy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            closed: false,
            last_error: None,
        }
    }

    pub fn input_closed(&self) -> bool {
        self.closed
    }

    /// I/O error behind the most recent refusal, if any
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.last_error.take()
    }

    /// Writer the prompts go to, for printing between moves
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn read_move(&mut self, legal_actions: &[usize]) -> std::io::Result<Option<usize>> {
        loop {
            write!(self.output, "Your move (choose from {legal_actions:?}): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(action) if legal_actions.contains(&action) => return Ok(Some(action)),
                _ => writeln!(self.output, "'{}' is not a legal move", line.trim())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Policy for HumanPolicy<R, W> {
    fn choose_action(&mut self, _state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        if legal_actions.is_empty() || self.closed {
            return None;
        }
        match self.read_move(legal_actions) {
            Ok(Some(action)) => Some(action),
            Ok(None) => {
                self.closed = true;
                None
            }
            Err(err) => {
                self.last_error = Some(err);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "human"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn key() -> StateKey {
        StateKey::new(".........")
    }

    #[test]
    fn test_random_opponent_stays_legal() {
        let mut opponent = RandomOpponent::with_seed(11);
        for _ in 0..200 {
            let action = opponent.choose_action(&key(), &[1, 3, 8]).unwrap();
            assert!([1, 3, 8].contains(&action));
        }
        assert_eq!(opponent.choose_action(&key(), &[]), None);
    }

    #[test]
    fn test_seeded_random_opponents_agree() {
        let mut a = RandomOpponent::with_seed(5);
        let mut b = RandomOpponent::with_seed(5);
        let legal: Vec<usize> = (0..9).collect();
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&key(), &legal),
                b.choose_action(&key(), &legal)
            );
        }
    }

    #[test]
    fn test_script_plays_in_order_then_declines() {
        let mut script = ScriptedPolicy::new([4, 0]);
        assert_eq!(script.choose_action(&key(), &[0, 4]), Some(4));
        assert_eq!(script.remaining(), 1);
        assert_eq!(script.choose_action(&key(), &[1, 2]), None);
        assert_eq!(script.choose_action(&key(), &[0]), None);
    }

    #[test]
    fn test_human_reprompts_until_legal() {
        let input = Cursor::new("x\n9\n4\n");
        let mut output = Vec::new();
        let mut human = HumanPolicy::new(input, &mut output);

        assert_eq!(human.choose_action(&key(), &[0, 4]), Some(4));
        drop(human);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Your move").count(), 3);
        assert!(text.contains("'9' is not a legal move"));
    }

    #[test]
    fn test_human_eof_declines() {
        let mut human = HumanPolicy::new(Cursor::new(""), Vec::new());
        assert_eq!(human.choose_action(&key(), &[0]), None);
        assert!(human.input_closed());
        assert!(human.take_error().is_none());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "terminal gone"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_human_write_failure_is_kept() {
        let mut human = HumanPolicy::new(Cursor::new("4\n"), FailingWriter);
        assert_eq!(human.choose_action(&key(), &[4]), None);
        assert!(!human.input_closed());
        let err = human.take_error().expect("write error kept");
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
