/// Round state for one player at the terminal
///
/// A round is either built from three players the user picked (the answer
/// is drawn at random from their common teammates) or from a generated
/// puzzle (the answer is the player the puzzle was built around). Either
/// way every member of the answer set is accepted.
use crate::answer::matched_entry;
use crate::error::EngineError;
use crate::types::{IntersectionResult, Puzzle};
use log::debug;
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Player,
    Computer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub mode: Mode,
    pub clues: [String; 3],
    pub answers: BTreeSet<String>,
    /// The answer hints and give-ups refer to; always in `answers`
    pub answer: String,
    pub wrong_guesses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { matched: String, others: Vec<String> },
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealEntry {
    pub name: String,
    pub is_answer: bool,
}

/// Everything shown when the player gives up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub answer: String,
    /// Sorted; the round answer is marked
    pub entries: Vec<RevealEntry>,
}

#[derive(Debug, Default)]
pub struct GameSession {
    current: Option<Round>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// Start a round from three chosen players and their intersection
    pub fn start_player_round<R: Rng + ?Sized>(
        &mut self,
        players: [String; 3],
        result: &IntersectionResult,
        rng: &mut R,
    ) -> Result<&Round, EngineError> {
        let answer = result.common.iter().choose(rng).cloned().ok_or(EngineError::NoCommonTeammates)?;
        debug!("player round: {} possible answers", result.common.len());

        Ok(&*self.current.insert(Round {
            mode: Mode::Player,
            clues: players,
            answers: result.common.clone(),
            answer,
            wrong_guesses: 0,
        }))
    }

    pub fn start_computer_round(&mut self, puzzle: Puzzle) -> &Round {
        self.current.insert(Round {
            mode: Mode::Computer,
            clues: puzzle.clues,
            answers: puzzle.all_answers,
            answer: puzzle.guaranteed_answer,
            wrong_guesses: 0,
        })
    }

    /// Check a guess; a correct guess ends the round. None without an active round.
    pub fn submit_guess(&mut self, guess: &str) -> Option<GuessOutcome> {
        let round = self.current.as_mut()?;

        let Some(matched) = matched_entry(guess, &round.answers).cloned() else {
            round.wrong_guesses += 1;
            return Some(GuessOutcome::Wrong);
        };

        let others = round.answers.iter().filter(|a| **a != matched).cloned().collect();
        self.current = None;
        Some(GuessOutcome::Correct { matched, others })
    }

    /// First letter of the round answer
    pub fn hint(&self) -> Option<char> {
        self.current.as_ref().and_then(|r| r.answer.chars().next())
    }

    /// End the round and reveal every answer
    pub fn give_up(&mut self) -> Option<Reveal> {
        let round = self.current.take()?;
        let entries = round
            .answers
            .iter()
            .map(|name| RevealEntry { name: name.clone(), is_answer: *name == round.answer })
            .collect();
        Some(Reveal { answer: round.answer, entries })
    }
}
