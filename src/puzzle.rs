//! Computer-generated puzzles.
//!
//! A puzzle is built backwards from its answer:
//!
//! 1. **Draw**: pick a random player from the directory as the guaranteed answer
//! 2. **Clues**: sample three distinct teammates from that player's roster
//! 3. **Answers**: intersect the three clues' own rosters
//!
//! The drawn player shares a team with every clue, so they belong in the
//! answer set. When the data disagrees (different spellings, a games
//! threshold cutting one side of the relationship) the player is added to
//! the answer set instead of throwing the trial away.
//!
//! Each trial may fail for many data reasons; a failed trial is logged and
//! the next one starts, up to the trial budget.

use crate::answer::matched_entry;
use crate::teammates::TeammateSetEngine;
use crate::types::{Identity, Puzzle, Roster};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;

/// Resolution and roster lookups the generator runs against
pub trait TeammateLookup {
    fn resolve(&self, query: &str) -> Vec<Identity>;
    fn roster(&self, identity: &Identity, min_games: u32) -> Roster;
}

/// Why a trial was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Abandoned {
    EmptyDirectory,
    CandidateNotFound(String),
    ThinRoster { candidate: String, distinct: usize },
    ClueNotFound(String),
    DuplicateClue(String),
    EmptyClueRoster(String),
    NoCommonTeammates,
}

impl fmt::Display for Abandoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abandoned::EmptyDirectory => write!(f, "player directory is empty"),
            Abandoned::CandidateNotFound(name) => write!(f, "candidate {} not found", name),
            Abandoned::ThinRoster { candidate, distinct } => {
                write!(f, "{} has only {} distinct teammates", candidate, distinct)
            }
            Abandoned::ClueNotFound(name) => write!(f, "clue {} not found", name),
            Abandoned::DuplicateClue(name) => write!(f, "two clues resolved to {}", name),
            Abandoned::EmptyClueRoster(name) => write!(f, "clue {} has no teammates", name),
            Abandoned::NoCommonTeammates => write!(f, "clues have no common teammate"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator {
    set_engine: TeammateSetEngine,
}

impl PuzzleGenerator {
    pub fn new(set_engine: TeammateSetEngine) -> Self {
        Self { set_engine }
    }

    /// Run up to `max_trials` trials; None once the budget is spent
    pub fn generate<R: Rng + ?Sized>(
        &self,
        lookup: &dyn TeammateLookup,
        known_names: &[String],
        rng: &mut R,
        max_trials: usize,
        min_games: u32,
    ) -> Option<Puzzle> {
        for trial in 1..=max_trials {
            match self.run_trial(lookup, known_names, rng, min_games) {
                Ok(puzzle) => {
                    debug!("trial {}/{}: built puzzle around {}", trial, max_trials, puzzle.guaranteed_answer);
                    return Some(puzzle);
                }
                Err(reason) => debug!("trial {}/{} abandoned: {}", trial, max_trials, reason),
            }
        }

        debug!("no puzzle after {} trials", max_trials);
        None
    }

    /// One draw-clues-answers attempt
    pub fn run_trial<R: Rng + ?Sized>(
        &self,
        lookup: &dyn TeammateLookup,
        known_names: &[String],
        rng: &mut R,
        min_games: u32,
    ) -> Result<Puzzle, Abandoned> {
        let candidate = known_names.choose(rng).ok_or(Abandoned::EmptyDirectory)?;

        let target = lookup
            .resolve(candidate)
            .into_iter()
            .next()
            .ok_or_else(|| Abandoned::CandidateNotFound(candidate.clone()))?;

        let teammates = distinct(lookup.roster(&target, min_games));
        if teammates.len() < 3 {
            return Err(Abandoned::ThinRoster { candidate: candidate.clone(), distinct: teammates.len() });
        }
        let picks: Vec<&String> = teammates.choose_multiple(rng, 3).collect();

        // Resolve every clue before fetching any clue roster
        let mut seen = HashSet::new();
        let mut resolve_clue = |pick: &String| -> Result<Identity, Abandoned> {
            let clue = lookup
                .resolve(pick)
                .into_iter()
                .next()
                .ok_or_else(|| Abandoned::ClueNotFound(pick.clone()))?;
            if !seen.insert(clue.source_id.clone()) {
                return Err(Abandoned::DuplicateClue(clue.display_name));
            }
            Ok(clue)
        };
        let resolved = [resolve_clue(picks[0])?, resolve_clue(picks[1])?, resolve_clue(picks[2])?];

        let mut clue_rosters = Vec::with_capacity(3);
        for clue in &resolved {
            let roster = lookup.roster(clue, min_games);
            if roster.is_empty() {
                return Err(Abandoned::EmptyClueRoster(clue.display_name.clone()));
            }
            clue_rosters.push(roster);
        }

        let mut all_answers = self.set_engine.intersect(&clue_rosters).common;

        // The answer set may spell the candidate differently; report that spelling
        let guaranteed_answer = match matched_entry(candidate, &all_answers) {
            Some(spelled) => spelled.clone(),
            None => {
                debug!("{} missing from the clues' common teammates; adding it", candidate);
                all_answers.insert(candidate.clone());
                candidate.clone()
            }
        };

        if all_answers.is_empty() {
            return Err(Abandoned::NoCommonTeammates);
        }

        let clues = resolved.map(|clue| clue.display_name);
        Ok(Puzzle { clues, all_answers, guaranteed_answer })
    }
}

/// Roster without repeated names, first occurrence kept
fn distinct(roster: Roster) -> Roster {
    let mut seen = HashSet::new();
    roster.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

#[cfg(test)]
#[path = "puzzle_test.rs"]
mod puzzle_test;
