/// Caller-facing operations
///
/// The `Engine` ties the resolver, roster fetcher, set engine and puzzle
/// generator to a source provider and a player directory. It owns the
/// roster cache and nothing else; round state lives in `GameSession`.
use crate::answer;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::provider::{DirectoryProvider, SourceDataProvider};
use crate::puzzle::{PuzzleGenerator, TeammateLookup};
use crate::resolver::IdentityResolver;
use crate::roster::{RosterFetcher, RosterTableParser};
use crate::teammates::TeammateSetEngine;
use crate::types::{Identity, IntersectionResult, Puzzle, Roster};
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

pub struct Engine<S, D> {
    source: S,
    directory: D,
    rosters: RosterFetcher,
    set_engine: TeammateSetEngine,
    generator: PuzzleGenerator,
}

impl<S: SourceDataProvider, D: DirectoryProvider> Engine<S, D> {
    pub fn new(source: S, directory: D, config: &EngineConfig) -> Self {
        let set_engine = TeammateSetEngine::new(config.exclude_tokens.as_slice());
        Self {
            source,
            directory,
            rosters: RosterFetcher::new(RosterTableParser::new(config.labels.clone()), config.roster_cache_ttl),
            generator: PuzzleGenerator::new(set_engine.clone()),
            set_engine,
        }
    }

    /// Candidates for one free-text name
    pub fn resolve(&self, query: &str) -> Vec<Identity> {
        IdentityResolver::new(&self.source).resolve(query)
    }

    /// Candidates for each of three names; an empty list means "not found"
    pub fn resolve_players(&self, names: [&str; 3]) -> [Vec<Identity>; 3] {
        names.map(|name| self.resolve(name))
    }

    /// Teammates of one identity with more than `min_games` games together
    pub fn roster(&self, identity: &Identity, min_games: u32) -> Roster {
        self.rosters.roster(&self.source, identity, min_games)
    }

    /// Common teammates of the chosen identities
    pub fn compute_common_roster(
        &self,
        identities: &[Identity],
        min_games: u32,
    ) -> Result<IntersectionResult, EngineError> {
        if identities.len() < 2 {
            return Err(EngineError::TooFewPlayers { got: identities.len() });
        }

        let rosters: Vec<Roster> = identities.iter().map(|id| self.roster(id, min_games)).collect();
        for (id, roster) in identities.iter().zip(&rosters) {
            debug!("{} has {} teammates", id.label(), roster.len());
        }

        Ok(self.set_engine.intersect(&rosters))
    }

    /// Build a puzzle with a random source seeded from the wall clock
    pub fn generate_puzzle(&self, max_trials: usize, min_games: u32) -> Result<Option<Puzzle>, EngineError> {
        let seed = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        debug!("generating puzzle with seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_puzzle_with_rng(&mut rng, max_trials, min_games)
    }

    /// Build a puzzle with a caller-supplied random source.
    ///
    /// `Ok(None)` means the trial budget ran out; `Err` means the directory
    /// itself could not be read.
    pub fn generate_puzzle_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_trials: usize,
        min_games: u32,
    ) -> Result<Option<Puzzle>, EngineError> {
        let names = self.directory.list_known_names().map_err(|e| EngineError::DirectoryUnavailable(e.to_string()))?;
        if names.is_empty() {
            return Err(EngineError::DirectoryUnavailable("no player names loaded".to_string()));
        }
        Ok(self.generator.generate(self, &names, rng, max_trials, min_games))
    }

    pub fn check_guess(&self, guess: &str, answers: &BTreeSet<String>) -> bool {
        answer::is_correct(guess, answers)
    }
}

impl<S: SourceDataProvider, D: DirectoryProvider> TeammateLookup for Engine<S, D> {
    fn resolve(&self, query: &str) -> Vec<Identity> {
        Engine::resolve(self, query)
    }

    fn roster(&self, identity: &Identity, min_games: u32) -> Roster {
        Engine::roster(self, identity, min_games)
    }
}
