use crate::answer;
use crate::cli::Difficulty;
use crate::console_format::{self, RoundWriter};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::html;
use crate::provider::{DirectoryProvider, SourceDataProvider};
use crate::report;
use crate::roster::{ColumnLabels, RosterTableParser};
use crate::session::{GameSession, GuessOutcome};
use crate::types::{Identity, Roster};
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Where a run reads answers from and writes to
pub struct Terminal<'a> {
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
    pub colors: bool,
    /// Input is a person at a keyboard, so ambiguous names can be asked about
    pub interactive: bool,
}

impl Terminal<'_> {
    fn writer(&mut self) -> RoundWriter<&mut dyn Write> {
        RoundWriter::new(&mut *self.out, self.colors)
    }

    /// Print a prompt and read one trimmed line; None at end of input
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{} ", prompt)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Options for `common`
pub struct CommonRun<'a> {
    pub names: &'a [String],
    pub pick: &'a [usize],
    pub min_games: u32,
    pub play: bool,
    pub json: bool,
}

/// Options for `generate`
pub struct GenerateRun {
    pub difficulty: Difficulty,
    pub min_games: Option<u32>,
    pub max_trials: usize,
    pub play: bool,
    pub json: bool,
}

fn io_err(e: io::Error) -> String {
    format!("Output error: {}", e)
}

/// Player mode: resolve three names, intersect their rosters, then play or print.
///
/// Returns the process exit code.
pub fn run_common<S, D>(engine: &Engine<S, D>, run: &CommonRun<'_>, term: &mut Terminal<'_>) -> Result<i32, String>
where
    S: SourceDataProvider,
    D: DirectoryProvider,
{
    let mut players: Vec<Identity> = Vec::with_capacity(run.names.len());
    for (i, name) in run.names.iter().enumerate() {
        let candidates = engine.resolve(name);
        if candidates.is_empty() {
            return Err(EngineError::PlayerNotFound { query: name.clone() }.to_string());
        }
        let ask = !run.json && term.interactive;
        let chosen = choose_identity(name, candidates, run.pick.get(i).copied(), ask, term)?;
        debug!("{} resolved to {}", name, chosen.label());
        players.push(chosen);
    }

    let rosters: Vec<Roster> = players.iter().map(|p| engine.roster(p, run.min_games)).collect();
    let result = engine.compute_common_roster(&players, run.min_games).map_err(|e| e.to_string())?;

    if run.json {
        let sizes: Vec<usize> = rosters.iter().map(|r| r.len()).collect();
        report::write_json(&mut *term.out, &report::common_report(&players, &sizes, &result, run.min_games))
            .map_err(io_err)?;
        return Ok(if result.is_empty() { 1 } else { 0 });
    }

    let mut lines = Vec::new();
    for (player, roster) in players.iter().zip(&rosters) {
        lines.extend(console_format::format_roster_summary(player, roster));
    }
    term.writer().write_lines(&lines).map_err(io_err)?;

    let names: Vec<String> = players.iter().map(|p| p.display_name.clone()).collect();
    if result.is_empty() {
        writeln!(term.out, "{}", EngineError::NoCommonTeammates).map_err(io_err)?;
        term.writer().write_lines(&console_format::format_pairwise(&names, &result)).map_err(io_err)?;
        return Ok(1);
    }

    if !run.play {
        writeln!(term.out, "{} common teammates:", result.common.len()).map_err(io_err)?;
        let width = console_format::console_width();
        let listed = console_format::format_numbered(result.common.iter().map(|n| (n.as_str(), false)), width);
        term.writer().write_lines(&listed).map_err(io_err)?;
        return Ok(0);
    }

    let clues: [String; 3] = names.try_into().map_err(|_| "Player mode needs exactly three players".to_string())?;
    let mut session = GameSession::new();
    session.start_player_round(clues, &result, &mut rand::thread_rng()).map_err(|e| e.to_string())?;
    let solved = play_round(&mut session, term).map_err(io_err)?;
    Ok(if solved { 0 } else { 1 })
}

/// Pick one of several identities for `query`.
///
/// An explicit 1-based pick wins; otherwise ask when interactive, else take the first.
fn choose_identity(
    query: &str,
    mut candidates: Vec<Identity>,
    pick: Option<usize>,
    interactive: bool,
    term: &mut Terminal<'_>,
) -> Result<Identity, String> {
    if let Some(n) = pick {
        if n == 0 || n > candidates.len() {
            return Err(format!("--pick {} is out of range for '{}' ({} matches)", n, query, candidates.len()));
        }
        return Ok(candidates.swap_remove(n - 1));
    }
    if candidates.len() == 1 || !interactive {
        if candidates.len() > 1 {
            warn!("'{}' matches {} players; using {}", query, candidates.len(), candidates[0].label());
        }
        return Ok(candidates.swap_remove(0));
    }

    term.writer().write_lines(&console_format::format_candidates(query, &candidates)).map_err(io_err)?;
    loop {
        let Some(answer) = term.ask(&format!("Which one? [1-{}]", candidates.len())).map_err(io_err)? else {
            return Err(format!("No player chosen for '{}'", query));
        };
        match answer.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(candidates.swap_remove(n - 1)),
            _ => writeln!(term.out, "Enter a number between 1 and {}", candidates.len()).map_err(io_err)?,
        }
    }
}

/// Computer mode: build a puzzle from the directory, then play or print it
pub fn run_generate<S, D>(engine: &Engine<S, D>, run: &GenerateRun, term: &mut Terminal<'_>) -> Result<i32, String>
where
    S: SourceDataProvider,
    D: DirectoryProvider,
{
    let min_games = run.min_games.unwrap_or_else(|| run.difficulty.min_games());
    debug!("generating puzzle: difficulty {:?}, min games {}, {} trials", run.difficulty, min_games, run.max_trials);

    let puzzle = engine
        .generate_puzzle(run.max_trials, min_games)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| EngineError::ExhaustedAttempts { trials: run.max_trials }.to_string())?;

    if run.json {
        report::write_json(&mut *term.out, &report::puzzle_report(&puzzle, min_games)).map_err(io_err)?;
        return Ok(0);
    }

    let mut session = GameSession::new();
    session.start_computer_round(puzzle);
    if run.play {
        let solved = play_round(&mut session, term).map_err(io_err)?;
        return Ok(if solved { 0 } else { 1 });
    }

    if let Some(round) = session.round() {
        term.writer().write_clues(&round.clues).map_err(io_err)?;
        writeln!(term.out, "{}", console_format::format_answer_count(round.answers.len())).map_err(io_err)?;
    }
    if let Some(reveal) = session.give_up() {
        term.writer().write_reveal(&reveal).map_err(io_err)?;
    }
    Ok(0)
}

/// Guess until correct, giving up, or end of input. Returns true when solved.
pub fn play_round(session: &mut GameSession, term: &mut Terminal<'_>) -> io::Result<bool> {
    if let Some(round) = session.round() {
        let answers = round.answers.len();
        term.writer().write_clues(&round.clues)?;
        writeln!(term.out, "{}", console_format::format_answer_count(answers))?;
    }

    while session.round().is_some() {
        let Some(line) = term.ask("Your guess ('hint', 'give up'):")? else {
            break;
        };

        match line.to_lowercase().as_str() {
            "" => continue,
            "hint" => {
                if let Some(letter) = session.hint() {
                    writeln!(term.out, "Hint: the answer starts with '{}'", letter)?;
                }
            }
            "give up" | "giveup" | "quit" => break,
            _ => {
                let Some(outcome) = session.submit_guess(&line) else { break };
                term.writer().write_outcome(&outcome)?;
                if matches!(outcome, GuessOutcome::Correct { .. }) {
                    return Ok(true);
                }
            }
        }
    }

    if let Some(reveal) = session.give_up() {
        term.writer().write_reveal(&reveal)?;
    }
    Ok(false)
}

/// Offline answer check; exit code 0 when the guess names an answer
pub fn run_check(guess: &str, answers: &[String], out: &mut dyn Write) -> Result<i32, String> {
    let set = answers.iter().cloned().collect();
    match answer::matched_entry(guess, &set) {
        Some(matched) => {
            writeln!(out, "correct: {}", matched).map_err(io_err)?;
            Ok(0)
        }
        None => {
            writeln!(out, "wrong").map_err(io_err)?;
            Ok(1)
        }
    }
}

/// Print the roster extracted from a saved teammates page, one name per line
pub fn run_parse_table(file: &Path, min_games: u32, labels: ColumnLabels, out: &mut dyn Write) -> Result<i32, String> {
    let page = std::fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let table = html::first_table(&page).ok_or_else(|| format!("No table found in {}", file.display()))?;
    let roster = RosterTableParser::new(labels).parse(&table, min_games);

    for name in &roster {
        writeln!(out, "{}", name).map_err(io_err)?;
    }
    Ok(if roster.is_empty() { 1 } else { 0 })
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
