//! JSON reports for `--json` output.
//!
//! Every report carries the mode, a generation timestamp and the games
//! threshold, so saved puzzles can be replayed or compared later.

use crate::types::{Identity, IntersectionResult, Puzzle};
use serde_json::{Value, json};
use std::io::{self, Write};

fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Report for a generated puzzle
pub fn puzzle_report(puzzle: &Puzzle, min_games: u32) -> Value {
    json!({
        "mode": "computer",
        "generated_at": timestamp(),
        "min_games": min_games,
        "clues": puzzle.clues,
        "answer_count": puzzle.all_answers.len(),
        "all_answers": puzzle.all_answers,
        "guaranteed_answer": puzzle.guaranteed_answer,
    })
}

/// Report for three chosen players and their intersection
pub fn common_report(players: &[Identity], roster_sizes: &[usize], result: &IntersectionResult, min_games: u32) -> Value {
    let players_json: Vec<Value> = players
        .iter()
        .zip(roster_sizes)
        .map(|(p, size)| {
            json!({
                "name": p.display_name,
                "id": p.source_id,
                "url": p.source_url,
                "teammates": size,
            })
        })
        .collect();

    let pairwise: Vec<Value> = result
        .pairwise
        .iter()
        .map(|(&(i, j), common)| {
            json!({
                "players": [players.get(i).map(|p| p.display_name.as_str()), players.get(j).map(|p| p.display_name.as_str())],
                "count": common.len(),
                "common": common,
            })
        })
        .collect();

    json!({
        "mode": "player",
        "generated_at": timestamp(),
        "min_games": min_games,
        "players": players_json,
        "common": result.common,
        "pairwise": pairwise,
    })
}

pub fn write_json<W: Write>(mut writer: W, report: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)
}
