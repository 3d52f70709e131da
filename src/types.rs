/// Core data structures shared by the resolver, roster parser and puzzle generator
///
/// This module defines the identities returned by a player search, the raw
/// table shape handed over by the source provider, and the results the
/// engine produces from them.
use std::collections::{BTreeMap, BTreeSet};

/// A resolved reference to one player on the source site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub display_name: String, // "LeBron James"
    pub source_id: String,    // "jamesle01"
    pub source_url: String,   // "https://www.basketball-reference.com/players/j/jamesle01.html"
}

impl Identity {
    pub fn new(display_name: &str, source_id: &str, source_url: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            source_id: source_id.to_string(),
            source_url: source_url.to_string(),
        }
    }

    /// Label used when several identities share a display name
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.source_id)
    }
}

/// Ordered teammate names for one identity. Order is table order.
pub type Roster = Vec<String>;

/// Header of a single column, one entry per header level (outermost first).
///
/// Flat headers are a single-level sequence so column matching never has to
/// branch on the header shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderCell(pub Vec<String>);

impl HeaderCell {
    pub fn flat(text: &str) -> Self {
        HeaderCell(vec![text.to_string()])
    }

    pub fn levels(&self) -> &[String] {
        &self.0
    }

    /// The innermost (most specific) header level
    pub fn most_specific(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    /// True if any level contains `token` as a substring
    pub fn any_level_contains(&self, token: &str) -> bool {
        self.0.iter().any(|level| level.contains(token))
    }
}

/// A single table cell as delivered by the source
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Build a cell from extracted text, inferring numbers the way a table reader would
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Coerce to a number; text that does not parse and empty cells yield None
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().replace(',', "").parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Empty => None,
        }
    }

    /// String form of the cell; None for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }
}

/// Rows of cells plus one header per column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, col); out-of-range positions read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(EMPTY)
    }
}

/// Common teammates of several rosters plus every pairwise overlap
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntersectionResult {
    pub common: BTreeSet<String>,
    /// Keyed by roster indices (i, j) with i < j
    pub pairwise: BTreeMap<(usize, usize), BTreeSet<String>>,
}

impl IntersectionResult {
    pub fn is_empty(&self) -> bool {
        self.common.is_empty()
    }
}

/// A computer-generated round: three clues and every valid answer
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub clues: [String; 3],
    pub all_answers: BTreeSet<String>,
    /// The player the clues were built from; always a member of `all_answers`
    pub guaranteed_answer: String,
}
