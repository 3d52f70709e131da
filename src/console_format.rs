/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - The three-clue box shown at the start of a round
/// - Roster diagnostics for player mode
/// - Numbered answer lists with the round answer marked
/// - Text truncation and padding
///
/// Formatting functions return strings; `RoundWriter` sends them to any
/// `std::io::Write` destination, with optional colors.
use crate::session::{GuessOutcome, Reveal};
use crate::types::{Identity, IntersectionResult, Roster};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Roster entries shown per player in diagnostics
pub const ROSTER_PREVIEW: usize = 5;

const ANSWER_MARK: &str = "<- answer";

/// Writer for round output - configurable for color/plain text
pub struct RoundWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> RoundWriter<W> {
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors
            && let Some(ref mut t) = term::stdout()
        {
            let _ = t.fg(color);
            let _ = t.write_all(text.as_bytes());
            let _ = t.reset();
            return Ok(());
        }
        write!(self.writer, "{}", text)
    }

    pub fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn write_clues(&mut self, clues: &[String; 3]) -> io::Result<()> {
        write!(self.writer, "{}", format_clue_box(clues, console_width()))
    }

    pub fn write_outcome(&mut self, outcome: &GuessOutcome) -> io::Result<()> {
        match outcome {
            GuessOutcome::Correct { matched, others } => {
                self.write_colored(&format!("Correct! {} played with all three.", matched), term::color::BRIGHT_GREEN)?;
                writeln!(self.writer)?;
                if !others.is_empty() {
                    writeln!(self.writer, "Other valid answers:")?;
                    let lines = format_numbered(others.iter().map(|o| (o.as_str(), false)), console_width());
                    self.write_lines(&lines)?;
                }
                Ok(())
            }
            GuessOutcome::Wrong => {
                self.write_colored("Wrong, try again.", term::color::BRIGHT_RED)?;
                writeln!(self.writer)
            }
        }
    }

    pub fn write_reveal(&mut self, reveal: &Reveal) -> io::Result<()> {
        self.write_colored(&format!("The answer was {}.", reveal.answer), term::color::BRIGHT_YELLOW)?;
        writeln!(self.writer)?;
        if reveal.entries.len() > 1 {
            writeln!(self.writer, "All valid answers:")?;
            self.write_lines(&format_reveal(reveal, console_width()))?;
        }
        Ok(())
    }
}

//
// Console width
//

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Fix the console width instead of detecting it (first call wins)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Console width, detected once; defaults to 120 when not a terminal
pub fn console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(get_terminal_width)
}

fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

//
// Text Formatting Utilities
//

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);
    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }
    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }
    result
}

//
// Round rendering
//

/// Three clue players side by side in a box that fits `width` columns
pub fn format_clue_box(clues: &[String; 3], width: usize) -> String {
    // Borders: 4 bars plus one space either side of each cell
    let cell = (width.saturating_sub(4 + 6) / 3).clamp(12, 30);
    let rule = "─".repeat(cell + 2);

    let mut out = String::new();
    out.push_str(&format!("┌{}┬{}┬{}┐\n", rule, rule, rule));
    let labels: Vec<String> = (1..=3).map(|i| truncate_with_padding(&format!("Player {}", i), cell)).collect();
    out.push_str(&format!("│ {} │ {} │ {} │\n", labels[0], labels[1], labels[2]));
    let names: Vec<String> = clues.iter().map(|c| truncate_with_padding(c, cell)).collect();
    out.push_str(&format!("│ {} │ {} │ {} │\n", names[0], names[1], names[2]));
    out.push_str(&format!("└{}┴{}┴{}┘\n", rule, rule, rule));
    out
}

/// How many answers the round accepts, phrased for the player
pub fn format_answer_count(count: usize) -> String {
    match count {
        1 => "These clues have exactly one answer.".to_string(),
        n => format!("These clues have {} possible answers.", n),
    }
}

/// "- Name (id): N teammates" plus a preview of the first entries
pub fn format_roster_summary(identity: &Identity, roster: &Roster) -> Vec<String> {
    let mut lines = vec![format!("- {}: {} teammates", identity.label(), roster.len())];
    if !roster.is_empty() {
        let preview: Vec<&str> = roster.iter().take(ROSTER_PREVIEW).map(|s| s.as_str()).collect();
        lines.push(format!("  first {}: {}", preview.len(), preview.join(", ")));
    }
    lines
}

/// Pairwise overlap counts, used when the three-way intersection is empty
pub fn format_pairwise(names: &[String], result: &IntersectionResult) -> Vec<String> {
    result
        .pairwise
        .iter()
        .filter_map(|(&(i, j), common)| {
            let (a, b) = (names.get(i)?, names.get(j)?);
            Some(format!("- {} and {}: {} common teammates", a, b, common.len()))
        })
        .collect()
}

/// Candidate list for an ambiguous search
pub fn format_candidates(query: &str, candidates: &[Identity]) -> Vec<String> {
    let mut lines = vec![format!("Several players match '{}':", query)];
    lines.extend(candidates.iter().enumerate().map(|(i, c)| format!("  {}. {}", i + 1, c.label())));
    lines
}

/// Numbered list, one entry per line, marked entries flagged, each line fit to `width`
pub fn format_numbered<'a, I>(entries: I, width: usize) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, marked))| {
            let line = if marked { format!("{:>3}. {} {}", i + 1, name, ANSWER_MARK) } else { format!("{:>3}. {}", i + 1, name) };
            if display_width(&line) > width { truncate_with_padding(&line, width) } else { line }
        })
        .collect()
}

pub fn format_reveal(reveal: &Reveal, width: usize) -> Vec<String> {
    format_numbered(reveal.entries.iter().map(|e| (e.name.as_str(), e.is_answer)), width)
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
