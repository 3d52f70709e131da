/// Guess checking
///
/// A guess is correct if it names any member of the answer set once both
/// sides are normalized; accents, casing and stray whitespace don't count.
use crate::normalize::normalize_name;
use std::collections::BTreeSet;

/// The answer-set member the guess names, in its original spelling
pub fn matched_entry<'a>(guess: &str, answers: &'a BTreeSet<String>) -> Option<&'a String> {
    let wanted = normalize_name(guess);
    if wanted.is_empty() {
        return None;
    }
    answers.iter().find(|answer| normalize_name(answer) == wanted)
}

pub fn is_correct(guess: &str, answers: &BTreeSet<String>) -> bool {
    matched_entry(guess, answers).is_some()
}
