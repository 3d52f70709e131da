/// Common-teammate set computation
///
/// Intersects two or more rosters, reports every pairwise overlap for
/// diagnostics, and drops placeholder tokens such as a header echo that
/// slipped past roster parsing.
use crate::normalize::normalize_name;
use crate::types::{IntersectionResult, Roster};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone)]
pub struct TeammateSetEngine {
    excluded: HashSet<String>, // normalized
}

impl TeammateSetEngine {
    pub fn new<S: AsRef<str>>(exclude_tokens: &[S]) -> Self {
        Self { excluded: exclude_tokens.iter().map(|t| normalize_name(t.as_ref())).collect() }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(&normalize_name(name))
    }

    /// Intersection of all rosters plus each pairwise intersection.
    ///
    /// Excluded tokens are removed from both, so `common` is always a subset
    /// of every pairwise set. No rosters yields an empty result.
    pub fn intersect(&self, rosters: &[Roster]) -> IntersectionResult {
        let sets: Vec<BTreeSet<&str>> =
            rosters.iter().map(|r| r.iter().map(|s| s.as_str()).filter(|s| !self.is_excluded(s)).collect()).collect();

        let mut result = IntersectionResult::default();
        let Some((first, rest)) = sets.split_first() else {
            return result;
        };

        result.common = first
            .iter()
            .filter(|name| rest.iter().all(|other| other.contains(*name)))
            .map(|name| name.to_string())
            .collect();

        for i in 0..sets.len() {
            for j in (i + 1)..sets.len() {
                let both = sets[i].intersection(&sets[j]).map(|s| s.to_string()).collect();
                result.pairwise.insert((i, j), both);
            }
        }

        result
    }
}

impl Default for TeammateSetEngine {
    fn default() -> Self {
        Self::new(&["Teammate"])
    }
}
