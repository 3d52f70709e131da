/// Teammate roster extraction
///
/// This module handles:
/// - Locating the teammate-name and games-played columns in a raw table
/// - Applying the minimum-games filter
/// - Discarding garbage rows (footers, totals, blank and numeric cells)
/// - Fetching and caching rosters per (player, minimum games)
use crate::cache::TtlCache;
use crate::provider::SourceDataProvider;
use crate::types::{Identity, RawTable, Roster};
use log::{debug, warn};
use std::time::Duration;

/// Marker the site appends to players on a current roster
const CURRENT_ROSTER_MARKER: char = '*';

/// Header labels identifying the columns we read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    /// Substring of any header level of the name column
    pub name: String,
    /// Exact innermost header level of the games-played column
    pub count: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self { name: "Teammate".to_string(), count: "G".to_string() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RosterTableParser {
    labels: ColumnLabels,
}

impl RosterTableParser {
    pub fn new(labels: ColumnLabels) -> Self {
        Self { labels }
    }

    /// Index of the first column with the name label in any header level
    pub fn find_name_column(&self, table: &RawTable) -> Option<usize> {
        table.headers.iter().position(|h| h.any_level_contains(&self.labels.name))
    }

    /// Index of the first column whose innermost header level is the count label
    pub fn find_count_column(&self, table: &RawTable) -> Option<usize> {
        table
            .headers
            .iter()
            .position(|h| h.most_specific().map(|s| s.trim() == self.labels.count).unwrap_or(false))
    }

    /// Extract the teammate names of rows with more than `min_games` games.
    ///
    /// Without a games column every row passes the filter. Without a name
    /// column the roster is empty. Neither case is an error.
    pub fn parse(&self, table: &RawTable, min_games: u32) -> Roster {
        let Some(name_col) = self.find_name_column(table) else {
            warn!("no '{}' column in teammates table; treating roster as empty", self.labels.name);
            return Vec::new();
        };

        let count_col = self.find_count_column(table);
        if count_col.is_none() {
            warn!("no '{}' column in teammates table; minimum-games filter not applied", self.labels.count);
        }

        let min = f64::from(min_games);
        let roster: Roster = (0..table.rows.len())
            .filter(|&row| match count_col {
                Some(col) => table.cell(row, col).as_number().map(|games| games > min).unwrap_or(false),
                None => true,
            })
            .filter_map(|row| table.cell(row, name_col).as_text())
            .filter_map(|raw| clean_name(&raw))
            .collect();

        debug!("parsed {} teammates (min games {}) from {} rows", roster.len(), min_games, table.rows.len());
        roster
    }
}

/// Clean a raw name cell; None if the row is not a plausible player name
pub fn clean_name(raw: &str) -> Option<String> {
    let cleaned = raw.replace(CURRENT_ROSTER_MARKER, "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= 2 {
        return None;
    }
    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(cleaned.to_string())
}

/// Fetches, parses and caches rosters keyed by (stable key, minimum games)
pub struct RosterFetcher {
    parser: RosterTableParser,
    cache: TtlCache<(String, u32), Roster>,
}

impl RosterFetcher {
    pub fn new(parser: RosterTableParser, ttl: Duration) -> Self {
        Self { parser, cache: TtlCache::new(ttl) }
    }

    pub fn parser(&self) -> &RosterTableParser {
        &self.parser
    }

    /// Roster for `identity`. Provider failures and missing tables yield an
    /// empty roster plus a warning.
    pub fn roster(&self, source: &dyn SourceDataProvider, identity: &Identity, min_games: u32) -> Roster {
        let key = (identity.source_id.clone(), min_games);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let roster = match source.fetch_roster_table(&identity.source_id, &identity.display_name) {
            Ok(Some(table)) => self.parser.parse(&table, min_games),
            Ok(None) => {
                warn!("no teammates table found for {}", identity.label());
                Vec::new()
            }
            Err(e) => {
                warn!("failed to fetch teammates of {}: {}", identity.label(), e);
                return Vec::new();
            }
        };

        self.cache.insert(key, roster.clone());
        roster
    }
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;
