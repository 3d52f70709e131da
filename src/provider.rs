/// Collaborator contracts for the data the engine consumes
///
/// The engine never talks HTTP directly. It asks a `SourceDataProvider` to
/// search for players and to hand over a player's raw teammates table, and
/// a `DirectoryProvider` for the list of all known player names.
use crate::error::ProviderError;
use crate::types::{Identity, RawTable};

/// One entry of a search result listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub display_name: String,
    pub stable_key: String,
    pub url: String,
}

impl SearchHit {
    pub fn into_identity(self) -> Identity {
        Identity { display_name: self.display_name, source_id: self.stable_key, source_url: self.url }
    }
}

/// What a search returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The site jumped straight to one player's page
    Redirect(SearchHit),
    /// A results page, in relevance order
    Listing(Vec<SearchHit>),
}

pub trait SourceDataProvider {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError>;

    /// Raw teammates table for a player; `Ok(None)` when the page has no table
    fn fetch_roster_table(&self, stable_key: &str, display_name: &str) -> Result<Option<RawTable>, ProviderError>;
}

pub trait DirectoryProvider {
    /// Every known player name, sorted and deduplicated
    fn list_known_names(&self) -> Result<Vec<String>, ProviderError>;
}

impl<T: SourceDataProvider + ?Sized> SourceDataProvider for Box<T> {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        (**self).search(query)
    }

    fn fetch_roster_table(&self, stable_key: &str, display_name: &str) -> Result<Option<RawTable>, ProviderError> {
        (**self).fetch_roster_table(stable_key, display_name)
    }
}

impl<T: SourceDataProvider + ?Sized> SourceDataProvider for &T {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        (**self).search(query)
    }

    fn fetch_roster_table(&self, stable_key: &str, display_name: &str) -> Result<Option<RawTable>, ProviderError> {
        (**self).fetch_roster_table(stable_key, display_name)
    }
}

impl<T: DirectoryProvider + ?Sized> DirectoryProvider for Box<T> {
    fn list_known_names(&self) -> Result<Vec<String>, ProviderError> {
        (**self).list_known_names()
    }
}
