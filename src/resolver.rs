/// Player identity resolution
///
/// Turns free text into candidate identities via the source provider's
/// search. Picking between several candidates is left to the caller.
use crate::provider::{SearchOutcome, SourceDataProvider};
use crate::types::Identity;
use log::{debug, warn};
use std::collections::HashSet;

pub struct IdentityResolver<'a> {
    source: &'a dyn SourceDataProvider,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(source: &'a dyn SourceDataProvider) -> Self {
        Self { source }
    }

    /// Candidate identities for `query`, in the provider's relevance order.
    ///
    /// An empty result means "player not found". Provider failures are
    /// logged and also reported as an empty result.
    pub fn resolve(&self, query: &str) -> Vec<Identity> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let outcome = match self.source.search(query) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("search for {:?} failed: {}", query, e);
                return Vec::new();
            }
        };

        let identities = match outcome {
            SearchOutcome::Redirect(hit) => vec![hit.into_identity()],
            SearchOutcome::Listing(hits) => {
                // The same player can be listed twice; keep the first occurrence
                let mut seen = HashSet::new();
                hits.into_iter()
                    .filter(|h| seen.insert(h.stable_key.clone()))
                    .map(|h| h.into_identity())
                    .collect()
            }
        };

        debug!("resolved {:?} to {} candidate(s)", query, identities.len());
        identities
    }
}
