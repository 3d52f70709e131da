/// HTTP source provider for basketball-reference.com
///
/// This module handles:
/// - Player searches (redirect to a player page, or a results listing)
/// - Fetching the teammates table for one player
/// - Pacing searches and backing off when the site throttles us
use crate::config::EngineConfig;
use crate::error::ProviderError;
use crate::html::{self, Tag};
use crate::pacing::Pacer;
use crate::provider::{SearchHit, SearchOutcome, SourceDataProvider};
use crate::types::RawTable;
use log::{debug, warn};
use std::time::Duration;
use url::Url;

const SEARCH_PATH: &str = "/search/search.fcgi";
const TEAMMATES_PATH: &str = "/friv/teammates_and_opponents.fcgi";
const PLAYER_PATH_MARKER: &str = "/players/";

pub struct HttpSource {
    agent: ureq::Agent,
    base: Url,
    user_agent: String,
    search_timeout: Duration,
    roster_timeout: Duration,
    pacer: Pacer,
}

impl HttpSource {
    pub fn new(config: &EngineConfig) -> Result<Self, ProviderError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ProviderError::Parse(format!("invalid base URL {}: {}", config.base_url, e)))?;

        Ok(Self {
            agent: ureq::AgentBuilder::new().redirects(5).build(),
            base,
            user_agent: config.user_agent.clone(),
            search_timeout: config.search_timeout,
            roster_timeout: config.roster_timeout,
            pacer: Pacer::new(config.search_delay),
        })
    }

    pub fn search_url(&self, query: &str) -> Result<Url, ProviderError> {
        let mut url = self.join(SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("search", query);
        Ok(url)
    }

    pub fn roster_url(&self, stable_key: &str, display_name: &str) -> Result<Url, ProviderError> {
        let mut url = self.join(TEAMMATES_PATH)?;
        url.query_pairs_mut()
            .append_pair("pid_select", display_name)
            .append_pair("pid", stable_key)
            .append_pair("idx", "players")
            .append_pair("type", "t");
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, ProviderError> {
        self.base.join(path).map_err(|e| ProviderError::Parse(format!("cannot build URL for {}: {}", path, e)))
    }

    /// GET a page; returns the URL we ended up at after redirects and the body
    fn get_page(&self, url: &Url, timeout: Duration) -> Result<(String, String), ProviderError> {
        debug!("GET {}", url);
        let resp = self.agent.request_url("GET", url).set("User-Agent", &self.user_agent).timeout(timeout).call()?;
        let final_url = resp.get_url().to_string();
        let body = resp.into_string()?;
        Ok((final_url, body))
    }

    fn note_outcome<T>(&self, result: &Result<T, ProviderError>) {
        match result {
            Ok(_) => self.pacer.succeeded(),
            Err(e) if e.is_throttled() => {
                warn!("{}", e);
                self.pacer.throttled();
            }
            Err(_) => {}
        }
    }
}

impl SourceDataProvider for HttpSource {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        let url = self.search_url(query)?;
        self.pacer.wait();

        let result = self.get_page(&url, self.search_timeout);
        self.note_outcome(&result);
        let (final_url, body) = result?;

        Ok(parse_search_page(&final_url, &body, &self.base))
    }

    fn fetch_roster_table(&self, stable_key: &str, display_name: &str) -> Result<Option<RawTable>, ProviderError> {
        let url = self.roster_url(stable_key, display_name)?;

        let result = match self.get_page(&url, self.roster_timeout) {
            Err(ProviderError::Status { code: 404, .. }) => {
                debug!("no teammates page for {}", stable_key);
                return Ok(None);
            }
            other => other,
        };
        self.note_outcome(&result);
        let (_, body) = result?;

        let table = html::first_table(&body);
        if table.is_none() {
            debug!("teammates page for {} has no table", stable_key);
        }
        Ok(table)
    }
}

/// Interpret a search response.
///
/// Landing on a player page means the search was unambiguous. Otherwise the
/// player links inside the `search-results` block form the listing.
pub fn parse_search_page(final_url: &str, body: &str, base: &Url) -> SearchOutcome {
    if final_url.contains(PLAYER_PATH_MARKER)
        && let Some(key) = stable_key(final_url)
    {
        let display_name = html::page_title(body)
            .and_then(|title| title.split(" Stats").next().map(|s| s.trim().to_string()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| key.clone());
        return SearchOutcome::Redirect(SearchHit { display_name, stable_key: key, url: final_url.to_string() });
    }

    let page = html::strip_comments(body);
    let Some(results) = html::element_by_class(&page, Tag::Div, "search-results") else {
        return SearchOutcome::Listing(Vec::new());
    };

    let hits = html::links(results.inner)
        .into_iter()
        .filter(|link| link.href.contains(PLAYER_PATH_MARKER))
        .filter_map(|link| {
            let key = stable_key(&link.href)?;
            let url = base.join(&link.href).map(|u| u.to_string()).unwrap_or(link.href);
            Some(SearchHit { display_name: link.text, stable_key: key, url })
        })
        .collect();

    SearchOutcome::Listing(hits)
}

/// Last path segment of a player page URL without `.html`
pub fn stable_key(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next()?;
    let last = path.rsplit('/').next()?;
    let key = last.strip_suffix(".html")?;
    (!key.is_empty()).then(|| key.to_string())
}
