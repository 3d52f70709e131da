/// Error types for the source provider and the engine
///
/// Provider errors are recovered close to where they happen (a single
/// search, a single roster fetch, a single puzzle trial). Engine errors
/// carry the human-readable reason shown to the player.
use thiserror::Error;

/// Failure talking to the source site or reading the player directory
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("{url} is rate limiting requests")]
    Throttled { url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse response: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn is_throttled(&self) -> bool {
        matches!(self, ProviderError::Throttled { .. })
    }
}

impl From<ureq::Error> for ProviderError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(429, resp) => ProviderError::Throttled { url: resp.get_url().to_string() },
            ureq::Error::Status(code, resp) => ProviderError::Status { url: resp.get_url().to_string(), code },
            ureq::Error::Transport(t) => ProviderError::Http {
                url: t.url().map(|u| u.to_string()).unwrap_or_default(),
                message: t.to_string(),
            },
        }
    }
}

/// A condition the caller reports to the player
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("player not found: {query}")]
    PlayerNotFound { query: String },

    #[error("need at least 2 players to compare, got {got}")]
    TooFewPlayers { got: usize },

    #[error("these players have no common teammate, try another trio")]
    NoCommonTeammates,

    #[error("could not build a puzzle after {trials} attempts, try again later")]
    ExhaustedAttempts { trials: usize },

    #[error("player directory unavailable: {0}")]
    DirectoryUnavailable(String),
}
