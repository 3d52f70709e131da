/// Player directory: the list of every known player name
///
/// Names come from a local file or from a URL downloaded into the cache
/// directory. Two formats are understood: the nba_api static players JSON
/// (only active players are kept) and plain text with one name per line.
use crate::config::{DEFAULT_USER_AGENT, EngineConfig};
use crate::error::ProviderError;
use crate::provider::DirectoryProvider;
use log::{debug, warn};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum NamesLocation {
    File(PathBuf),
    Url { url: String, cache_dir: PathBuf, ttl: Duration },
}

/// Directory loaded once and kept for the life of the process
pub struct FileDirectory {
    location: NamesLocation,
    names: OnceLock<Vec<String>>,
}

#[derive(Deserialize)]
struct PlayerRecord {
    full_name: String,
    #[serde(default)]
    is_active: Option<bool>,
}

impl FileDirectory {
    pub fn new(location: NamesLocation) -> Self {
        Self { location, names: OnceLock::new() }
    }

    /// Directory from the configured names file or URL; None when neither is set
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        if let Some(path) = &config.names_file {
            return Some(Self::new(NamesLocation::File(path.clone())));
        }
        config.names_url.as_ref().map(|url| {
            Self::new(NamesLocation::Url {
                url: url.clone(),
                cache_dir: config.cache_dir.join("directory"),
                ttl: config.directory_ttl,
            })
        })
    }

    fn load(&self) -> Result<Vec<String>, ProviderError> {
        let path = match &self.location {
            NamesLocation::File(path) => path.clone(),
            NamesLocation::Url { url, cache_dir, ttl } => download_cached(url, cache_dir, *ttl)?,
        };
        debug!("loading player directory from {:?}", path);
        let text = fs::read_to_string(&path)?;
        let names = parse_names(&text)?;
        debug!("loaded {} player names", names.len());
        Ok(names)
    }
}

impl DirectoryProvider for FileDirectory {
    fn list_known_names(&self) -> Result<Vec<String>, ProviderError> {
        if let Some(names) = self.names.get() {
            return Ok(names.clone());
        }
        let loaded = self.load()?;
        Ok(self.names.get_or_init(|| loaded).clone())
    }
}

/// Stand-in when neither a names file nor a names URL is configured
pub struct NoDirectory;

impl DirectoryProvider for NoDirectory {
    fn list_known_names(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no player directory configured; pass --names-file or --names-url",
        )))
    }
}

/// Parse a directory file, sorted and without duplicates
pub fn parse_names(text: &str) -> Result<Vec<String>, ProviderError> {
    let mut names: Vec<String> = if text.trim_start().starts_with('[') {
        let records: Vec<PlayerRecord> =
            serde_json::from_str(text).map_err(|e| ProviderError::Parse(format!("player directory JSON: {}", e)))?;
        records.into_iter().filter(|r| r.is_active.unwrap_or(true)).map(|r| r.full_name.trim().to_string()).collect()
    } else {
        text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).map(String::from).collect()
    };

    names.retain(|n| !n.is_empty());
    names.sort();
    names.dedup();
    Ok(names)
}

/// Local copy of `url` under `cache_dir`, downloaded again once older than `ttl`.
///
/// A failed refresh falls back to the stale copy when there is one.
pub fn download_cached(url: &str, cache_dir: &Path, ttl: Duration) -> Result<PathBuf, ProviderError> {
    fs::create_dir_all(cache_dir)?;
    let target = cache_dir.join(cache_file_name(url));

    if let Some(age) = file_age(&target) {
        if age < ttl {
            debug!("using cached directory {:?} ({:?} old)", target, age);
            return Ok(target);
        }
        debug!("cached directory {:?} is stale", target);
    }

    match http_get_text(url) {
        Ok(body) => {
            // Write atomically: write to temp file, then rename
            let temp_file = target.with_extension("tmp");
            let mut file = File::create(&temp_file)?;
            file.write_all(body.as_bytes())?;
            file.flush()?;
            drop(file);
            fs::rename(&temp_file, &target)?;
            Ok(target)
        }
        Err(e) if target.is_file() => {
            warn!("could not refresh player directory ({}); using cached copy", e);
            Ok(target)
        }
        Err(e) => Err(e),
    }
}

fn http_get_text(url: &str) -> Result<String, ProviderError> {
    debug!("downloading player directory from {}", url);
    let resp = ureq::get(url).set("User-Agent", DEFAULT_USER_AGENT).call()?;
    Ok(resp.into_string()?)
}

fn file_age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(SystemTime::now().duration_since(modified).unwrap_or_default())
}

/// File name for a downloaded directory: the URL's last path segment, or a fixed fallback
fn cache_file_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments().and_then(|mut s| s.next_back().map(String::from)))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "players.json".to_string())
}
