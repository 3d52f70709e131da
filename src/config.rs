/// Configuration resolution module
///
/// This module handles:
/// - Built-in defaults for the data source, caches and pacing
/// - The optional TOML config file
/// - Environment overrides (`TEAMMATES_*`)
/// - Global CLI flags, which win over everything else
use crate::cli::{CliArgs, Command};
use crate::roster::ColumnLabels;
use log::debug;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything the engine and its providers need, fully resolved
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub base_url: String,
    pub user_agent: String,
    pub search_timeout: Duration,
    pub roster_timeout: Duration,
    pub search_delay: Duration,
    pub search_cache_ttl: Duration,
    pub roster_cache_ttl: Duration,
    pub directory_ttl: Duration,
    pub max_trials: usize,
    pub exclude_tokens: Vec<String>,
    pub labels: ColumnLabels,
    pub names_file: Option<PathBuf>,
    pub names_url: Option<String>,
    pub cache_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_timeout: Duration::from_secs(10),
            roster_timeout: Duration::from_secs(15),
            search_delay: Duration::from_secs(3),
            search_cache_ttl: Duration::from_secs(3600),
            roster_cache_ttl: Duration::from_secs(3600),
            directory_ttl: Duration::from_secs(24 * 3600),
            max_trials: 20,
            exclude_tokens: vec!["Teammate".to_string()],
            labels: ColumnLabels::default(),
            names_file: None,
            names_url: None,
            cache_dir: crate::cli::default_cache_dir(),
        }
    }
}

/// On-disk config; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub search_timeout_secs: Option<u64>,
    pub roster_timeout_secs: Option<u64>,
    pub search_delay_ms: Option<u64>,
    pub search_cache_ttl_secs: Option<u64>,
    pub roster_cache_ttl_secs: Option<u64>,
    pub directory_ttl_secs: Option<u64>,
    pub max_trials: Option<usize>,
    pub exclude: Option<Vec<String>>,
    pub name_column: Option<String>,
    pub games_column: Option<String>,
    pub names_file: Option<PathBuf>,
    pub names_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

/// Build the engine configuration from defaults, config file, environment and CLI flags
pub fn build_engine_config(args: &CliArgs) -> Result<EngineConfig, String> {
    debug!("Building engine config from CLI args");

    let mut config = EngineConfig::default();

    if let Some(path) = config_file_path(args)? {
        debug!("Reading config file {:?}", path);
        apply_file(&mut config, load_file_config(&path)?);
    }

    apply_env(&mut config, |key| env::var(key).ok())?;
    apply_cli(&mut config, args);

    if config.base_url.trim().is_empty() {
        return Err("Base URL is empty".to_string());
    }
    if config.max_trials == 0 {
        return Err("max_trials must be at least 1".to_string());
    }

    debug!("Resolved config: {:?}", config);
    Ok(config)
}

/// Explicit --config must exist; the default location is optional
fn config_file_path(args: &CliArgs) -> Result<Option<PathBuf>, String> {
    if let Some(path) = &args.config {
        if !path.is_file() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path.clone()));
    }

    Ok(dirs::config_dir().map(|d| d.join("common-teammates").join("config.toml")).filter(|p| p.is_file()))
}

pub fn load_file_config(path: &Path) -> Result<FileConfig, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_file_config(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

pub fn parse_file_config(text: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(text)
}

pub fn apply_file(config: &mut EngineConfig, file: FileConfig) {
    if let Some(url) = file.base_url {
        config.base_url = url;
    }
    if let Some(agent) = file.user_agent {
        config.user_agent = agent;
    }
    if let Some(secs) = file.search_timeout_secs {
        config.search_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.roster_timeout_secs {
        config.roster_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = file.search_delay_ms {
        config.search_delay = Duration::from_millis(ms);
    }
    if let Some(secs) = file.search_cache_ttl_secs {
        config.search_cache_ttl = Duration::from_secs(secs);
    }
    if let Some(secs) = file.roster_cache_ttl_secs {
        config.roster_cache_ttl = Duration::from_secs(secs);
    }
    if let Some(secs) = file.directory_ttl_secs {
        config.directory_ttl = Duration::from_secs(secs);
    }
    if let Some(trials) = file.max_trials {
        config.max_trials = trials;
    }
    if let Some(tokens) = file.exclude {
        config.exclude_tokens = tokens;
    }
    if let Some(name) = file.name_column {
        config.labels.name = name;
    }
    if let Some(count) = file.games_column {
        config.labels.count = count;
    }
    if file.names_file.is_some() {
        config.names_file = file.names_file;
    }
    if file.names_url.is_some() {
        config.names_url = file.names_url;
    }
    if let Some(dir) = file.cache_dir {
        config.cache_dir = dir;
    }
}

/// Apply `TEAMMATES_*` overrides read through `lookup`
pub fn apply_env<F>(config: &mut EngineConfig, lookup: F) -> Result<(), String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("TEAMMATES_BASE_URL") {
        config.base_url = url;
    }
    if let Some(ms) = lookup("TEAMMATES_SEARCH_DELAY_MS") {
        let ms: u64 =
            ms.trim().parse().map_err(|_| format!("TEAMMATES_SEARCH_DELAY_MS is not a number of milliseconds: {}", ms))?;
        config.search_delay = Duration::from_millis(ms);
    }
    if let Some(path) = lookup("TEAMMATES_NAMES_FILE") {
        config.names_file = Some(PathBuf::from(path));
        config.names_url = None;
    }
    Ok(())
}

pub fn apply_cli(config: &mut EngineConfig, args: &CliArgs) {
    if let Some(path) = &args.names_file {
        config.names_file = Some(path.clone());
        config.names_url = None;
    }
    if let Some(url) = &args.names_url {
        config.names_url = Some(url.clone());
        config.names_file = None;
    }
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(ms) = args.search_delay_ms {
        config.search_delay = Duration::from_millis(ms);
    }
    if !args.exclude.is_empty() {
        config.exclude_tokens = args.exclude.clone();
    }
    if let Command::Generate { max_trials: Some(trials), .. } = &args.command {
        config.max_trials = *trials;
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
