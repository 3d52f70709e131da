use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Get the default cache directory for common-teammates
/// Uses platform-specific cache directories:
/// - Linux: ~/.cache/common-teammates
/// - macOS: ~/Library/Caches/common-teammates
/// - Windows: %LOCALAPPDATA%/common-teammates
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().map(|p| p.join("common-teammates")).unwrap_or_else(|| PathBuf::from(".teammates"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "common-teammates")]
#[command(about = "Name the NBA player who played with all three of these players")]
#[command(version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file (default: <config dir>/common-teammates/config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Player directory file: nba_api players JSON or one name per line
    #[arg(long, global = true, value_name = "PATH")]
    pub names_file: Option<PathBuf>,

    /// Download the player directory from this URL (cached under the cache dir)
    #[arg(long, global = true, value_name = "URL", conflicts_with = "names_file")]
    pub names_url: Option<String>,

    /// Directory for cached downloads
    /// Default: ~/.cache/common-teammates (Linux), ~/Library/Caches/common-teammates (macOS)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Remove the cache directory before running
    #[arg(long, global = true)]
    pub clean: bool,

    /// Delay before each player search, in milliseconds (default: 3000)
    #[arg(long, global = true, value_name = "MS")]
    pub search_delay_ms: Option<u64>,

    /// Roster entries that are never answers (default: "Teammate")
    /// Can specify multiple: --exclude Teammate Totals
    #[arg(long, global = true, value_name = "TOKEN", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, global = true, value_name = "COLUMNS", hide = true)]
    pub console_width: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Common teammates of three players you name
    Common {
        /// Three player names
        #[arg(num_args = 3, required = true, value_name = "NAME")]
        names: Vec<String>,

        /// Only count teammates with more than this many games together
        #[arg(long, default_value = "0")]
        min_games: u32,

        /// Which search result to use for each name when a search is ambiguous (1-based)
        /// Example: --pick 1,2,1
        #[arg(long, value_name = "I,J,K", value_delimiter = ',')]
        pick: Vec<usize>,

        /// Guess the answer interactively instead of printing it
        #[arg(long)]
        play: bool,

        /// Output the result as JSON
        #[arg(long, conflicts_with = "play")]
        json: bool,
    },

    /// Build a random puzzle from the player directory
    Generate {
        #[arg(long, value_enum, default_value = "easy")]
        difficulty: Difficulty,

        /// Overrides the difficulty's games threshold
        #[arg(long)]
        min_games: Option<u32>,

        /// Give up after this many attempts (default: 20)
        #[arg(long)]
        max_trials: Option<usize>,

        /// Guess the answer interactively instead of printing it
        #[arg(long)]
        play: bool,

        /// Output the puzzle as JSON
        #[arg(long, conflicts_with = "play")]
        json: bool,
    },

    /// Check a guess against a list of answers (exit code 0 when correct)
    Check {
        guess: String,

        #[arg(required = true, value_name = "ANSWER")]
        answers: Vec<String>,
    },

    /// Extract a roster from a saved teammates page
    ParseTable {
        file: PathBuf,

        #[arg(long, default_value = "0")]
        min_games: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// Only teammates with more than 50 games together
    Easy,
    /// Every teammate counts
    Hard,
}

impl Difficulty {
    pub fn min_games(self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Hard => 0,
        }
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Split exclude on commas as well, so '--exclude Teammate,Totals' works
        args.exclude = args
            .exclude
            .iter()
            .flat_map(|s| s.split(',').map(|t| t.trim().to_string()))
            .filter(|t| !t.is_empty())
            .collect();

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Common { names, pick, .. } => {
                if names.len() != 3 {
                    return Err(format!("Expected three player names, got {}", names.len()));
                }
                if let Some(blank) = names.iter().position(|n| n.trim().is_empty()) {
                    return Err(format!("Player name {} is empty", blank + 1));
                }
                if !pick.is_empty() && pick.len() != 3 {
                    return Err(format!("--pick needs three indices, got {}", pick.len()));
                }
                if pick.contains(&0) {
                    return Err("--pick indices start at 1".to_string());
                }
            }
            Command::Generate { max_trials: Some(0), .. } => {
                return Err("--max-trials must be at least 1".to_string());
            }
            Command::Generate { .. } => {}
            Command::Check { guess, .. } => {
                if guess.trim().is_empty() {
                    return Err("Guess is empty".to_string());
                }
            }
            Command::ParseTable { file, .. } => {
                if !file.is_file() {
                    return Err(format!("No such file: {}", file.display()));
                }
            }
        }

        if let Some(url) = &self.names_url {
            url::Url::parse(url).map_err(|e| format!("Invalid --names-url '{}': {}", url, e))?;
        }

        Ok(())
    }

    /// Get the cache directory, using the default cache location if not specified
    pub fn get_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}
