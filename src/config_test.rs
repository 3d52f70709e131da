/// Tests for config module
#[cfg(test)]
mod tests {
    use crate::cli::CliArgs;
    use crate::config::{
        DEFAULT_BASE_URL, EngineConfig, apply_cli, apply_env, apply_file, build_engine_config, parse_file_config,
    };
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn args(argv: &[&str]) -> CliArgs {
        let mut full = vec!["common-teammates"];
        full.extend_from_slice(argv);
        CliArgs::try_parse_from(full).expect("Should parse args")
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.search_timeout, Duration::from_secs(10));
        assert_eq!(config.roster_timeout, Duration::from_secs(15));
        assert_eq!(config.search_delay, Duration::from_secs(3));
        assert_eq!(config.search_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.roster_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.directory_ttl, Duration::from_secs(86400));
        assert_eq!(config.max_trials, 20);
        assert_eq!(config.exclude_tokens, vec!["Teammate".to_string()]);
        assert_eq!(config.labels.name, "Teammate");
        assert_eq!(config.labels.count, "G");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = parse_file_config(
            r#"
            base_url = "http://localhost:8080"
            search_delay_ms = 250
            roster_cache_ttl_secs = 60
            max_trials = 5
            exclude = ["Teammate", "Totals"]
            games_column = "GP"
            "#,
        )
        .expect("Should parse config");

        let mut config = EngineConfig::default();
        apply_file(&mut config, file);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.search_delay, Duration::from_millis(250));
        assert_eq!(config.roster_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.max_trials, 5);
        assert_eq!(config.exclude_tokens, vec!["Teammate".to_string(), "Totals".to_string()]);
        assert_eq!(config.labels.count, "GP");
        // Untouched keys keep their defaults
        assert_eq!(config.labels.name, "Teammate");
        assert_eq!(config.search_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        assert!(parse_file_config("max_trails = 5").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TEAMMATES_BASE_URL", "http://mirror.test"),
            ("TEAMMATES_SEARCH_DELAY_MS", " 0 "),
            ("TEAMMATES_NAMES_FILE", "/data/players.json"),
        ]);
        let mut config = EngineConfig { names_url: Some("http://x.test/names.json".to_string()), ..Default::default() };
        apply_env(&mut config, |key| vars.get(key).map(|v| v.to_string())).expect("Should apply env");

        assert_eq!(config.base_url, "http://mirror.test");
        assert_eq!(config.search_delay, Duration::ZERO);
        assert_eq!(config.names_file, Some(PathBuf::from("/data/players.json")));
        assert_eq!(config.names_url, None, "a names file replaces a names URL");
    }

    #[test]
    fn test_bad_env_delay_is_error() {
        let mut config = EngineConfig::default();
        let result = apply_env(&mut config, |key| (key == "TEAMMATES_SEARCH_DELAY_MS").then(|| "soon".to_string()));
        assert!(result.unwrap_err().contains("TEAMMATES_SEARCH_DELAY_MS"));
    }

    #[test]
    fn test_cli_wins_over_env() {
        let mut config = EngineConfig::default();
        apply_env(&mut config, |key| (key == "TEAMMATES_SEARCH_DELAY_MS").then(|| "500".to_string())).unwrap();
        apply_cli(
            &mut config,
            &args(&["generate", "--max-trials", "3", "--search-delay-ms", "10", "--exclude", "Teammate", "Totals"]),
        );

        assert_eq!(config.search_delay, Duration::from_millis(10));
        assert_eq!(config.max_trials, 3);
        assert_eq!(config.exclude_tokens.len(), 2);
    }

    #[test]
    fn test_cli_names_url_replaces_names_file() {
        let mut config = EngineConfig { names_file: Some(PathBuf::from("names.txt")), ..Default::default() };
        apply_cli(&mut config, &args(&["generate", "--names-url", "https://example.test/players.json"]));
        assert_eq!(config.names_file, None);
        assert_eq!(config.names_url.as_deref(), Some("https://example.test/players.json"));
    }

    #[test]
    fn test_build_reads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_trials = 7\ncache_dir = \"/tmp/teammates-cache\"\n").unwrap();

        let config = build_engine_config(&args(&["check", "a", "a", "--config", path.to_str().unwrap()]))
            .expect("Should build config");
        assert_eq!(config.max_trials, 7);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/teammates-cache"));
    }

    #[test]
    fn test_build_missing_config_file_is_error() {
        let result = build_engine_config(&args(&["check", "a", "a", "--config", "/nonexistent/teammates.toml"]));
        assert!(result.unwrap_err().contains("not found"));
    }

    #[test]
    fn test_build_rejects_zero_trials_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_trials = 0\n").unwrap();

        let result = build_engine_config(&args(&["check", "a", "a", "--config", path.to_str().unwrap()]));
        assert!(result.is_err());
    }
}
