// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod answer;
mod cache;
mod cli;
mod config;
mod console_format;
mod directory;
mod engine;
mod error;
mod html;
mod normalize;
mod pacing;
mod provider;
mod puzzle;
mod report;
mod resolver;
mod roster;
mod runner;
mod session;
mod source;
mod teammates;
mod types;
mod ui;

#[cfg(test)]
mod testutil;

use cache::CachedSource;
use cli::Command;
use config::EngineConfig;
use directory::{FileDirectory, NoDirectory};
use engine::Engine;
use provider::DirectoryProvider;
use source::HttpSource;
use std::fs;
use std::io::{self, IsTerminal};

type LiveEngine = Engine<CachedSource<HttpSource>, Box<dyn DirectoryProvider>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    let config = match config::build_engine_config(&args) {
        Ok(c) => c,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    // Clean cache directory if requested
    if args.clean && config.cache_dir.exists() {
        match fs::remove_dir_all(&config.cache_dir) {
            Ok(_) => ui::status(&format!("Cleaned cache directory: {}", config.cache_dir.display())),
            Err(e) => ui::print_warning(&format!("Failed to clean cache directory: {}", e)),
        }
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let exit_code = match run(&args.command, &config) {
        Ok(code) => code,
        Err(e) => {
            ui::print_error(&e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn run(command: &Command, config: &EngineConfig) -> Result<i32, String> {
    let stdout = io::stdout();
    let colors = stdout.is_terminal();
    let mut out = stdout.lock();
    let interactive = io::stdin().is_terminal();

    match command {
        Command::Check { guess, answers } => runner::run_check(guess, answers, &mut out),
        Command::ParseTable { file, min_games } => {
            runner::run_parse_table(file, *min_games, config.labels.clone(), &mut out)
        }
        Command::Common { names, min_games, pick, play, json } => {
            let engine = build_engine(config)?;
            let mut input = io::stdin().lock();
            let mut term = runner::Terminal { input: &mut input, out: &mut out, colors, interactive };
            let run = runner::CommonRun { names, pick, min_games: *min_games, play: *play, json: *json };
            runner::run_common(&engine, &run, &mut term)
        }
        Command::Generate { difficulty, min_games, play, json, .. } => {
            let engine = build_engine(config)?;
            if !*json {
                ui::status("Building a puzzle; every lookup is paced, so this can take a minute...");
            }
            let mut input = io::stdin().lock();
            let mut term = runner::Terminal { input: &mut input, out: &mut out, colors, interactive };
            let run = runner::GenerateRun {
                difficulty: *difficulty,
                min_games: *min_games,
                max_trials: config.max_trials,
                play: *play,
                json: *json,
            };
            runner::run_generate(&engine, &run, &mut term)
        }
    }
}

fn build_engine(config: &EngineConfig) -> Result<LiveEngine, String> {
    let http = HttpSource::new(config).map_err(|e| format!("Configuration error: {}", e))?;
    let source = CachedSource::new(http, config.search_cache_ttl, config.roster_cache_ttl);

    let directory: Box<dyn DirectoryProvider> = match FileDirectory::from_config(config) {
        Some(d) => Box::new(d),
        None => Box::new(NoDirectory),
    };

    Ok(Engine::new(source, directory, config))
}
