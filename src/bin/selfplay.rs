//! Self-play game generation CLI.
//!
//! Plays random-vs-random games and outputs the records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --max-turns N   Turn limit per game (default: 100)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --config FILE   JSON game config (default: built-in rules)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use riftfall::config::{ConfigError, GameConfig};
use riftfall::selfplay::{self, SelfPlayConfig, SelfPlayError};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0} needs a value")]
    MissingValue(String),

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("cannot read {path}: {source}")]
    ReadConfig { path: String, source: io::Error },

    #[error("bad config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SelfPlay(#[from] SelfPlayError),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::MissingValue(_) | CliError::InvalidValue { .. } | CliError::UnknownArgument(_)
        )
    }
}

struct Options {
    config: SelfPlayConfig,
    output_path: Option<String>,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, CliError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn parsed<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, CliError> {
    let raw = value(args, i, flag)?;
    raw.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: raw.to_string(),
    })
}

/// Parses the command line. `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>, CliError> {
    let mut config = SelfPlayConfig::default();
    let mut output_path = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--games" => {
                i += 1;
                config.num_games = parsed(args, i, flag)?;
            }
            "--max-turns" => {
                i += 1;
                config.max_turns = parsed(args, i, flag)?;
            }
            "--threads" => {
                i += 1;
                config.threads = parsed(args, i, flag)?;
            }
            "--seed" => {
                i += 1;
                config.seed = parsed(args, i, flag)?;
            }
            "--config" => {
                i += 1;
                let path = value(args, i, flag)?;
                let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
                    path: path.to_string(),
                    source,
                })?;
                config.game = GameConfig::from_json(&text)?;
            }
            "--output" => {
                i += 1;
                output_path = Some(value(args, i, flag)?.to_string());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                return Ok(None);
            }
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
        i += 1;
    }

    Ok(Some(Options { config, output_path }))
}

fn run(options: Options) -> Result<(), CliError> {
    let config = &options.config;
    if !config.quiet {
        info!(
            "Self-play: {} games, max {} turns, {} threads, rift {:?}",
            config.num_games, config.max_turns, config.threads, config.game.rift
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(config)?;
    let elapsed = start.elapsed().as_secs_f64();

    if !config.quiet {
        info!(
            "Completed {} games in {:.1}s ({:.1} games/s)",
            games.len(),
            elapsed,
            games.len() as f64 / elapsed.max(1e-9)
        );
        selfplay::print_summary(&games);
    }

    match &options.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            selfplay::write_jsonl(&games, &mut writer)?;
            if !config.quiet {
                info!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let quiet = args.iter().any(|a| a == "--quiet");
    let level = if quiet { Level::WARN } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let result = parse_args(&args).and_then(|options| match options {
        Some(options) => run(options),
        None => {
            print_usage();
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            error!("{e}");
            print_usage();
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --max-turns N    Turn limit per game (default: 100)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE    JSON game config (default: built-in rules)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
