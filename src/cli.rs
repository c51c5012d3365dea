//! Command-line interface definitions for Daily Headlines.
//!
//! Every option is optional; anything not given falls back to the config file
//! (if any) and then to the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Daily Headlines job.
///
/// # Examples
///
/// ```sh
/// # One run with the built-in sources, writing ./articles.csv
/// daily_headlines
///
/// # Custom output and config file
/// daily_headlines -o /data/articles.csv -c ./headlines.yaml
///
/// # Stay resident and run every day at 00:00 UTC
/// daily_headlines --daily
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output CSV path
    #[arg(short, long, env = "DAILY_HEADLINES_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run once per day at midnight UTC instead of once and exit
    #[arg(long)]
    pub daily: bool,

    /// Re-runs allowed after a failed attempt
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,
}
