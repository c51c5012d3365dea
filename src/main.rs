//! # Daily Headlines
//!
//! A batch job that scrapes the front pages of Dawn.com and BBC.com, pulls a
//! title and description out of every article teaser, normalizes the text,
//! and writes everything to one CSV file.
//!
//! ## Usage
//!
//! ```sh
//! daily_headlines -o ./articles.csv
//! daily_headlines --daily -c ./headlines.yaml
//! ```
//!
//! ## Architecture
//!
//! A single linear pipeline, one source at a time:
//! 1. **Fetching**: GET the source homepage
//! 2. **Locating**: find every article container on the page
//! 3. **Extracting**: read title and description, or fall back to a sentinel
//! 4. **Normalizing**: strip symbols, collapse whitespace, lowercase
//! 5. **Output**: overwrite the CSV once every source has been read
//!
//! The whole run is retried on network or write failure.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod errors;
mod models;
mod outputs;
mod pipeline;
mod schedule;
mod scrapers;
mod utils;

use cli::Cli;
use config::AppConfig;
use utils::ensure_writable_parent;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_headlines starting up");

    let args = Cli::parse();
    debug!(?args.output, ?args.config, args.daily, "Parsed CLI arguments");

    let config = AppConfig::load(&args).await?;

    // Early check: fail fast instead of after fetching everything
    if let Err(e) = ensure_writable_parent(&config.output_path).await {
        error!(
            path = %config.output_path.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    if args.daily {
        schedule::run_daily(&config).await?;
    } else {
        let report = schedule::run_once(&config).await?;
        for (source, count) in &report.per_source {
            info!(%source, count, "Rows written");
        }
        info!(
            total = report.total_rows,
            path = %report.output_path.display(),
            "Wrote article table"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
