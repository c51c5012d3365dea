//! The fetch → locate → extract → normalize → write pipeline.
//!
//! One run walks the configured sources strictly in order, one request at a
//! time, and only touches the output file after every source has been read.
//! A failed fetch therefore leaves the previous run's CSV untouched.

use crate::config::AppConfig;
use crate::errors::Error;
use crate::models::{DESCRIPTION_NOT_FOUND, ExtractedRow, Source, TITLE_NOT_FOUND};
use crate::outputs::csv::write_rows;
use crate::scrapers::extract::{SourceSelectors, extract, locate};
use crate::scrapers::fetch::HttpFetcher;
use crate::utils::{normalize_text, truncate_for_log};
use scraper::Html;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// `(source name, row count)` in processing order.
    pub per_source: Vec<(String, usize)>,
    pub total_rows: usize,
    pub output_path: PathBuf,
}

/// Turn one fetched homepage into rows, one per located article node.
///
/// Absent fields become their sentinel verbatim; found fields are normalized.
pub fn rows_from_markup(
    source: &Source,
    selectors: &SourceSelectors,
    markup: &str,
) -> Vec<ExtractedRow> {
    let document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        debug!(source = %source.name, parse_errors = document.errors.len(), "Markup had recoverable parse errors");
    }

    locate(&document, &selectors.container)
        .iter()
        .map(|node| {
            let title = extract(node, &selectors.title);
            let description = extract(node, &selectors.description);
            debug!(
                source = %source.name,
                title = ?title,
                node = %truncate_for_log(&node.html(), 200),
                "Extracted article"
            );
            ExtractedRow {
                source: source.name.clone(),
                title: title.resolve(normalize_text, TITLE_NOT_FOUND),
                description: description.resolve(normalize_text, DESCRIPTION_NOT_FOUND),
            }
        })
        .collect()
}

/// Fetch and extract every configured source, in order.
#[instrument(level = "info", skip_all)]
pub async fn aggregate(
    config: &AppConfig,
    fetcher: &HttpFetcher,
) -> Result<(Vec<ExtractedRow>, Vec<(String, usize)>), Error> {
    let mut rows = Vec::new();
    let mut per_source = Vec::with_capacity(config.sources.len());

    for source in &config.sources {
        let selectors = SourceSelectors::compile(source)?;
        let markup = fetcher.fetch(&source.url).await?;
        let source_rows = rows_from_markup(source, &selectors, &markup);

        if source_rows.is_empty() {
            warn!(source = %source.name, url = %source.url, "No article containers matched");
        } else {
            info!(source = %source.name, count = source_rows.len(), "Extracted articles");
        }
        per_source.push((source.name.clone(), source_rows.len()));
        rows.extend(source_rows);
    }

    Ok((rows, per_source))
}

/// Run the whole job once: aggregate every source, then overwrite the CSV.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub async fn run(config: &AppConfig) -> Result<RunReport, Error> {
    let fetcher = HttpFetcher::new(config.request_timeout)?;
    let (rows, per_source) = aggregate(config, &fetcher).await?;
    write_rows(&rows, &config.output_path).await?;

    info!(total = rows.len(), "Run complete");
    Ok(RunReport {
        per_source,
        total_rows: rows.len(),
        output_path: config.output_path.clone(),
    })
}
