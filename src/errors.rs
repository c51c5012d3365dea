//! Error taxonomy for a pipeline run.
//!
//! Missing article fields are deliberately absent from this enum: they degrade
//! to sentinel text in the aggregator and never fail a run.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a run.
#[derive(Error, Debug)]
pub enum Error {
    /// Homepage fetch failed: no response, timeout, or a non-2xx status.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// A configured selector could not be compiled.
    #[error("selector parse error: {0}")]
    Parse(String),

    /// The output file could not be created or written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true when re-running the whole job could succeed.
    ///
    /// Selector and configuration errors are deterministic, so retrying them
    /// only burns the retry budget.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } | Error::Write { .. } | Error::Csv(_) => true,
            Error::Parse(_) | Error::Config(_) => false,
        }
    }

    /// Short machine-readable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Network { .. } => "NetworkError",
            Error::Parse(_) => "ParseError",
            Error::Write { .. } | Error::Csv(_) => "WriteError",
            Error::Config(_) => "ConfigError",
        }
    }
}
