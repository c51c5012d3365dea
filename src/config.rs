//! Immutable run configuration.
//!
//! [`AppConfig`] is assembled once in `main` from three layers, highest
//! precedence first: CLI flags, an optional YAML file, built-in defaults.
//! After that it is only ever borrowed.
//!
//! # YAML layout
//!
//! Every key is optional:
//!
//! ```yaml
//! output_path: ./articles.csv
//! request_timeout_secs: 30
//! sources:
//!   - name: Dawn.com
//!     url: https://www.dawn.com
//!     container: { element: article, class: story }
//!     title: { element: h2, class: story__title }
//!     description: { element: div, class: story__excerpt }
//! task:
//!   retries: 3
//!   retry_delay_secs: 300
//!   start_date: 2024-05-15
//!   email: [ops@example.com]
//!   email_on_failure: true
//!   email_on_retry: false
//! ```

use crate::cli::Cli;
use crate::errors::Error;
use crate::models::Source;
use crate::scrapers::extract::SourceSelectors;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_OUTPUT_PATH: &str = "articles.csv";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5 * 60;

/// Retry, notification and scheduling policy for the whole job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    /// Re-runs allowed after the first failed attempt.
    pub retries: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
    /// First day the daily loop may run.
    pub start_date: NaiveDate,
    /// Recipients for retry/failure notifications.
    pub email: Vec<String>,
    pub email_on_failure: bool,
    pub email_on_retry: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap_or_default(),
            email: Vec::new(),
            email_on_failure: false,
            email_on_retry: false,
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub output_path: PathBuf,
    pub request_timeout: Duration,
    /// Processed in this order; rows keep it.
    pub sources: Vec<Source>,
    pub task: TaskConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            sources: vec![Source::dawn(), Source::bbc()],
            task: TaskConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    output_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    sources: Option<Vec<Source>>,
    task: Option<FileTaskConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileTaskConfig {
    retries: Option<u32>,
    retry_delay_secs: Option<u64>,
    start_date: Option<NaiveDate>,
    email: Option<Vec<String>>,
    email_on_failure: Option<bool>,
    email_on_retry: Option<bool>,
}

impl AppConfig {
    /// Build the configuration for this process from CLI arguments.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub async fn load(cli: &Cli) -> Result<Self, Error> {
        let mut config = match &cli.config {
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        if let Some(output) = &cli.output {
            config.output_path = output.clone();
        }
        if let Some(retries) = cli.retries {
            config.task.retries = retries;
        }
        if let Some(secs) = cli.retry_delay_secs {
            config.task.retry_delay = Duration::from_secs(secs);
        }

        config.validate()?;
        info!(
            output = %config.output_path.display(),
            sources = config.sources.len(),
            retries = config.task.retries,
            retry_delay_secs = config.task.retry_delay.as_secs(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Layer a YAML document over the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let file: FileConfig = if text.trim().is_empty() {
            FileConfig::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?
        };

        let mut config = Self::default();
        if let Some(path) = file.output_path {
            config.output_path = path;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(sources) = file.sources {
            config.sources = sources;
        }
        if let Some(task) = file.task {
            let t = &mut config.task;
            if let Some(v) = task.retries {
                t.retries = v;
            }
            if let Some(v) = task.retry_delay_secs {
                t.retry_delay = Duration::from_secs(v);
            }
            if let Some(v) = task.start_date {
                t.start_date = v;
            }
            if let Some(v) = task.email {
                t.email = v;
            }
            if let Some(v) = task.email_on_failure {
                t.email_on_failure = v;
            }
            if let Some(v) = task.email_on_retry {
                t.email_on_retry = v;
            }
        }
        Ok(config)
    }

    /// Reject configurations that could never produce a correct run.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sources.is_empty() {
            return Err(Error::Config("at least one source is required".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request_timeout_secs must be positive".to_string()));
        }
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(Error::Config(format!("source with url {} has no name", source.url)));
            }
            let url = Url::parse(&source.url)
                .map_err(|e| Error::Config(format!("{}: invalid url {}: {e}", source.name, source.url)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "{}: url scheme '{}' is not http(s)",
                    source.name,
                    url.scheme()
                )));
            }
            SourceSelectors::compile(source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_are_dawn_then_bbc() {
        let config = AppConfig::default();
        let names: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Dawn.com", "BBC.com"]);
        assert_eq!(config.task.retries, 3);
        assert_eq!(config.task.retry_delay, Duration::from_secs(300));
        assert_eq!(config.task.start_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert!(!config.task.email_on_failure);
        assert!(config.task.email.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_defaults() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_yaml_overrides_only_given_keys() {
        let yaml = r#"
output_path: /tmp/out/articles.csv
task:
  retries: 1
  email: [ops@example.com]
  email_on_failure: true
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.output_path, PathBuf::from("/tmp/out/articles.csv"));
        assert_eq!(config.task.retries, 1);
        assert_eq!(config.task.retry_delay, Duration::from_secs(300));
        assert_eq!(config.task.email, vec!["ops@example.com".to_string()]);
        assert!(config.task.email_on_failure);
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_example_config_matches_builtin_defaults() {
        let config = AppConfig::from_yaml(include_str!("../headlines.example.yaml")).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.sources, defaults.sources);
        assert_eq!(config.task, defaults.task);
        assert_eq!(config.request_timeout, defaults.request_timeout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        let err = AppConfig::from_yaml("output: x.csv\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_sources() {
        let mut config = AppConfig::default();
        config.sources.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AppConfig::default();
        config.sources[0].url = "ftp://www.dawn.com".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AppConfig::default();
        config.sources[1].container.class = "[".to_string();
        assert!(matches!(config.validate(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_selector_list_smuggled_into_class() {
        let yaml = r#"
sources:
  - name: Dawn.com
    url: https://www.dawn.com
    container: { element: article, class: story }
    title: { element: h2, class: "story__title, p" }
    description: { element: div, class: story__excerpt }
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(matches!(config.validate(), Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_cli_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        std::fs::write(&file, "output_path: from_file.csv\ntask:\n  retries: 7\n").unwrap();

        let cli = Cli::parse_from([
            "daily_headlines",
            "--config",
            file.to_str().unwrap(),
            "--output",
            "from_cli.csv",
            "--retry-delay-secs",
            "1",
        ]);
        let config = AppConfig::load(&cli).await.unwrap();
        assert_eq!(config.output_path, PathBuf::from("from_cli.csv"));
        assert_eq!(config.task.retries, 7);
        assert_eq!(config.task.retry_delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_missing_config_file_is_config_error() {
        let cli = Cli::parse_from(["daily_headlines", "--config", "/definitely/not/here.yaml"]);
        assert!(matches!(AppConfig::load(&cli).await, Err(Error::Config(_))));
    }
}
