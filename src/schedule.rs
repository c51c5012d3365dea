//! Whole-run retry, notification hooks, and the daily loop.
//!
//! # Retry Strategy
//!
//! - The job is re-run from scratch; no partial state survives an attempt
//! - At most `retries` re-runs after the first attempt
//! - Fixed `retry_delay` between attempts (no backoff, no jitter)
//! - Non-retryable errors (bad selectors, bad config) fail immediately
//!
//! # Daily Loop
//!
//! `--daily` keeps the process resident and fires once per UTC day at
//! midnight, never before `start_date`. Runs never overlap: the next midnight
//! is only computed after the current run (and its retries) finished.

use crate::config::{AppConfig, TaskConfig};
use crate::errors::Error;
use crate::pipeline::{self, RunReport};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Retry/failure notification hook.
///
/// There is no mail transport; a notification is a `tracing` event under the
/// `daily_headlines::notify` target carrying the recipient list, so whatever
/// ships logs can route it.
#[derive(Debug)]
pub struct Notifier<'a> {
    task: &'a TaskConfig,
}

impl<'a> Notifier<'a> {
    pub fn new(task: &'a TaskConfig) -> Self {
        Self { task }
    }

    /// Returns true if a notification was emitted.
    pub fn on_retry(&self, attempt: u32, err: &Error) -> bool {
        if !self.task.email_on_retry || self.task.email.is_empty() {
            return false;
        }
        warn!(
            target: "daily_headlines::notify",
            recipients = ?self.task.email,
            attempt,
            kind = err.kind(),
            error = %err,
            "Run failed; retrying"
        );
        true
    }

    /// Returns true if a notification was emitted.
    pub fn on_failure(&self, attempts: u32, err: &Error) -> bool {
        if !self.task.email_on_failure || self.task.email.is_empty() {
            return false;
        }
        error!(
            target: "daily_headlines::notify",
            recipients = ?self.task.email,
            attempts,
            kind = err.kind(),
            error = %err,
            "Run failed permanently"
        );
        true
    }
}

/// Call `job` until it succeeds, fails with a non-retryable error, or the
/// retry budget in `task` is spent.
#[instrument(level = "info", skip_all, fields(retries = task.retries))]
pub async fn run_with_retries<T, F, Fut>(task: &TaskConfig, mut job: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let notifier = Notifier::new(task);
    let max_attempts = task.retries.saturating_add(1);
    let mut attempt: u32 = 1;

    loop {
        match job().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "Run succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    kind = e.kind(),
                    error = %e,
                    delay_secs = task.retry_delay.as_secs(),
                    "Run failed; will retry"
                );
                notifier.on_retry(attempt, &e);
                sleep(task.retry_delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(attempt, kind = e.kind(), error = %e, "Run failed; giving up");
                notifier.on_failure(attempt, &e);
                return Err(e);
            }
        }
    }
}

/// Run the pipeline once with the configured retry policy.
pub async fn run_once(config: &AppConfig) -> Result<RunReport, Error> {
    run_with_retries(&config.task, || pipeline::run(config)).await
}

/// The first UTC midnight strictly after `now` that is not before `start_date`.
pub fn next_run_after(now: DateTime<Utc>, start_date: NaiveDate) -> DateTime<Utc> {
    let start = start_date.and_time(chrono::NaiveTime::MIN).and_utc();
    if start > now {
        return start;
    }
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or(now.date_naive());
    tomorrow.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Run the pipeline every day at midnight UTC until Ctrl-C.
///
/// A failed day is logged and does not stop the loop.
#[instrument(level = "info", skip_all)]
pub async fn run_daily(config: &AppConfig) -> Result<(), Error> {
    loop {
        let now = Utc::now();
        let next = next_run_after(now, config.task.start_date);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(next_run = %next.to_rfc3339(), wait_secs = wait.as_secs(), "Waiting for next scheduled run");

        tokio::select! {
            _ = sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C; stopping daily loop");
                return Ok(());
            }
        }

        match run_once(config).await {
            Ok(report) => info!(
                rows = report.total_rows,
                path = %report.output_path.display(),
                "Scheduled run complete"
            ),
            Err(e) => error!(kind = e.kind(), error = %e, "Scheduled run failed"),
        }
    }
}
