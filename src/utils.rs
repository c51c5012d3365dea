//! Utility functions for text normalization, log truncation, and file system checks.
//!
//! - [`normalize_text`]: the single text-cleaning rule applied to every extracted field
//! - [`truncate_for_log`]: keeps raw markup snippets short in debug output
//! - [`ensure_writable_parent`]: early check that the CSV can actually be written

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::errors::Error;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_\s]").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize extracted article text.
///
/// Applied in this order:
/// 1. Drop every character that is neither a letter, a number, an underscore
///    nor whitespace (combining marks and connector punctuation go too)
/// 2. Collapse every run of whitespace to a single space
/// 3. Lowercase
/// 4. Trim
///
/// Lowercasing can emit combining marks (`İ` becomes `i` + U+0307), so those
/// are stripped once more to keep the function idempotent. Never applied to
/// sentinel strings.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("Hello, World!!"), "hello world");
/// assert_eq!(normalize_text("a   b\n\tc"), "a b c");
/// ```
pub fn normalize_text(text: &str) -> String {
    let stripped = NON_WORD.replace_all(text, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    let lowered = collapsed.to_lowercase();
    NON_WORD.replace_all(&lowered, "").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure the directory that will hold `path` exists and is writable.
///
/// Creates the parent directory if needed, then writes and removes a probe
/// file next to the target.
///
/// # Errors
///
/// Returns [`Error::Write`] if the directory cannot be created or written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await.map_err(|source| Error::Write {
        path: dir.clone(),
        source,
    })?;

    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(dir = %dir.display(), "Output directory is writable");
            Ok(())
        }
        Err(source) => Err(Error::Write { path: dir, source }),
    }
}
