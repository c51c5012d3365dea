//! CSV sink for the result table.
//!
//! # Format
//!
//! ```text
//! Source,Title,Description
//! Dawn.com,budget passed,the assembly voted late on monday
//! BBC.com,Title not found,"quoted, because of the comma"
//! ```
//!
//! The header is always written, even for an empty table. The file is fully
//! overwritten on every run; the write is not atomic.

use crate::errors::Error;
use crate::models::ExtractedRow;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Column names, in output order.
pub const HEADER: [&str; 3] = ["Source", "Title", "Description"];

/// Serialize `rows` to CSV bytes.
pub fn to_csv_bytes(rows: &[ExtractedRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))
}

/// Write `rows` to `path`, replacing whatever was there.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub async fn write_rows(rows: &[ExtractedRow], path: &Path) -> Result<(), Error> {
    let bytes = to_csv_bytes(rows)?;

    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await.map_err(|source| Error::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, &bytes).await.map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(bytes = bytes.len(), "Wrote CSV");
    Ok(())
}
