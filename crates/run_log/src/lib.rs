//! # Run Log
//!
//! Appends a run's error entries to the day's log file.
//!
//! One file per calendar day, shared by every run on that day:
//! `<root>/logs/scripts/takeRtspSnapshots/<DD-MM-YYYY>.txt`

mod error;

pub use error::RunLogError;

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use contracts::OutputLayout;
use tracing::{debug, info, instrument};

/// Writes run error entries under the shared root.
#[derive(Debug, Clone)]
pub struct RunLogger {
    layout: OutputLayout,
}

impl RunLogger {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// Path the entries of `date` go to
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.layout.log_path(date)
    }

    /// Append `entries` to today's log.
    ///
    /// Returns the file written, or `None` when there was nothing to write.
    pub fn flush(&self, entries: &[String]) -> Result<Option<PathBuf>, RunLogError> {
        self.flush_for_date(entries, Local::now().date_naive())
    }

    /// Append `entries` to the log of `date`.
    #[instrument(name = "run_log_flush", skip(self, entries), fields(entries = entries.len()))]
    pub fn flush_for_date(
        &self,
        entries: &[String],
        date: NaiveDate,
    ) -> Result<Option<PathBuf>, RunLogError> {
        if entries.is_empty() {
            debug!("No run errors, log untouched");
            return Ok(None);
        }

        let dir = self.layout.log_dir();
        fs::create_dir_all(&dir).map_err(|source| RunLogError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.path_for(date);
        append_lines(&path, entries).map_err(|source| RunLogError::Append {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), entries = entries.len(), "Run errors written");
        Ok(Some(path))
    }
}

fn append_lines(path: &Path, entries: &[String]) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    for entry in entries {
        writeln!(out, "{}", entry.trim_end())?;
    }
    out.flush()
}
