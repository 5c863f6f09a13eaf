//! Test Report Merge Library
//!
//! This library combines independently produced partial test-run reports
//! (for example the shards of a parallel CI run) into one canonical report:
//! suite trees are reconciled by path, per-browser attempt histories are
//! interleaved and renumbered, statuses are re-derived bottom-up, counters are
//! kept in step, and screenshot artifacts are moved to match the new attempt
//! numbers.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{
    BrowserEntry, ErrorItem, ImageInfo, ImageRef, ReportData, SkipInfo, StatCounters, Status,
    SuiteNode, TestResult,
};
pub use services::engine::MergeEngine;

use std::path::{Path, PathBuf};
use std::result;

/// Default name of the data file inside a report directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidInput(String),
    MalformedTree(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "Invalid report data: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::MalformedTree(msg) => write!(f, "Malformed suite tree: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::InvalidInput(_) | Error::MalformedTree(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Options for merging report directories
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub destination: PathBuf,
    pub data_file: String,
}

impl MergeOptions {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            destination: destination.into(),
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

/// Result of a merge: the aggregate plus what happened to its artifacts
#[derive(Debug)]
pub struct MergeSummary {
    pub data: ReportData,
    pub moved_artifacts: usize,
    pub errors: Vec<ErrorItem>,
}

/// Merge report directories into `opts.destination`
///
/// # Arguments
/// * `sources` - Source report directories, merged in the given order
/// * `opts` - Merge options
///
/// # Returns
/// A `MergeSummary` with the merged data (also written to the destination's
/// data file) and any artifacts that could not be moved
pub fn merge_reports<P: AsRef<Path>>(sources: &[P], opts: &MergeOptions) -> Result<MergeSummary> {
    let Some((first, rest)) = sources.split_first() else {
        return Err(Error::InvalidInput(
            "Nothing to merge, no source reports are passed".to_string(),
        ));
    };

    let destination = opts.destination.as_path();
    if sources.iter().any(|src| same_path(src.as_ref(), destination)) {
        return Err(Error::InvalidInput(format!(
            "Destination report path: {}, exists in source report paths",
            destination.display()
        )));
    }

    for src in sources {
        if !src.as_ref().is_dir() {
            return Err(Error::InvalidInput(format!(
                "Source report path is not a directory: {}",
                src.as_ref().display()
            )));
        }
    }

    let initial = io::report::load_report_data(first.as_ref(), &opts.data_file)?;
    let mut collection = Vec::with_capacity(rest.len());
    for src in rest {
        let data = io::report::load_report_data(src.as_ref(), &opts.data_file)?;
        services::tree::validate_nodes(&data.suites)?;
        collection.push((src.as_ref().to_path_buf(), data));
    }
    let engine = MergeEngine::create(initial, destination)?;

    let moved = io::report::move_report_content(first.as_ref(), destination, &opts.data_file)?;
    log::info!(
        "Moved {moved} entries from {} to {}",
        first.as_ref().display(),
        destination.display()
    );

    let summary = engine.merge_with(collection)?;

    io::report::save_report_data(destination, &opts.data_file, &summary.data)?;
    Ok(summary)
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
