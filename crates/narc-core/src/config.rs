//! Run configuration.
//!
//! Everything a run needs is collected once at startup into immutable
//! values and handed to the engine by reference.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RetentionError;

/// How many versions of each artifact survive a run.
///
/// The command line accepts `-1` for "keep everything"; it is converted
/// here and never reaches the partitioning arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "count")]
pub enum KeepPolicy {
    /// Delete nothing
    KeepAll,
    /// Keep the N newest versions, delete the rest
    KeepLatest(usize),
}

impl KeepPolicy {
    /// Sentinel used on the command line for [`KeepPolicy::KeepAll`]
    pub const KEEP_ALL_SENTINEL: i64 = -1;

    /// Number of items to delete from a group of `count` items, oldest first.
    pub fn delete_count(&self, count: usize) -> usize {
        match self {
            KeepPolicy::KeepAll => 0,
            KeepPolicy::KeepLatest(keep) => count.saturating_sub(*keep),
        }
    }
}

impl TryFrom<i64> for KeepPolicy {
    type Error = RetentionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            Self::KEEP_ALL_SENTINEL => Ok(KeepPolicy::KeepAll),
            n if n >= 0 => usize::try_from(n)
                .map(KeepPolicy::KeepLatest)
                .map_err(|_| RetentionError::InvalidKeep(n)),
            n => Err(RetentionError::InvalidKeep(n)),
        }
    }
}

impl FromStr for KeepPolicy {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| RetentionError::UnparsableKeep(s.to_string()))?;
        KeepPolicy::try_from(value)
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepPolicy::KeepAll => write!(f, "all"),
            KeepPolicy::KeepLatest(n) => write!(f, "{n}"),
        }
    }
}

/// Parameters of one retention run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Repository whose components are cleaned
    pub repository: String,
    /// Versions to keep per artifact
    pub keep: KeepPolicy,
    /// Report only, never delete
    pub dry_run: bool,
    /// Maximum in-flight deletions within one artifact; 1 is sequential
    pub delete_concurrency: usize,
    /// Where to write the JSON audit report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl RetentionConfig {
    pub fn new(repository: &str, keep: KeepPolicy) -> Self {
        RetentionConfig {
            repository: repository.to_string(),
            keep,
            dry_run: false,
            delete_concurrency: 1,
            report_path: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_delete_concurrency(mut self, concurrency: usize) -> Self {
        self.delete_concurrency = concurrency.max(1);
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }
}

/// Logging setup for the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Raise verbosity to debug
    pub debug: bool,
    /// Emit newline-delimited JSON instead of text
    pub json: bool,
    /// Append-only log file next to stdout output; `None` disables it
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            debug: false,
            json: false,
            log_file: Some(PathBuf::from("narc.log")),
        }
    }
}
