//! Error types for narc-core

use nexus_rm::NexusError;
use thiserror::Error;

/// A version string that cannot be placed in the Maven ordering
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Empty or whitespace-only version
    #[error("Version string is empty")]
    Empty,

    /// Whitespace or control character inside the version
    #[error("Invalid character {ch:?} in version '{version}'")]
    InvalidCharacter { version: String, ch: char },
}

/// Errors that abort a retention run or reject its configuration
#[derive(Error, Debug)]
pub enum RetentionError {
    /// Retention count outside `-1..`
    #[error("Invalid retention count {0}: expected -1 (keep all) or a non-negative number")]
    InvalidKeep(i64),

    /// Retention count that is not an integer at all
    #[error("Invalid retention count '{0}': not an integer")]
    UnparsableKeep(String),

    /// Initial component listing failed; no decision can be made
    #[error("Failed to list components of repository '{repository}': {source}")]
    Listing {
        repository: String,
        #[source]
        source: NexusError,
    },

    /// Audit report could not be written
    #[error("Failed to write audit report: {0}")]
    Report(#[from] std::io::Error),

    /// Audit report could not be serialized
    #[error("Failed to serialize audit report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RetentionError>;
