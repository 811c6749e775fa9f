//! Error types for nexus-rm

use thiserror::Error;

/// Result type for repository operations
pub type NexusResult<T> = std::result::Result<T, NexusError>;

/// Errors that can occur while talking to the repository
#[derive(Error, Debug)]
pub enum NexusError {
    /// Base URL could not be parsed
    #[error("Invalid Nexus URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection or protocol failure
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("Nexus returned HTTP {status} for {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Server handed back a continuation token it had already issued
    #[error("Listing {url} repeated continuation token '{token}'")]
    RepeatedToken { url: String, token: String },

    /// Component does not exist (already deleted or never stored)
    #[error("Component not found: {0}")]
    NotFound(String),
}

impl NexusError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NexusError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_decode() {
            NexusError::Decode {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            NexusError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
