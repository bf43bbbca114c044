//! Error types for the HTTP client

use thiserror::Error;

/// Errors that can occur while talking to a device over HTTP
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection refused, host unreachable, DNS failure and friends
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The device answered with an unexpected HTTP status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The response body could not be decoded
    #[error("Response parsing error: {0}")]
    Parse(String),
}
