use http_client::HttpError;
use thiserror::Error;

/// High-level API errors for Netia Player operations
///
/// Every failure the device client can run into falls into one of these
/// buckets. The absent-returning query methods on [`crate::NetiaClient`]
/// handle all of them the same way (log and fall back), but the typed
/// `fetch_*` methods surface them for callers that want to know why.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, host unreachable, DNS failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The device did not answer within the request timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-200 status or a body that does not match the expected JSON shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Well-formed response that carries no usable data
    ///
    /// Covers payloads with an explicit error flag, empty EPG ranges and
    /// missing logos.
    #[error("No data: {0}")]
    DataAbsent(String),

    /// A caller supplied a value the device API does not accept
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Whether the device could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convert from HttpError to ApiError
impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Network(msg) => ApiError::Transport(msg),
            HttpError::Timeout(msg) => ApiError::Timeout(msg),
            HttpError::Status(code) => ApiError::Protocol(format!("HTTP status {}", code)),
            HttpError::Parse(msg) => ApiError::Protocol(msg),
        }
    }
}
