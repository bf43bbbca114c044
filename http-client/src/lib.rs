//! Private HTTP client for Netia Player communication
//!
//! This crate provides a minimal blocking client for the JSON control API
//! exposed by Netia set-top boxes. Every request carries its own timeout;
//! callers decide how long a device call may take.

mod error;

pub use error::HttpError;

use serde::de::DeserializeOwned;
use std::io::{self, Read};
use std::time::Duration;

/// Connect timeout applied to every request made through the agent
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A minimal blocking HTTP client for device communication
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(CONNECT_TIMEOUT)
                .build(),
        }
    }

    /// Issue a GET request and decode the JSON body
    ///
    /// Any status other than 200 is reported as [`HttpError::Status`].
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, HttpError> {
        tracing::trace!("GET {}", url);

        let response = self
            .agent
            .get(url)
            .timeout(timeout)
            .call()
            .map_err(classify)?;

        if response.status() != 200 {
            return Err(HttpError::Status(response.status()));
        }

        let text = response
            .into_string()
            .map_err(|e| HttpError::Network(e.to_string()))?;

        parse_json(&text)
    }

    /// Issue a body-less POST and return the raw response bytes
    ///
    /// Netia command endpoints carry their parameters in the query string and
    /// answer with an opaque body, so nothing is decoded here.
    pub fn post(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, HttpError> {
        tracing::trace!("POST {}", url);

        let response = self
            .agent
            .post(url)
            .timeout(timeout)
            .call()
            .map_err(classify)?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| HttpError::Network(e.to_string()))?;

        Ok(body)
    }

    /// Issue a body-less POST and report the status code, whatever it is
    ///
    /// Used to probe whether a resource exists without downloading it.
    pub fn post_status(&self, url: &str, timeout: Duration) -> Result<u16, HttpError> {
        tracing::trace!("POST (probe) {}", url);

        match self.agent.post(url).timeout(timeout).call() {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(e) => Err(classify(e)),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a JSON document, mapping failures to [`HttpError::Parse`]
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, HttpError> {
    serde_json::from_str(text).map_err(|e| HttpError::Parse(e.to_string()))
}

fn classify(error: ureq::Error) -> HttpError {
    match error {
        ureq::Error::Status(code, _) => HttpError::Status(code),
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                HttpError::Timeout(transport.to_string())
            } else {
                HttpError::Network(transport.to_string())
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    if transport.kind() != ureq::ErrorKind::Io {
        return false;
    }
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return matches!(io_err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock);
        }
        source = err.source();
    }
    false
}
