use thiserror::Error;

use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}
