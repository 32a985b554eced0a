//! Error types for the terminal

use thiserror::Error;

/// Terminal-wide error type
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TerminalError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        TerminalError::MalformedInput(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        TerminalError::Api(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        TerminalError::Parse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        TerminalError::Internal(msg.into())
    }
}

/// Result type alias for terminal operations
pub type TerminalResult<T> = Result<T, TerminalError>;
