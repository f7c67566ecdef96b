//! Error types for the Engram client SDK
//!
//! This module provides structured error handling using thiserror. Every
//! public operation in the SDK resolves to `Result<T, EngramError>`.

use thiserror::Error;
use tonic::Code;

/// Main error type for Engram client operations
#[derive(Error, Debug)]
pub enum EngramError {
    /// Transport-level connect or health-check failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Operation attempted before a successful connect
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Malformed identifier or missing required field
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Tool dispatch received an unrecognized tool name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Peer returned a non-success application response
    #[error("Remote error: {0}")]
    Remote(String),

    /// Deadline exceeded waiting for the peer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// gRPC channel error
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Result type alias for Engram client operations
pub type Result<T> = std::result::Result<T, EngramError>;

/// Convert gRPC statuses into the SDK taxonomy.
///
/// Deadline-exceeded stays distinct from connection failures so callers
/// can tell retryable timeouts from fatal transport errors.
impl From<tonic::Status> for EngramError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            Code::DeadlineExceeded | Code::Cancelled => {
                EngramError::Timeout(status.message().to_string())
            }
            Code::Unavailable => EngramError::Connection(status.message().to_string()),
            Code::InvalidArgument => EngramError::InvalidArgument(status.message().to_string()),
            code => EngramError::Remote(format!("{:?}: {}", code, status.message())),
        }
    }
}

impl From<reqwest::Error> for EngramError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngramError::Timeout(err.to_string())
        } else if err.is_connect() {
            EngramError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            EngramError::Remote(format!("HTTP {}: {}", status, err))
        } else {
            EngramError::Http(err)
        }
    }
}
