//! Centralized error types for the access-log middleware

use thiserror::Error;

/// Access-log middleware error types
#[derive(Debug, Error)]
pub enum AccessLogError {
    /// The response sink rejected or failed to accept body bytes
    #[error("response write failed: {0}")]
    Write(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Generic error from a wrapped handler
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, AccessLogError>;
