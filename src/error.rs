//! Error types for activity-query.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for activity-query operations.
#[derive(Error, Debug)]
pub enum ActivityQueryError {
    /// Endpoint errors (host unreachable, unknown repository, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query errors (malformed SPARQL, evaluation failure, HTTP error status, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Result consumption errors (malformed result document, unexpected value kind, etc.)
    #[error("Result error: {0}")]
    Result(String),

    /// Configuration errors (invalid config file, bad endpoint URL, bad date bound, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (output sink failures, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActivityQueryError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a result error with the given message.
    pub fn result(msg: impl Into<String>) -> Self {
        Self::Result(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Result(_) => "Result Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for ActivityQueryError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(format!("Failed to write output: {e}"))
    }
}

/// Result type alias using ActivityQueryError.
pub type Result<T> = std::result::Result<T, ActivityQueryError>;
