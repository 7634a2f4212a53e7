//! Staging store error types.
//!
//! This module defines the errors that can occur while talking to the
//! document database holding the staging collection.

use thiserror::Error;

/// Errors that can occur during staging store operations.
#[derive(Debug, Clone, Error)]
pub enum StagingError {
    /// Failed to reach the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The database rejected the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A document with the same `_id` already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The database answered with an error object for a command.
    #[error("Command {command} failed: {message}")]
    CommandError {
        command: String,
        code: Option<String>,
        message: String,
    },

    /// Unexpected HTTP status.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StagingError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a command error.
    pub fn command(command: &str, code: Option<String>, message: impl Into<String>) -> Self {
        Self::CommandError {
            command: command.to_string(),
            code,
            message: message.into(),
        }
    }

    /// Whether this error means the credentials or endpoint are unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::Unauthorized(_))
    }
}
