//! Indexing service error types.

use thiserror::Error;

/// Errors that can occur when calling the indexing service.
#[derive(Debug, Clone, Error)]
pub enum IndexApiError {
    /// Failed to reach the indexing service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The API token was rejected.
    #[error("Unauthorized (status {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The resource being created already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The request was rejected as invalid.
    #[error("Invalid request (status {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    /// The service failed to handle the request.
    #[error("Server error (status {status}): {body}")]
    ServerError { status: u16, body: String },

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IndexApiError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Classify a non-success response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status, body },
            409 => Self::AlreadyExists(body),
            400..=499 if body.to_lowercase().contains("already exist") => Self::AlreadyExists(body),
            400..=499 => Self::InvalidRequest { status, body },
            _ => Self::ServerError { status, body },
        }
    }

    /// Whether the error says the target already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// Whether the service rejected the request itself, as opposed to
    /// failing to process it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::InvalidRequest { .. } | Self::SerializationError(_)
        )
    }
}
