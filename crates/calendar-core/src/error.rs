// Error types for calendar operations

use thiserror::Error;

/// Result type alias for calendar operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors that can occur while reading or writing events
#[derive(Debug, Error)]
pub enum EventError {
    /// Bad or missing input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The referenced event does not exist. Holds the id as it was given,
    /// which may not be a well-formed UUID.
    #[error("Event not found: {0}")]
    NotFound(String),

    /// The persistence backend could not be reached or failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl EventError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EventError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(event_id: impl std::fmt::Display) -> Self {
        EventError::NotFound(event_id.to_string())
    }

    /// Create a storage error
    pub fn storage(msg: impl std::fmt::Display) -> Self {
        EventError::StorageUnavailable(msg.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EventError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EventError::NotFound(_))
    }
}
