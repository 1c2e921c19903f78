//! Error types for note store operations.

use thiserror::Error;
use validator::ValidationErrors;

use crate::note::describe_validation_errors;

/// Result type alias for note store operations.
pub type Result<T> = std::result::Result<T, NoteStoreError>;

/// Errors surfaced by a [`NoteStore`](crate::store::NoteStore).
#[derive(Debug, Error)]
pub enum NoteStoreError {
    /// The submitted note is missing fields or carries malformed values.
    #[error("Validation failed: {}", describe_validation_errors(.0))]
    Validation(#[from] ValidationErrors),

    /// The backing collection could not be read or appended to.
    #[error("Storage error: {reason}")]
    Storage { reason: String }
}

impl NoteStoreError {
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into()
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
