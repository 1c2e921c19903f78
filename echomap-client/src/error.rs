//! Error types for the note mirror and its transport.

use thiserror::Error;

/// Result type alias for note synchronization.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure talking to the note server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No response within the allotted time.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 }
}

/// Errors returned by [`NoteSync`](crate::sync::NoteSync) operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The note was rejected locally and never sent.
    #[error("Invalid note: {0}")]
    Invalid(String),

    /// `submit` was called without a selected position.
    #[error("No note position selected")]
    NoPendingPosition,

    /// A create request for the pending position is still outstanding.
    #[error("A note submission is already in flight")]
    SubmissionInFlight
}

impl SyncError {
    /// Whether retrying the same operation can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => *status >= 500,
            Self::Transport(_) => true,
            Self::Invalid(_) | Self::NoPendingPosition | Self::SubmissionInFlight => false
        }
    }
}
