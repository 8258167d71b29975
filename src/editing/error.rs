// Error types for the edit session

use super::service::ServiceError;
use thiserror::Error;

/// Result type for edit session operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors surfaced by the codec, the controller and configuration loading
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Edit failed: {0}")]
    EditFailed(#[from] ServiceError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("No pending edit to accept")]
    NothingPending,

    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EditorError::UnsupportedFormat(_) => Some(ErrorKind::UnsupportedFormat),
            EditorError::InvalidState(_) => Some(ErrorKind::InvalidState),
            EditorError::EditFailed(_) => Some(ErrorKind::EditFailed),
            _ => None,
        }
    }
}

/// Classification kept in the session's `last_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    InvalidState,
    EditFailed,
}

impl ErrorKind {
    /// Message shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "Please select an image file.",
            ErrorKind::InvalidState => "Upload an image and wait for any running edit to finish.",
            ErrorKind::EditFailed => "Failed to edit the image. Please try again.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::EditFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = EditorError::EditFailed(ServiceError::NoImage);
        assert_eq!(err.kind(), Some(ErrorKind::EditFailed));
        assert!(ErrorKind::EditFailed.is_retryable());
        assert_eq!(EditorError::NothingToUndo.kind(), None);
    }

    #[test]
    fn test_invalid_state_message_covers_busy_session() {
        let busy = EditorError::InvalidState("an edit is already in progress");
        let kind = busy.kind().unwrap();
        assert!(!kind.is_retryable());
        assert!(kind.message().contains("wait"));
        assert!(!kind.message().contains("first"));
    }
}
