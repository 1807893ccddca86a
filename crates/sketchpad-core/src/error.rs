//! Error types for sketchpad-core

use thiserror::Error;

/// Result type alias using sketchpad-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sketchpad-core operations
///
/// Presence and reset bookkeeping never fail; only stroke validation and the
/// stroke log storage produce errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input (malformed stroke payload)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stroke log storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns true if the error was caused by the caller's input.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(Error::InvalidInput("not an object".into()).is_client_error());
        assert!(!Error::Storage("disk full".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!Error::from(io).is_client_error());
    }

    #[test]
    fn error_display_includes_detail() {
        let err = Error::InvalidInput("stroke payload must be a JSON object".into());
        assert!(err.to_string().contains("JSON object"));
    }
}
