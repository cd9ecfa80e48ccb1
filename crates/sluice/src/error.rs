//! Error types for Sluice.
//!
//! All fallible operations return [`Result`], and errors fall into two tiers
//! that the orchestrator treats very differently:
//!
//! - **Processing errors** are expected domain failures: no ingestor matched
//!   the file, the content could not be decoded, the archive is corrupt. The
//!   orchestrator records them on the result as a `Failure` and returns
//!   normally.
//! - **Everything else** (I/O faults, lock poisoning, programming defects
//!   surfaced as `Other`) bubbles out of the ingest call unchanged; the
//!   affected result is left in the `Stopped` state.
//!
//! Use [`SluiceError::is_processing`] to tell the tiers apart.

use thiserror::Error;

/// Result type alias using `SluiceError`.
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Main error type for all Sluice operations.
#[derive(Debug, Error)]
pub enum SluiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An expected extraction failure: corrupt content, undecodable text,
    /// a malformed container. Recorded on the result, never propagated out
    /// of `Manager::ingest`.
    #[error("Processing error: {message}")]
    Processing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{0}")]
    Other(String),
}

impl SluiceError {
    /// Create a `Processing` error.
    pub fn processing<S: Into<String>>(message: S) -> Self {
        Self::Processing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Processing` error with a source.
    pub fn processing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Processing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an `Ocr` error.
    pub fn ocr<S: Into<String>>(message: S) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Validation` error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error belongs to the recognized processing tier.
    ///
    /// Processing-tier errors are absorbed by the orchestrator into a
    /// `Failure` status; all other errors force `Stopped` and propagate.
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            SluiceError::Processing { .. } | SluiceError::UnsupportedFormat(_) | SluiceError::Ocr { .. }
        )
    }
}

impl From<serde_json::Error> for SluiceError {
    fn from(err: serde_json::Error) -> Self {
        SluiceError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SluiceError = io_err.into();
        assert!(matches!(err, SluiceError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_processing_error() {
        let err = SluiceError::processing("cannot decode text");
        assert_eq!(err.to_string(), "Processing error: cannot decode text");
        assert!(err.is_processing());
    }

    #[test]
    fn test_processing_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = SluiceError::processing_with_source("cannot decode text", source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_processing());
    }

    #[test]
    fn test_unsupported_format_is_processing() {
        let err = SluiceError::UnsupportedFormat("application/x-unknown".to_string());
        assert_eq!(err.to_string(), "Format not supported: application/x-unknown");
        assert!(err.is_processing());
    }

    #[test]
    fn test_ocr_error_is_processing() {
        assert!(SluiceError::ocr("engine crashed").is_processing());
    }

    #[test]
    fn test_io_error_is_not_processing() {
        let err: SluiceError = std::io::Error::other("disk fell over").into();
        assert!(!err.is_processing());
    }

    #[test]
    fn test_validation_error_is_not_processing() {
        assert!(!SluiceError::validation("empty plugin name").is_processing());
    }

    #[test]
    fn test_lock_poisoned_is_not_processing() {
        let err = SluiceError::LockPoisoned("registry lock".to_string());
        assert!(!err.is_processing());
        assert_eq!(err.to_string(), "Lock poisoned: registry lock");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: SluiceError = json_err.into();
        assert!(matches!(err, SluiceError::Serialization { .. }));
    }
}
