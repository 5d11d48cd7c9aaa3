//! Conversion pipeline errors
//!
//! Wraps every failure the pipeline can hit so the driver can report a
//! single stable code per run.

use std::io;

use thiserror::Error;

use super::verify::Mismatch;
use crate::decoder::{FormatError, ReadError};
use crate::observability::Severity;
use crate::persistence::PersistenceError;
use crate::tensor::ValueError;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading the input container failed
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// The input container is malformed
    #[error("decode failed: {0}")]
    Format(#[from] FormatError),

    /// The trim transform was rejected
    #[error("trim failed: {0}")]
    Value(#[from] ValueError),

    /// Saving or loading the array file failed
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    /// Reloaded tensor differs from the expected one
    #[error("verification failed: {0}")]
    VerifyMismatch(Mismatch),
}

impl ConvertError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        ConvertError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::Config(message.into())
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::Config(_) => "SATCOV_CONFIG_ERROR",
            ConvertError::Io { .. } => "SATCOV_INPUT_IO_ERROR",
            ConvertError::Format(e) => e.code(),
            ConvertError::Value(e) => e.code(),
            ConvertError::Persistence(e) => e.code(),
            ConvertError::VerifyMismatch(_) => "SATCOV_VERIFY_MISMATCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ConvertError::Format(e) => e.severity(),
            ConvertError::Persistence(e) => e.severity(),
            ConvertError::VerifyMismatch(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl From<ReadError> for ConvertError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Io { message, source } => ConvertError::io(message, source),
            ReadError::Format(f) => ConvertError::Format(f),
        }
    }
}

/// Result type for pipeline operations
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err = ConvertError::from(FormatError::ragged(vec![1], 3, 2));
        assert_eq!(err.code(), "SATCOV_FORMAT_RAGGED");

        let err = ConvertError::from(ValueError::EmptyAxis { axis: 1 });
        assert_eq!(err.code(), "SATCOV_TENSOR_EMPTY_AXIS");

        let err = ConvertError::config("bad");
        assert_eq!(err.code(), "SATCOV_CONFIG_ERROR");
    }

    #[test]
    fn test_corruption_is_fatal() {
        let err = ConvertError::from(PersistenceError::from(FormatError::ChecksumMismatch {
            stored: 1,
            computed: 2,
        }));
        assert_eq!(err.severity(), Severity::Fatal);

        let err = ConvertError::from(FormatError::truncated(0, 8, 3));
        assert_eq!(err.severity(), Severity::Error);
    }
}
