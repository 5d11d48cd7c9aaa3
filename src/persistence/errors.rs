//! Persistence error types
//!
//! Error codes:
//! - SATCOV_PERSIST_IO_ERROR: open/read/write/fsync/rename failed
//! - any `FormatError` code: the file exists but is not a valid array file

use std::io;

use thiserror::Error;

use crate::decoder::FormatError;
use crate::observability::Severity;

/// Failure while saving or loading an array file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// File contents are not a valid array file
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl PersistenceError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        PersistenceError::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            PersistenceError::Io { .. } => "SATCOV_PERSIST_IO_ERROR",
            PersistenceError::Format(e) => e.code(),
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            PersistenceError::Io { .. } => Severity::Error,
            PersistenceError::Format(e) => e.severity(),
        }
    }

    /// Returns the format error, if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            PersistenceError::Format(e) => Some(e),
            PersistenceError::Io { .. } => None,
        }
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
