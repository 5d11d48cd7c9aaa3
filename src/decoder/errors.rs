//! Format error types shared by the container decoder and the array file
//!
//! Error codes:
//! - SATCOV_FORMAT_TRUNCATED
//! - SATCOV_FORMAT_RAGGED
//! - SATCOV_FORMAT_VALUE_OUT_OF_RANGE
//! - SATCOV_FORMAT_UNSUPPORTED_TYPE
//! - SATCOV_FORMAT_SHAPE_MISMATCH
//! - SATCOV_FORMAT_BAD_MAGIC
//! - SATCOV_FORMAT_UNSUPPORTED_VERSION
//! - SATCOV_DATA_CORRUPTION (FATAL severity)
//! - SATCOV_INPUT_IO_ERROR (reading the container failed)
//!
//! All format errors abort the whole operation. No partial tensor is
//! ever handed back alongside one.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::observability::Severity;

/// Index path into the nested container, e.g. `[1]` or `[0, 2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPath(pub Vec<usize>);

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", idx)?;
        }
        write!(f, "]")
    }
}

/// Malformed input, either in the nested container or in an array file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Input ended before an expected length record or value block
    #[error("truncated input at byte_offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Sibling sequences at the same depth have different lengths
    #[error("ragged structure at index {path}: expected length {expected}, found {found}")]
    Ragged {
        path: IndexPath,
        expected: u64,
        found: u64,
    },

    /// A stored flag value does not fit in a signed byte
    #[error("value {value} at byte_offset {offset} does not fit in i8")]
    ValueOutOfRange { offset: u64, value: i64 },

    /// Unknown element type tag in an array file
    #[error("unsupported element type tag {0}")]
    UnsupportedType(u8),

    /// Shape and payload disagree
    #[error("shape mismatch for shape {shape:?}: {reason}")]
    ShapeMismatch { shape: Vec<u64>, reason: String },

    /// The file does not start with the array file magic
    #[error("bad magic {found:02x?}, not an array file")]
    BadMagic { found: [u8; 4] },

    /// Array file written by an unknown format version
    #[error("unsupported array file version {0}")]
    UnsupportedVersion(u8),

    /// Stored checksum does not match the file contents
    #[error("checksum mismatch: computed {computed:08x}, stored {stored:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

impl FormatError {
    /// Create a truncation error at the given byte offset
    pub fn truncated(offset: usize, needed: u64, available: usize) -> Self {
        FormatError::Truncated {
            offset: offset as u64,
            needed,
            available: available as u64,
        }
    }

    /// Create a ragged-structure error for the given index path
    pub fn ragged(path: Vec<usize>, expected: u64, found: u64) -> Self {
        FormatError::Ragged {
            path: IndexPath(path),
            expected,
            found,
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(shape: &[u64], reason: impl Into<String>) -> Self {
        FormatError::ShapeMismatch {
            shape: shape.to_vec(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::Truncated { .. } => "SATCOV_FORMAT_TRUNCATED",
            FormatError::Ragged { .. } => "SATCOV_FORMAT_RAGGED",
            FormatError::ValueOutOfRange { .. } => "SATCOV_FORMAT_VALUE_OUT_OF_RANGE",
            FormatError::UnsupportedType(_) => "SATCOV_FORMAT_UNSUPPORTED_TYPE",
            FormatError::ShapeMismatch { .. } => "SATCOV_FORMAT_SHAPE_MISMATCH",
            FormatError::BadMagic { .. } => "SATCOV_FORMAT_BAD_MAGIC",
            FormatError::UnsupportedVersion(_) => "SATCOV_FORMAT_UNSUPPORTED_VERSION",
            FormatError::ChecksumMismatch { .. } => "SATCOV_DATA_CORRUPTION",
        }
    }

    /// Returns whether the error indicates damaged rather than foreign data
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FormatError::Truncated { .. } | FormatError::ChecksumMismatch { .. }
        )
    }

    /// Returns the severity level for this error
    ///
    /// A checksum failure means bytes on disk changed after a successful
    /// save; everything else is a malformed input.
    pub fn severity(&self) -> Severity {
        match self {
            FormatError::ChecksumMismatch { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Failure while reading a container from a file or stream.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The bytes could not be read
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// The bytes were read but are not a valid container
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl ReadError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        ReadError::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ReadError::Io { .. } => "SATCOV_INPUT_IO_ERROR",
            ReadError::Format(e) => e.code(),
        }
    }
}

/// Result type for reading containers
pub type ReadResult<T> = Result<T, ReadError>;
