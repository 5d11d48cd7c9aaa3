//! Tensor transform error types
//!
//! Error codes:
//! - SATCOV_TENSOR_EMPTY_AXIS
//! - SATCOV_TENSOR_AXIS_OUT_OF_RANGE
//! - SATCOV_TENSOR_INDEX_OUT_OF_RANGE
//! - SATCOV_TENSOR_SHAPE_MISMATCH

use thiserror::Error;

use super::coverage::Shape;

/// Errors raised by shape-changing operations on a [`CoverageTensor`].
///
/// [`CoverageTensor`]: super::CoverageTensor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The axis has length 0, so no index can be removed from it
    #[error("axis {axis} is empty, nothing to trim")]
    EmptyAxis { axis: usize },

    /// The axis does not exist for a rank-3 tensor
    #[error("axis {axis} out of range for tensor of rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    /// The position is past the end of the axis
    #[error("index {position} out of range for axis {axis} of length {len}")]
    IndexOutOfRange {
        axis: usize,
        position: usize,
        len: usize,
    },

    /// Buffer length disagrees with the product of the shape
    #[error("shape {shape:?} needs {expected} elements, buffer holds {actual}")]
    ShapeMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// The product of the shape does not fit in `usize`
    #[error("shape {shape:?} overflows the addressable element count")]
    ShapeOverflow { shape: Shape },
}

impl ValueError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ValueError::EmptyAxis { .. } => "SATCOV_TENSOR_EMPTY_AXIS",
            ValueError::AxisOutOfRange { .. } => "SATCOV_TENSOR_AXIS_OUT_OF_RANGE",
            ValueError::IndexOutOfRange { .. } => "SATCOV_TENSOR_INDEX_OUT_OF_RANGE",
            ValueError::ShapeMismatch { .. } | ValueError::ShapeOverflow { .. } => {
                "SATCOV_TENSOR_SHAPE_MISMATCH"
            }
        }
    }
}

/// Result type for tensor operations
pub type ValueResult<T> = Result<T, ValueError>;
