//! Dense coverage tensor
//!
//! A rank-3 array of `i8` flags with shape
//! `(num_satellites, num_timesteps, num_flags)`, stored as a single
//! contiguous row-major buffer.
//!
//! The tensor is immutable once built. Shape-changing transforms
//! (`remove_index`, `trim_last_of_axis`) return a new tensor.

use super::errors::{ValueError, ValueResult};

/// Number of axes of a coverage tensor
pub const RANK: usize = 3;

/// Satellite axis
pub const AXIS_SATELLITE: usize = 0;
/// Time-step axis. The simulator appends its always-feasible reference entry here.
pub const AXIS_TIMESTEP: usize = 1;
/// Coverage flag axis
pub const AXIS_FLAG: usize = 2;

/// Shape of a coverage tensor
pub type Shape = [usize; RANK];

/// Returns the number of elements a shape describes, or `None` on overflow.
pub fn element_count(shape: &Shape) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Dense rank-3 tensor of coverage flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageTensor {
    shape: Shape,
    data: Vec<i8>,
}

impl CoverageTensor {
    /// Builds a tensor from a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ShapeMismatch` if `data.len()` is not the
    /// product of `shape`.
    pub fn from_vec(shape: Shape, data: Vec<i8>) -> ValueResult<Self> {
        let expected = element_count(&shape).ok_or(ValueError::ShapeOverflow { shape })?;
        if data.len() != expected {
            return Err(ValueError::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Builds a zero-filled tensor.
    pub fn zeros(shape: Shape) -> ValueResult<Self> {
        let len = element_count(&shape).ok_or(ValueError::ShapeOverflow { shape })?;
        Ok(Self {
            shape,
            data: vec![0; len],
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn num_satellites(&self) -> usize {
        self.shape[AXIS_SATELLITE]
    }

    pub fn num_timesteps(&self) -> usize {
        self.shape[AXIS_TIMESTEP]
    }

    pub fn num_flags(&self) -> usize {
        self.shape[AXIS_FLAG]
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major element buffer
    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }

    fn offset(&self, satellite: usize, timestep: usize, flag: usize) -> Option<usize> {
        if satellite >= self.shape[0] || timestep >= self.shape[1] || flag >= self.shape[2] {
            return None;
        }
        Some((satellite * self.shape[1] + timestep) * self.shape[2] + flag)
    }

    /// Returns the element at `(satellite, timestep, flag)`.
    pub fn get(&self, satellite: usize, timestep: usize, flag: usize) -> Option<i8> {
        self.offset(satellite, timestep, flag).map(|i| self.data[i])
    }

    /// Returns the `(num_timesteps * num_flags)` block of one satellite.
    pub fn satellite(&self, satellite: usize) -> Option<&[i8]> {
        if satellite >= self.shape[0] {
            return None;
        }
        let stride = self.shape[1] * self.shape[2];
        let start = satellite * stride;
        Some(&self.data[start..start + stride])
    }

    /// Returns the flag row at `(satellite, timestep)`.
    pub fn row(&self, satellite: usize, timestep: usize) -> Option<&[i8]> {
        if satellite >= self.shape[0] || timestep >= self.shape[1] {
            return None;
        }
        let start = (satellite * self.shape[1] + timestep) * self.shape[2];
        Some(&self.data[start..start + self.shape[2]])
    }

    /// Number of non-zero flags in the whole tensor
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Number of non-zero flags per satellite
    pub fn coverage_count_per_satellite(&self) -> Vec<usize> {
        (0..self.shape[0])
            .map(|s| {
                self.satellite(s)
                    .map(|block| block.iter().filter(|&&v| v != 0).count())
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Returns a new tensor with `position` removed from `axis`.
    ///
    /// # Errors
    ///
    /// - `AxisOutOfRange` if `axis >= RANK`
    /// - `EmptyAxis` if the axis has length 0
    /// - `IndexOutOfRange` if `position` is past the end of the axis
    pub fn remove_index(&self, axis: usize, position: usize) -> ValueResult<Self> {
        if axis >= RANK {
            return Err(ValueError::AxisOutOfRange { axis, rank: RANK });
        }
        let len = self.shape[axis];
        if len == 0 {
            return Err(ValueError::EmptyAxis { axis });
        }
        if position >= len {
            return Err(ValueError::IndexOutOfRange {
                axis,
                position,
                len,
            });
        }

        // Row-major view as (outer, len, inner) around the chosen axis.
        let outer: usize = self.shape[..axis].iter().product();
        let inner: usize = self.shape[axis + 1..].iter().product();
        let block = len * inner;

        let mut shape = self.shape;
        shape[axis] = len - 1;

        let mut data = Vec::with_capacity(outer * (len - 1) * inner);
        for o in 0..outer {
            let base = o * block;
            data.extend_from_slice(&self.data[base..base + position * inner]);
            data.extend_from_slice(&self.data[base + (position + 1) * inner..base + block]);
        }

        Ok(Self { shape, data })
    }

    /// Returns a new tensor with the last index of `axis` dropped.
    ///
    /// # Errors
    ///
    /// `EmptyAxis` if the axis has length 0, `AxisOutOfRange` if
    /// `axis >= RANK`.
    pub fn trim_last_of_axis(&self, axis: usize) -> ValueResult<Self> {
        if axis >= RANK {
            return Err(ValueError::AxisOutOfRange { axis, rank: RANK });
        }
        match self.shape[axis] {
            0 => Err(ValueError::EmptyAxis { axis }),
            len => self.remove_index(axis, len - 1),
        }
    }
}
