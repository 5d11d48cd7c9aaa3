//! Tensor persistence for satcov
//!
//! Saves and loads dense coverage tensors as self-describing array files
//! (element type, shape, row-major payload, CRC32), and applies the
//! axis-trim transform used to drop the simulator's reference entry.
//!
//! # Guarantees
//!
//! - Saves are atomic: a reader sees either the previous file or the new one
//! - Every load verifies magic, version, checksum, element type and shape
//! - No global state; I/O happens only at the given path

mod array_file;
mod checksum;
mod errors;
mod writer;

use std::fs;
use std::path::Path;

pub use array_file::{deserialize, serialize, ElementType, FORMAT_VERSION, MAGIC};
pub use checksum::compute_checksum;
pub use errors::{PersistenceError, PersistenceResult};
pub use writer::{temp_path_for, write_atomic};

use crate::tensor::{CoverageTensor, ValueResult};

/// Save/load/trim entry points for coverage tensors.
pub struct TensorPersistence;

impl TensorPersistence {
    /// Writes `tensor` to `path` as an array file.
    ///
    /// # Errors
    ///
    /// `PersistenceError::Io` if any step of the atomic write fails. The
    /// previous file at `path`, if any, is left untouched in that case.
    pub fn save(tensor: &CoverageTensor, path: &Path) -> PersistenceResult<()> {
        let bytes = serialize(tensor);
        write_atomic(path, &bytes)
    }

    /// Reads an array file back into a tensor.
    ///
    /// # Errors
    ///
    /// - `PersistenceError::Io` if the file cannot be read
    /// - `PersistenceError::Format` if its contents are invalid
    pub fn load(path: &Path) -> PersistenceResult<CoverageTensor> {
        let bytes = fs::read(path).map_err(|e| {
            PersistenceError::io(format!("Failed to read array file: {}", path.display()), e)
        })?;
        Ok(deserialize(&bytes)?)
    }

    /// Returns a copy of `tensor` with the last index of `axis` removed.
    pub fn trim_last_of_axis(tensor: &CoverageTensor, axis: usize) -> ValueResult<CoverageTensor> {
        tensor.trim_last_of_axis(axis)
    }

    /// Returns a copy of `tensor` with `position` removed from `axis`.
    pub fn remove_index(
        tensor: &CoverageTensor,
        axis: usize,
        position: usize,
    ) -> ValueResult<CoverageTensor> {
        tensor.remove_index(axis, position)
    }
}

/// Shorthand for [`TensorPersistence::save`]
pub fn save(tensor: &CoverageTensor, path: &Path) -> PersistenceResult<()> {
    TensorPersistence::save(tensor, path)
}

/// Shorthand for [`TensorPersistence::load`]
pub fn load(path: &Path) -> PersistenceResult<CoverageTensor> {
    TensorPersistence::load(path)
}
