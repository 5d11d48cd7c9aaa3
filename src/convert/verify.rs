//! Tensor comparison for round-trip verification

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::errors::{ConvertError, ConvertResult};
use crate::persistence::TensorPersistence;
use crate::tensor::{CoverageTensor, Shape};

/// First difference found between two tensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    Shape {
        expected: Shape,
        actual: Shape,
    },
    Element {
        index: [usize; 3],
        expected: i8,
        actual: i8,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Shape { expected, actual } => {
                write!(f, "shape {:?} != expected {:?}", actual, expected)
            }
            Mismatch::Element {
                index,
                expected,
                actual,
            } => write!(
                f,
                "element {:?} is {}, expected {}",
                index, actual, expected
            ),
        }
    }
}

/// Returns the first difference between `expected` and `actual`, if any.
pub fn compare(expected: &CoverageTensor, actual: &CoverageTensor) -> Option<Mismatch> {
    if expected.shape() != actual.shape() {
        return Some(Mismatch::Shape {
            expected: expected.shape(),
            actual: actual.shape(),
        });
    }

    let [_, steps, flags] = expected.shape();
    expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .position(|(a, b)| a != b)
        .map(|i| Mismatch::Element {
            index: [i / (steps * flags), (i / flags) % steps, i % flags],
            expected: expected.as_slice()[i],
            actual: actual.as_slice()[i],
        })
}

/// Loads `path` and checks it is bit-identical to `tensor`.
pub fn verify_saved(tensor: &CoverageTensor, path: &Path) -> ConvertResult<()> {
    let reloaded = TensorPersistence::load(path)?;
    match compare(tensor, &reloaded) {
        None => Ok(()),
        Some(mismatch) => Err(ConvertError::VerifyMismatch(mismatch)),
    }
}
