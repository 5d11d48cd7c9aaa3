//! Dense coverage tensor model
//!
//! Holds the in-memory form of a decoded coverage container: one
//! contiguous `i8` buffer plus a rank-3 shape. Transforms never mutate
//! in place; they return a new tensor.

mod coverage;
mod errors;

pub use coverage::{
    element_count, CoverageTensor, Shape, AXIS_FLAG, AXIS_SATELLITE, AXIS_TIMESTEP, RANK,
};
pub use errors::{ValueError, ValueResult};
