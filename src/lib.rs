//! satcov - dense coverage tensors from satellite simulator output
//!
//! Decodes the simulator's nested length-prefixed container into a
//! rectangular `[satellite, timestep, flag]` tensor of `i8` flags and
//! persists it as a checksummed array file.
//!
//! Layers, bottom up:
//! - `tensor`: the dense tensor and its shape operations
//! - `decoder`: two-pass container decoder (and a test encoder)
//! - `persistence`: array file format, atomic save, checked load
//! - `scenario`: satellite and UE records with the linear motion model
//! - `observability`: JSON-lines logging, scopes, memory sampling
//! - `convert`: configured pipeline wrapping the layers above
//! - `cli`: the `satcov` command-line driver

pub mod cli;
pub mod convert;
pub mod decoder;
pub mod observability;
pub mod persistence;
pub mod scenario;
pub mod tensor;
