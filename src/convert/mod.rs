//! Conversion pipeline for satcov
//!
//! Drives the core components in order (read, decode, trim, save,
//! verify) and owns everything the core does not: configuration, timing,
//! memory sampling and structured logging.

mod config;
mod converter;
mod errors;
mod verify;

pub use config::ConvertConfig;
pub use converter::{apply_trim, decode_file, ConvertReport, Converter};
pub use errors::{ConvertError, ConvertResult};
pub use verify::{compare, verify_saved, Mismatch};
