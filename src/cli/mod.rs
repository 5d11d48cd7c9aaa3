//! CLI module for satcov
//!
//! Provides command-line interface for:
//! - convert: Decode a container and write an array file
//! - inspect: Summarize an array file
//! - verify: Check an array file against its source container

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ConvertArgs};
pub use commands::{
    convert, inspect, inspect_summary, resolve_config, run, run_command, verify, verify_files,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
