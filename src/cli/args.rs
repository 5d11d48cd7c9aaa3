//! CLI argument definitions using clap
//!
//! Commands:
//! - satcov convert [--config <path>] [--input <bin>] [--output <sct>] ...
//! - satcov inspect --input <sct>
//! - satcov verify --input <bin> --array <sct>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::decoder::ElementWidth;

/// satcov - convert simulator coverage containers into dense array files
#[derive(Parser, Debug)]
#[command(name = "satcov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a nested container, trim the reference entry and save an array file
    Convert(ConvertArgs),

    /// Print shape and coverage summary of an array file
    Inspect {
        /// Array file to read
        #[arg(long)]
        input: PathBuf,
    },

    /// Check that an array file matches the container it was produced from
    Verify {
        /// Nested container written by the simulator
        #[arg(long)]
        input: PathBuf,

        /// Array file to compare against
        #[arg(long)]
        array: PathBuf,

        /// On-disk width of flag values (i8, i16, i32)
        #[arg(long, default_value = "i16")]
        element_width: ElementWidth,

        /// The array file still contains the reference entry
        #[arg(long)]
        keep_reference: bool,

        /// Axis holding the reference entry
        #[arg(long, default_value_t = crate::tensor::AXIS_TIMESTEP)]
        trim_axis: usize,
    },
}

/// Flags for `satcov convert`; each one set overrides the config file
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// JSON configuration file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Nested container written by the simulator
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Array file to write
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// On-disk width of flag values (i8, i16, i32)
    #[arg(long)]
    pub element_width: Option<ElementWidth>,

    /// Keep the always-feasible reference entry
    #[arg(long)]
    pub keep_reference: bool,

    /// Axis holding the reference entry
    #[arg(long)]
    pub trim_axis: Option<usize>,

    /// Skip reloading the written file
    #[arg(long)]
    pub no_verify: bool,

    /// Lowest log severity (trace, info, warn, error, fatal)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
