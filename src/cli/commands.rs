//! CLI command implementations
//!
//! Commands are thin: they resolve configuration, call into `convert`,
//! `persistence` and `decoder`, and print one JSON response. Every
//! failure surfaces as a [`CliError`] for `main` to report.

use std::path::Path;

use serde_json::{json, Value};

use crate::convert::{apply_trim, compare, decode_file, ConvertConfig, ConvertError, Converter};
use crate::decoder::ElementWidth;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::persistence::{ElementType, TensorPersistence};

use super::args::{Command, ConvertArgs};
use super::errors::CliResult;
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Convert(args) => convert(&args),
        Command::Inspect { input } => inspect(&input),
        Command::Verify {
            input,
            array,
            element_width,
            keep_reference,
            trim_axis,
        } => verify(&input, &array, element_width, (!keep_reference).then_some(trim_axis)),
    }
}

/// Decode, trim, save and (optionally) verify
pub fn convert(args: &ConvertArgs) -> CliResult<()> {
    let config = resolve_config(args)?;
    Logger::set_min_severity(config.severity()?);

    let input = config.input_path.display().to_string();
    let output = config.output_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("input", input.as_str()),
            ("output", output.as_str()),
            ("element_width", config.element_width.as_str()),
        ],
    );

    let report = Converter::new(config).run()?;
    write_response(serde_json::to_value(&report)?)
}

/// Print a summary of an array file
pub fn inspect(path: &Path) -> CliResult<()> {
    write_response(inspect_summary(path)?)
}

/// Compare an array file against the container it came from
pub fn verify(
    input: &Path,
    array: &Path,
    width: ElementWidth,
    trim_axis: Option<usize>,
) -> CliResult<()> {
    write_response(verify_files(input, array, width, trim_axis)?)
}

/// Builds the effective configuration: config file (or defaults), then flags.
pub fn resolve_config(args: &ConvertArgs) -> CliResult<ConvertConfig> {
    let mut config = ConvertConfig::load_or_default(args.config.as_deref())?;

    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(width) = args.element_width {
        config.element_width = width;
    }
    if args.keep_reference {
        config.trim_reference = false;
    }
    if let Some(axis) = args.trim_axis {
        config.trim_axis = axis;
    }
    if args.no_verify {
        config.verify_after_save = false;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Shape, element type and per-satellite coverage of an array file
pub fn inspect_summary(path: &Path) -> CliResult<Value> {
    let tensor = TensorPersistence::load(path)?;
    Ok(json!({
        "path": path.display().to_string(),
        "element_type": ElementType::I8.name(),
        "shape": tensor.shape(),
        "elements": tensor.len(),
        "covered_flags": tensor.count_nonzero(),
        "coverage_per_satellite": tensor.coverage_count_per_satellite(),
    }))
}

/// Decodes `input`, applies the trim and compares the result with `array`
pub fn verify_files(
    input: &Path,
    array: &Path,
    width: ElementWidth,
    trim_axis: Option<usize>,
) -> CliResult<Value> {
    let (decoded, _) = decode_file(input, width)?;
    let expected = apply_trim(decoded, trim_axis)?;
    let saved = TensorPersistence::load(array)?;

    if let Some(mismatch) = compare(&expected, &saved) {
        log_event_with_fields(
            Event::VerifyMismatch,
            &[("mismatch", mismatch.to_string().as_str())],
        );
        return Err(ConvertError::VerifyMismatch(mismatch).into());
    }

    log_event_with_fields(Event::VerifyComplete, &[]);
    Ok(json!({
        "matches": true,
        "shape": saved.shape(),
        "elements": saved.len(),
    }))
}
