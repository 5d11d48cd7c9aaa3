//! Conversion pipeline
//!
//! Strict order:
//!
//! 1. Read the input container fully into memory
//! 2. Decode into a dense tensor (all-or-nothing)
//! 3. Trim the reference entry, if configured
//! 4. Save the array file atomically
//! 5. Reload and compare, if configured
//!
//! Timing and memory sampling happen here, around the core calls, never
//! inside the decoder or persistence layers.

use std::path::Path;

use serde::Serialize;

use super::config::ConvertConfig;
use super::errors::{ConvertError, ConvertResult};
use super::verify::verify_saved;
use crate::decoder::{DecodeStats, ElementWidth, FormatDecoder};
use crate::observability::{
    log_event_with_fields, Event, Logger, MemoryProbe, ObservationScope, Timer,
};
use crate::persistence::TensorPersistence;
use crate::tensor::{CoverageTensor, Shape};

/// Outcome of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    /// Shape as decoded, before any trim
    pub source_shape: Shape,
    /// Shape written to the array file
    pub shape: Shape,
    pub input_bytes: u64,
    pub trailing_bytes: u64,
    pub element_width: ElementWidth,
    /// Axis trimmed, if any
    pub trimmed_axis: Option<usize>,
    pub verified: bool,
    /// Non-zero flags in the written tensor
    pub covered_flags: usize,
    pub elapsed_ms: u64,
    pub peak_memory_kb: Option<u64>,
}

/// Reads and decodes a container file.
pub fn decode_file(path: &Path, width: ElementWidth) -> ConvertResult<(CoverageTensor, DecodeStats)> {
    let path_str = path.display().to_string();
    let scope = ObservationScope::with_fields(
        "DECODE",
        &[("path", path_str.as_str()), ("element_width", width.as_str())],
    );

    match FormatDecoder::new(width).decode_file_with_stats(path) {
        Ok((tensor, stats)) => {
            let input_bytes = (stats.bytes_consumed + stats.trailing_bytes).to_string();
            log_event_with_fields(
                Event::InputRead,
                &[("path", path_str.as_str()), ("bytes", input_bytes.as_str())],
            );
            scope.complete_with_fields(&[("shape", format!("{:?}", stats.shape).as_str())]);
            if stats.trailing_bytes > 0 {
                log_event_with_fields(
                    Event::TrailingBytesIgnored,
                    &[("bytes", stats.trailing_bytes.to_string().as_str())],
                );
            }
            Ok((tensor, stats))
        }
        Err(e) => {
            scope.fail_with_fields(&e.to_string(), &[("code", e.code())]);
            Err(e.into())
        }
    }
}

/// Applies the configured trim, if any.
pub fn apply_trim(tensor: CoverageTensor, trim_axis: Option<usize>) -> ConvertResult<CoverageTensor> {
    let Some(axis) = trim_axis else {
        return Ok(tensor);
    };
    let trimmed = TensorPersistence::trim_last_of_axis(&tensor, axis)?;
    log_event_with_fields(
        Event::TrimApplied,
        &[
            ("axis", axis.to_string().as_str()),
            ("from", format!("{:?}", tensor.shape()).as_str()),
            ("to", format!("{:?}", trimmed.shape()).as_str()),
        ],
    );
    Ok(trimmed)
}

/// Drives a full conversion from a [`ConvertConfig`].
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn run(&self) -> ConvertResult<ConvertReport> {
        let timer = Timer::new();
        let input = self.config.input_path.display().to_string();
        let output = self.config.output_path.display().to_string();
        let scope = ObservationScope::with_fields(
            "CONVERT",
            &[("input", input.as_str()), ("output", output.as_str())],
        );

        match self.run_steps(&timer) {
            Ok(report) => {
                scope.complete_with_fields(&[("shape", format!("{:?}", report.shape).as_str())]);
                if let Some(kb) = report.peak_memory_kb {
                    log_event_with_fields(Event::MemoryPeak, &[("peak_kb", kb.to_string().as_str())]);
                }
                Ok(report)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Logger::log(e.severity(), "CONVERT_ERROR", &[("code", e.code())]);
                Err(e)
            }
        }
    }

    fn run_steps(&self, timer: &Timer) -> ConvertResult<ConvertReport> {
        let config = &self.config;
        config.validate()?;

        let (decoded, stats) = decode_file(&config.input_path, config.element_width)?;
        let source_shape = decoded.shape();
        let tensor = apply_trim(decoded, config.trim())?;

        let save_scope = ObservationScope::new("SAVE");
        if let Err(e) = TensorPersistence::save(&tensor, &config.output_path) {
            save_scope.fail_with_fields(&e.to_string(), &[("code", e.code())]);
            return Err(e.into());
        }
        save_scope.complete_with_fields(&[("path", config.output_path.display().to_string().as_str())]);
        log_event_with_fields(
            Event::ArraySaved,
            &[("elements", tensor.len().to_string().as_str())],
        );

        if config.verify_after_save {
            if let Err(e) = verify_saved(&tensor, &config.output_path) {
                if let ConvertError::VerifyMismatch(m) = &e {
                    log_event_with_fields(Event::VerifyMismatch, &[("mismatch", m.to_string().as_str())]);
                }
                return Err(e);
            }
            log_event_with_fields(Event::VerifyComplete, &[]);
        }

        Ok(ConvertReport {
            source_shape,
            shape: tensor.shape(),
            input_bytes: stats.bytes_consumed + stats.trailing_bytes,
            trailing_bytes: stats.trailing_bytes,
            element_width: stats.element_width,
            trimmed_axis: config.trim(),
            verified: config.verify_after_save,
            covered_flags: tensor.count_nonzero(),
            elapsed_ms: timer.elapsed_ms() as u64,
            peak_memory_kb: MemoryProbe::peak_resident_kb(),
        })
    }
}
