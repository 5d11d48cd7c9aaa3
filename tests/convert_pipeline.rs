//! Conversion Pipeline Tests
//!
//! End-to-end runs of the configured pipeline and the CLI entry points:
//! container on disk -> decode -> trim -> array file -> reload.

use satcov::cli::{inspect_summary, resolve_config, run_command, verify_files, Command, ConvertArgs};
use satcov::convert::{ConvertConfig, ConvertError, Converter};
use satcov::decoder::{encode, encode_jagged, ElementWidth};
use satcov::persistence::{temp_path_for, TensorPersistence};
use satcov::tensor::CoverageTensor;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

/// Two satellites, three time steps (last is the reference entry), two flags.
fn simulator_output() -> CoverageTensor {
    CoverageTensor::from_vec([2, 3, 2], vec![1, 0, 0, 0, 1, 1, 0, 1, 1, 1, 1, 1]).unwrap()
}

fn write_container(dir: &Path, tensor: &CoverageTensor, width: ElementWidth) -> std::path::PathBuf {
    let path = dir.join("data_simulation.bin");
    fs::write(&path, encode(tensor, width)).unwrap();
    path
}

// =============================================================================
// Converter
// =============================================================================

#[test]
fn test_default_run_drops_reference_timestep() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_container(temp_dir.path(), &simulator_output(), ElementWidth::I16);
    let output = temp_dir.path().join("simulation_coverage_info.sct");

    let config = ConvertConfig {
        input_path: input,
        output_path: output.clone(),
        ..ConvertConfig::default()
    };
    let report = Converter::new(config).run().unwrap();

    assert_eq!(report.source_shape, [2, 3, 2]);
    assert_eq!(report.shape, [2, 2, 2]);
    assert_eq!(report.trailing_bytes, 0);
    assert!(report.verified);

    let saved = TensorPersistence::load(&output).unwrap();
    assert_eq!(saved.as_slice(), &[1, 0, 0, 0, 0, 1, 1, 1]);
    assert!(!temp_path_for(&output).exists());
}

#[test]
fn test_i32_container() {
    let temp_dir = TempDir::new().unwrap();
    let source = simulator_output();
    let input = write_container(temp_dir.path(), &source, ElementWidth::I32);
    let output = temp_dir.path().join("out.sct");

    let config = ConvertConfig {
        input_path: input,
        output_path: output.clone(),
        element_width: ElementWidth::I32,
        trim_reference: false,
        ..ConvertConfig::default()
    };
    Converter::new(config).run().unwrap();

    assert_eq!(TensorPersistence::load(&output).unwrap(), source);
}

#[test]
fn test_truncated_container_keeps_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.sct");
    let previous = CoverageTensor::from_vec([1, 1, 1], vec![1]).unwrap();
    TensorPersistence::save(&previous, &output).unwrap();

    let input = temp_dir.path().join("data_simulation.bin");
    let mut bytes = encode(&simulator_output(), ElementWidth::I16);
    bytes.truncate(bytes.len() - 3);
    fs::write(&input, bytes).unwrap();

    let config = ConvertConfig {
        input_path: input,
        output_path: output.clone(),
        ..ConvertConfig::default()
    };
    let err = Converter::new(config).run().unwrap_err();

    assert!(matches!(err, ConvertError::Format(_)));
    assert_eq!(err.code(), "SATCOV_FORMAT_TRUNCATED");
    assert_eq!(TensorPersistence::load(&output).unwrap(), previous);
}

#[test]
fn test_ragged_container_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("data_simulation.bin");
    fs::write(
        &input,
        encode_jagged(
            &[vec![vec![1], vec![0], vec![1]], vec![vec![1], vec![0]]],
            ElementWidth::I16,
        ),
    )
    .unwrap();

    let config = ConvertConfig {
        input_path: input,
        output_path: temp_dir.path().join("out.sct"),
        ..ConvertConfig::default()
    };
    let err = Converter::new(config).run().unwrap_err();
    assert!(err.to_string().contains("[1]"), "{}", err);
}

// =============================================================================
// CLI entry points
// =============================================================================

#[test]
fn test_convert_then_inspect_and_verify() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_container(temp_dir.path(), &simulator_output(), ElementWidth::I16);
    let output = temp_dir.path().join("coverage.sct");

    run_command(Command::Convert(ConvertArgs {
        input: Some(input.clone()),
        output: Some(output.clone()),
        log_level: Some("error".to_string()),
        ..ConvertArgs::default()
    }))
    .unwrap();

    let summary = inspect_summary(&output).unwrap();
    assert_eq!(summary["shape"], serde_json::json!([2, 2, 2]));
    assert_eq!(summary["element_type"], "i8");
    assert_eq!(summary["coverage_per_satellite"], serde_json::json!([1, 3]));

    let verified = verify_files(&input, &output, ElementWidth::I16, Some(1)).unwrap();
    assert_eq!(verified["matches"], true);
}

#[test]
fn test_config_file_drives_convert() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_container(temp_dir.path(), &simulator_output(), ElementWidth::I8);
    let output = temp_dir.path().join("from_config.sct");
    let config_path = temp_dir.path().join("satcov.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "input_path": input,
            "output_path": output,
            "element_width": "i8",
            "trim_reference": false,
            "verify_after_save": false
        })
        .to_string(),
    )
    .unwrap();

    let config = resolve_config(&ConvertArgs {
        config: Some(config_path),
        ..ConvertArgs::default()
    })
    .unwrap();
    let report = Converter::new(config).run().unwrap();

    assert_eq!(report.shape, [2, 3, 2]);
    assert!(!report.verified);
    assert_eq!(report.trimmed_axis, None);
}
