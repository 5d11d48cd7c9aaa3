//! Conversion configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so an
//! empty object `{}` is a valid configuration. Command-line flags are
//! applied on top by the driver.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{ConvertError, ConvertResult};
use crate::decoder::ElementWidth;
use crate::observability::Severity;
use crate::tensor::{AXIS_TIMESTEP, RANK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Nested container written by the simulator
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Array file to produce
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// On-disk width of flag values in the container
    #[serde(default)]
    pub element_width: ElementWidth,

    /// Drop the simulator's always-feasible reference entry
    #[serde(default = "default_true")]
    pub trim_reference: bool,

    /// Axis the reference entry sits on
    #[serde(default = "default_trim_axis")]
    pub trim_axis: usize,

    /// Reload the written file and compare it to the tensor in memory
    #[serde(default = "default_true")]
    pub verify_after_save: bool,

    /// Lowest log severity emitted
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("./data_simulation.bin")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("./simulation_coverage_info.sct")
}
fn default_true() -> bool {
    true
}
fn default_trim_axis() -> usize {
    AXIS_TIMESTEP
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Whether two paths name the same file, either literally or once resolved.
fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    matches!(
        (fs::canonicalize(a), fs::canonicalize(b)),
        (Ok(x), Ok(y)) if x == y
    )
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            element_width: ElementWidth::default(),
            trim_reference: true,
            trim_axis: default_trim_axis(),
            verify_after_save: true,
            log_level: default_log_level(),
        }
    }
}

impl ConvertConfig {
    /// Read and parse configuration from a JSON file
    ///
    /// Not validated here: overrides may still be applied on top, so
    /// callers run [`validate`](Self::validate) on the final value.
    pub fn load(path: &Path) -> ConvertResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: ConvertConfig = serde_json::from_str(&content)
            .map_err(|e| ConvertError::config(format!("Invalid config JSON: {}", e)))?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> ConvertResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if self.trim_axis >= RANK {
            return Err(ConvertError::config(format!(
                "trim_axis must be below {}, got {}",
                RANK, self.trim_axis
            )));
        }

        if same_location(&self.input_path, &self.output_path) {
            return Err(ConvertError::config(
                "output_path must differ from input_path",
            ));
        }

        if self.output_path.file_name().is_none() {
            return Err(ConvertError::config(format!(
                "output_path has no file name: {}",
                self.output_path.display()
            )));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConvertResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConvertError::config(format!(
                "Invalid log_level '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Axis to trim, or `None` when trimming is disabled
    pub fn trim(&self) -> Option<usize> {
        self.trim_reference.then_some(self.trim_axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: ConvertConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert_eq!(config.element_width, ElementWidth::I16);
        assert_eq!(config.trim(), Some(1));
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("satcov.json");
        fs::write(
            &path,
            r#"{"input_path": "in.bin", "element_width": "i32", "trim_reference": false}"#,
        )
        .unwrap();

        let config = ConvertConfig::load(&path).unwrap();
        assert_eq!(config.input_path, PathBuf::from("in.bin"));
        assert_eq!(config.element_width, ElementWidth::I32);
        assert_eq!(config.trim(), None);
    }

    #[test]
    fn test_invalid_axis_rejected() {
        let config = ConvertConfig {
            trim_axis: 3,
            ..ConvertConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "SATCOV_CONFIG_ERROR");
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let config = ConvertConfig {
            output_path: default_input_path(),
            ..ConvertConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_leaves_validation_to_caller() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("satcov.json");
        fs::write(&path, r#"{"trim_axis": 5}"#).unwrap();

        let config = ConvertConfig::load(&path).unwrap();
        assert_eq!(config.trim_axis, 5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aliased_output_path_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("data_simulation.bin");
        fs::write(&input, b"container").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let config = ConvertConfig {
            input_path: input,
            output_path: dir.path().join("sub").join("..").join("data_simulation.bin"),
            ..ConvertConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "SATCOV_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = ConvertConfig {
            log_level: "verbose".to_string(),
            ..ConvertConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_width_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("satcov.json");
        fs::write(&path, r#"{"element_width": "u16"}"#).unwrap();
        let err = ConvertConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config JSON"));
    }
}
