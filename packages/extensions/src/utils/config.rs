// packages/extensions/src/utils/config.rs
//! Kit configuration
//!
//! Loaded from an optional `recorder-ext.{toml,yaml,json}` file in the working
//! directory, then overridden by `RECORDER_EXT__<SECTION>__<KEY>` environment
//! variables.

use crate::utils::errors::{ExtensionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RECORDER_EXT";

/// Default configuration file stem
pub const CONFIG_FILE: &str = "recorder-ext";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    pub recorder: RecorderConfig,
    pub schema: SchemaConfig,
    pub trace: TraceOutputConfig,
    pub logging: LoggingConfig,
}

/// Reference recorder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Events buffered before new ones are dropped
    pub capacity: usize,

    /// Longest string payload kept, in bytes
    pub max_string_len: usize,

    /// Record from creation instead of waiting for `start()`
    pub start_active: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            max_string_len: 52,
            start_active: true,
        }
    }
}

/// Schema lookup settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Searched after the trace file's own directory
    pub fallback_dir: Option<PathBuf>,
}

/// Trace file output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOutputConfig {
    pub output_path: PathBuf,
    pub compress: bool,
    pub compression_level: i32,
}

impl Default for TraceOutputConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("trace.json.zst"),
            compress: true,
            compression_level: 3,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, `RUST_LOG` wins when set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl KitConfig {
    /// Load from the default file (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Load from an explicit file path plus the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: KitConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Reject settings the recorder cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.recorder.capacity == 0 {
            return Err(ExtensionError::Config(
                "recorder.capacity must be at least 1".to_string(),
            ));
        }
        if self.recorder.max_string_len == 0 {
            return Err(ExtensionError::Config(
                "recorder.max_string_len must be at least 1".to_string(),
            ));
        }
        if !(1..=22).contains(&self.trace.compression_level) {
            return Err(ExtensionError::Config(format!(
                "trace.compression_level {} outside 1..=22",
                self.trace.compression_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = KitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recorder.max_string_len, 52);
        assert!(config.schema.fallback_dir.is_none());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = KitConfig::default();
        config.recorder.capacity = 0;
        assert!(matches!(config.validate(), Err(ExtensionError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[recorder]\ncapacity = 16\n\n[schema]\nfallback_dir = \"/opt/viewer/cfg\"\n"
        )
        .unwrap();

        let config = KitConfig::load_from(file.path()).unwrap();
        assert_eq!(config.recorder.capacity, 16);
        assert_eq!(config.recorder.max_string_len, 52);
        assert_eq!(
            config.schema.fallback_dir,
            Some(PathBuf::from("/opt/viewer/cfg"))
        );
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[recorder]\nmax_string_len = 0\n").unwrap();

        assert!(KitConfig::load_from(file.path()).is_err());
    }
}
