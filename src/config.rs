//! Pipeline configuration
//!
//! Settings come from an optional YAML file and are overridden by CLI flags
//! and environment variables (clap resolves those two before they reach
//! `ConfigOverrides`).
//!
//! ```yaml
//! data_dir: ./pulse/data
//! database: duckdb://pulse.duckdb
//! parquet_dir: ./exports
//! parallel: true
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default database file, created in the working directory
pub const DEFAULT_DATABASE: &str = "pulse.duckdb";

// ============================================================================
// Pipeline Config
// ============================================================================

/// Settings for one ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root of the snapshot tree
    #[serde(default)]
    pub data_dir: PathBuf,

    /// DuckDB file path, `duckdb://` URL or `:memory:`
    #[serde(default = "default_database")]
    pub database: String,

    /// Also export every written table to `<parquet_dir>/<table>.parquet`
    #[serde(default)]
    pub parquet_dir: Option<PathBuf>,

    /// Load and extract files on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            database: default_database(),
            parquet_dir: None,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Create a config for a data directory with default settings
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    #[must_use]
    pub fn with_parquet_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parquet_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load the optional config file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI and environment overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(parquet_dir) = overrides.parquet_dir {
            self.parquet_dir = Some(parquet_dir);
        }
        if overrides.sequential {
            self.parallel = false;
        }
        self
    }

    /// Check the settings an ingestion run needs
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::invalid_value(
                "data_dir",
                "a data directory is required (--data-dir or PULSE_DATA_DIR)",
            ));
        }
        if self.database.trim().is_empty() {
            return Err(Error::invalid_value("database", "cannot be empty"));
        }
        if matches!(&self.parquet_dir, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(Error::invalid_value("parquet_dir", "cannot be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub database: Option<String>,
    pub parquet_dir: Option<PathBuf>,
    pub sequential: bool,
}
