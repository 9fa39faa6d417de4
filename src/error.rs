//! Error types for pulse-etl
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! The per-file variants (`MalformedPath`, `UnreadableFile`,
//! `UnregisteredShape`, `SchemaMismatch`) never abort an ingestion run: the
//! pipeline records them as skipped files and moves on.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for pulse-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Discovery Errors
    // ============================================================================
    #[error("Malformed path {}: {reason}", path.display())]
    MalformedPath { path: PathBuf, reason: String },

    #[error("Unreadable file {}: {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("No extractor registered for {data_type}/{category} ({})", path.display())]
    UnregisteredShape {
        path: PathBuf,
        data_type: String,
        category: String,
    },

    // ============================================================================
    // Extraction Errors
    // ============================================================================
    #[error("Extractor '{extractor}' expected key '{key}': {reason}")]
    SchemaMismatch {
        extractor: String,
        key: String,
        reason: String,
    },

    #[error("Extractor '{extractor}' built an invalid row: {message}")]
    InvalidRow { extractor: String, message: String },

    // ============================================================================
    // Load Errors
    // ============================================================================
    #[error("Table '{table}' produced no rows")]
    EmptyResult { table: String },

    #[error("Failed to persist table '{table}': {message}")]
    Persistence { table: String, message: String },

    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a malformed path error
    pub fn malformed_path(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an unreadable file error
    pub fn unreadable(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::UnreadableFile {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(
        extractor: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            extractor: extractor.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid row error
    pub fn invalid_row(extractor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            extractor: extractor.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether this error only affects the file it was raised for
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Error::MalformedPath { .. }
                | Error::UnreadableFile { .. }
                | Error::UnregisteredShape { .. }
                | Error::SchemaMismatch { .. }
                | Error::InvalidRow { .. }
        )
    }
}

/// Result type alias for pulse-etl
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::schema_mismatch("aggregated-user-country", "data.aggregated", "missing");
        assert_eq!(
            err.to_string(),
            "Extractor 'aggregated-user-country' expected key 'data.aggregated': missing"
        );

        let err = Error::malformed_path("top/user/country/abc/1.json", "year 'abc' is not numeric");
        assert_eq!(
            err.to_string(),
            "Malformed path top/user/country/abc/1.json: year 'abc' is not numeric"
        );
    }

    #[test]
    fn test_is_file_scoped() {
        assert!(Error::malformed_path("x", "y").is_file_scoped());
        assert!(Error::unreadable("x", "y").is_file_scoped());
        assert!(Error::schema_mismatch("a", "b", "missing").is_file_scoped());
        assert!(Error::UnregisteredShape {
            path: PathBuf::from("x"),
            data_type: "map".to_string(),
            category: "loans".to_string(),
        }
        .is_file_scoped());

        assert!(!Error::persistence("t", "locked").is_file_scoped());
        assert!(!Error::config("bad").is_file_scoped());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
