//! Pipeline result types

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Why a file was left out of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MalformedPath,
    UnreadableFile,
    UnregisteredShape,
    SchemaMismatch,
    InvalidRow,
}

impl SkipReason {
    /// Classify a per-file error; `None` for errors that end the run
    pub fn from_error(error: &Error) -> Option<Self> {
        match error {
            Error::MalformedPath { .. } => Some(Self::MalformedPath),
            Error::UnreadableFile { .. } => Some(Self::UnreadableFile),
            Error::UnregisteredShape { .. } => Some(Self::UnregisteredShape),
            Error::SchemaMismatch { .. } => Some(Self::SchemaMismatch),
            Error::InvalidRow { .. } => Some(Self::InvalidRow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPath => "malformed_path",
            Self::UnreadableFile => "unreadable_file",
            Self::UnregisteredShape => "unregistered_shape",
            Self::SchemaMismatch => "schema_mismatch",
            Self::InvalidRow => "invalid_row",
        }
    }
}

/// A file that produced no rows because of an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
    pub message: String,
}

/// A table written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: String,
    pub rows: usize,
    /// Number of files that contributed to the table
    pub files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parquet: Option<PathBuf>,
}

/// A table that could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTable {
    pub table: String,
    pub message: String,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Candidate files found under the data root, including skipped ones
    pub files_discovered: usize,
    /// Files whose rows reached a table
    pub files_processed: usize,
    pub tables_written: Vec<TableReport>,
    /// Tables whose files were all empty; the store was left untouched
    pub empty_tables: Vec<String>,
    pub failed_tables: Vec<FailedTable>,
    pub skipped_files: Vec<SkippedFile>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration_ms: 0,
            files_discovered: 0,
            files_processed: 0,
            tables_written: Vec::new(),
            empty_tables: Vec::new(),
            failed_tables: Vec::new(),
            skipped_files: Vec::new(),
        }
    }

    /// Report for a written table
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables_written.iter().find(|t| t.table == name)
    }

    pub fn total_rows(&self) -> usize {
        self.tables_written.iter().map(|t| t.rows).sum()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped_files
            .iter()
            .filter(|f| f.reason == reason)
            .count()
    }

    /// Whether any table failed to persist
    pub fn has_failures(&self) -> bool {
        !self.failed_tables.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable report
    pub fn render_pretty(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Ingestion started {} and took {} ms",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.duration_ms
        );
        let _ = writeln!(
            out,
            "Files: {} discovered, {} processed, {} skipped",
            self.files_discovered,
            self.files_processed,
            self.skipped_files.len()
        );

        let _ = writeln!(
            out,
            "\nTables written ({}, {} rows):",
            self.tables_written.len(),
            self.total_rows()
        );
        let width = self
            .tables_written
            .iter()
            .map(|t| t.table.len())
            .max()
            .unwrap_or(0);
        for report in &self.tables_written {
            let _ = write!(
                out,
                "  {:<width$}  {:>8} rows from {} files",
                report.table, report.rows, report.files
            );
            if let Some(path) = &report.parquet {
                let _ = write!(out, "  -> {}", path.display());
            }
            out.push('\n');
        }

        if !self.empty_tables.is_empty() {
            let _ = writeln!(out, "\nEmpty tables ({}):", self.empty_tables.len());
            for table in &self.empty_tables {
                let _ = writeln!(out, "  {table}");
            }
        }

        if !self.failed_tables.is_empty() {
            let _ = writeln!(out, "\nFailed tables ({}):", self.failed_tables.len());
            for failed in &self.failed_tables {
                let _ = writeln!(out, "  {}: {}", failed.table, failed.message);
            }
        }

        if !self.skipped_files.is_empty() {
            let _ = writeln!(out, "\nSkipped files ({}):", self.skipped_files.len());
            for skipped in &self.skipped_files {
                let _ = writeln!(
                    out,
                    "  [{}] {}\n      {}",
                    skipped.reason.as_str(),
                    skipped.path.display(),
                    skipped.message
                );
            }
        }

        out
    }
}
