//! Ingestion pipeline
//!
//! Discovers snapshot files, routes each through its extractor, groups the
//! rows per table and loads every non-empty table into the store.
//!
//! # Failure handling
//!
//! Per-file errors (bad paths, unreadable files, unexpected JSON shapes)
//! skip only that file. A table that fails to persist is reported and the
//! remaining tables are still written.

mod types;

pub use types::{FailedTable, RunSummary, SkipReason, SkippedFile, TableReport};

use crate::config::PipelineConfig;
use crate::discovery::{discover, DiscoveredFile};
use crate::error::{Error, Result};
use crate::extract::{Extractor, FlatRecord};
use crate::output::{write_table_parquet, ParquetWriterConfig, Table};
use crate::store::Store;
use chrono::Utc;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

/// Result of processing one discovered file
#[derive(Debug)]
enum FileOutcome {
    Extracted {
        extractor: Extractor,
        rows: Vec<FlatRecord>,
    },
    /// `extractor` is known when the path classified but the file failed later
    Skipped {
        extractor: Option<Extractor>,
        file: SkippedFile,
    },
}

/// Tables built from one pass over the data root, before loading
#[derive(Debug, Default)]
pub struct Extraction {
    /// Keyed by extractor so tables are always loaded in the same order.
    /// Every extractor that received a file has an entry, even if empty.
    pub tables: BTreeMap<Extractor, Table>,
    pub skipped_files: Vec<SkippedFile>,
    pub files_discovered: usize,
    pub files_processed: usize,
}

impl Extraction {
    pub fn table(&self, extractor: Extractor) -> Option<&Table> {
        self.tables.get(&extractor)
    }

    fn record(&mut self, outcome: FileOutcome) {
        self.files_discovered += 1;
        match outcome {
            FileOutcome::Extracted { extractor, rows } => {
                let table = self
                    .tables
                    .entry(extractor)
                    .or_insert_with(|| Table::new(extractor));
                match table.append(rows) {
                    Ok(()) => self.files_processed += 1,
                    Err(e) => tracing::warn!(table = extractor.table_name(), "{e}"),
                }
            }
            FileOutcome::Skipped { extractor, file } => {
                if let Some(extractor) = extractor {
                    self.tables
                        .entry(extractor)
                        .or_insert_with(|| Table::new(extractor));
                }
                self.skipped_files.push(file);
            }
        }
    }
}

/// Ingestion pipeline
pub struct Pipeline {
    config: PipelineConfig,
    parquet: ParquetWriterConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parquet: ParquetWriterConfig::default(),
        })
    }

    /// Set Parquet export options
    #[must_use]
    pub fn with_parquet_config(mut self, parquet: ParquetWriterConfig) -> Self {
        self.parquet = parquet;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Discover, extract and load every table
    pub fn run(&self, store: &mut Store) -> Result<RunSummary> {
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            database = store.location(),
            parallel = self.config.parallel,
            "Starting ingestion"
        );

        let extraction = self.extract()?;
        let mut summary = self.load(extraction, store, started_at);
        summary.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            tables = summary.tables_written.len(),
            rows = summary.total_rows(),
            skipped = summary.skipped_files.len(),
            failed = summary.failed_tables.len(),
            duration_ms = summary.duration_ms,
            "Ingestion finished"
        );
        Ok(summary)
    }

    /// Discover and extract every file without touching the store
    ///
    /// Output is identical whether or not files are processed in parallel:
    /// outcomes are folded in discovery order.
    pub fn extract(&self) -> Result<Extraction> {
        let discovery = discover(&self.config.data_dir)?;

        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            let files: Vec<Result<DiscoveredFile>> = discovery.collect();
            files.into_par_iter().map(process_file).collect()
        } else {
            discovery.map(process_file).collect()
        };

        let mut extraction = Extraction::default();
        for outcome in outcomes {
            extraction.record(outcome);
        }

        tracing::debug!(
            files = extraction.files_discovered,
            tables = extraction.tables.len(),
            "Extraction complete"
        );
        Ok(extraction)
    }

    /// Write extracted tables to the store
    pub fn load(
        &self,
        extraction: Extraction,
        store: &mut Store,
        started_at: chrono::DateTime<Utc>,
    ) -> RunSummary {
        let mut summary = RunSummary::new(started_at);
        summary.files_discovered = extraction.files_discovered;
        summary.files_processed = extraction.files_processed;
        summary.skipped_files = extraction.skipped_files;

        for table in extraction.tables.into_values() {
            if table.is_empty() {
                let err = Error::EmptyResult {
                    table: table.name().to_string(),
                };
                tracing::warn!(files = table.sources(), "{err}");
                summary.empty_tables.push(table.name().to_string());
                continue;
            }

            match store.replace_table(&table) {
                Ok(rows) => {
                    tracing::info!(table = table.name(), rows, "Table written");
                    let parquet = self.export(&table, &mut summary);
                    summary.tables_written.push(TableReport {
                        table: table.name().to_string(),
                        rows,
                        files: table.sources(),
                        parquet,
                    });
                }
                Err(e) => {
                    tracing::error!(table = table.name(), "{e}");
                    summary.failed_tables.push(FailedTable {
                        table: table.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// Parquet export of a written table, when configured
    fn export(&self, table: &Table, summary: &mut RunSummary) -> Option<PathBuf> {
        let dir = self.config.parquet_dir.as_ref()?;
        match write_table_parquet(dir, table, &self.parquet) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(table = table.name(), "Parquet export failed: {e}");
                summary.failed_tables.push(FailedTable {
                    table: table.name().to_string(),
                    message: format!("Parquet export failed: {e}"),
                });
                None
            }
        }
    }
}

/// Run one ingestion with a freshly validated pipeline
pub fn ingest(config: PipelineConfig, store: &mut Store) -> Result<RunSummary> {
    Pipeline::new(config)?.run(store)
}

/// Load and extract one discovered file
fn process_file(discovered: Result<DiscoveredFile>) -> FileOutcome {
    let file = match discovered {
        Ok(file) => file,
        Err(e) => {
            return FileOutcome::Skipped {
                extractor: None,
                file: skip(error_path(&e), &e),
            }
        }
    };

    let extractor = file.extractor();
    match extract_file(&file) {
        Ok(rows) => FileOutcome::Extracted { extractor, rows },
        Err(e) => FileOutcome::Skipped {
            extractor: Some(extractor),
            file: skip(file.path, &e),
        },
    }
}

fn extract_file(file: &DiscoveredFile) -> Result<Vec<FlatRecord>> {
    let record = file.load()?;
    record.extractor().extract(&record.payload, &record.coords)
}

fn skip(path: PathBuf, error: &Error) -> SkippedFile {
    let reason = SkipReason::from_error(error).unwrap_or(SkipReason::UnreadableFile);
    if reason == SkipReason::UnregisteredShape {
        tracing::debug!(path = %path.display(), "Skipping file: {error}");
    } else {
        tracing::warn!(path = %path.display(), "Skipping file: {error}");
    }

    SkippedFile {
        path,
        reason,
        message: error.to_string(),
    }
}

fn error_path(error: &Error) -> PathBuf {
    match error {
        Error::MalformedPath { path, .. }
        | Error::UnreadableFile { path, .. }
        | Error::UnregisteredShape { path, .. } => path.clone(),
        _ => PathBuf::new(),
    }
}
