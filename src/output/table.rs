//! Per-extractor table accumulator

use super::schema::records_to_batch;
use crate::error::{Error, Result};
use crate::extract::{Extractor, FlatRecord, TableSchema};
use arrow::record_batch::RecordBatch;

/// Every row one extractor produced during a run, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    extractor: Extractor,
    rows: Vec<FlatRecord>,
    /// Files that reached this extractor, including those that produced no rows
    sources: usize,
}

impl Table {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor,
            rows: Vec::new(),
            sources: 0,
        }
    }

    /// Append the rows extracted from one file
    pub fn append(&mut self, rows: Vec<FlatRecord>) -> Result<()> {
        let schema = self.schema();
        if let Some(row) = rows.iter().find(|r| r.schema() != schema) {
            return Err(Error::invalid_row(
                self.name(),
                format!("row built for '{}'", row.schema().name),
            ));
        }
        self.rows.extend(rows);
        self.sources += 1;
        Ok(())
    }

    pub fn extractor(&self) -> Extractor {
        self.extractor
    }

    /// Table name in the store
    pub fn name(&self) -> &'static str {
        self.extractor.table_name()
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.extractor.schema()
    }

    pub fn rows(&self) -> &[FlatRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of files appended
    pub fn sources(&self) -> usize {
        self.sources
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        records_to_batch(self.schema(), &self.rows)
    }
}
