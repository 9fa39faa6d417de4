//! Output module
//!
//! Holds the per-extractor `Table` accumulator and its Arrow/Parquet
//! renderings.
//!
//! # Overview
//!
//! - Deriving Arrow schemas from the static table schemas
//! - Converting flat records to Arrow RecordBatches
//! - Writing Parquet exports

mod schema;
mod table;
mod writer;

pub use schema::{arrow_schema, records_to_batch};
pub use table::Table;
pub use writer::{write_table_parquet, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
