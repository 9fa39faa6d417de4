//! Extraction module
//!
//! Registry and row extractors that flatten snapshot documents into
//! uniform, typed rows.
//!
//! # Overview
//!
//! - `Extractor` - closed enumeration of extraction strategies, one per
//!   `(data_type, category, scope)` triple and output table
//! - `lookup` - string-level registry lookup used at the path boundary
//! - `TableSchema` / `FlatRecord` - fixed column layouts and the rows built
//!   against them

mod extractors;
mod registry;
pub mod schemas;
mod types;

pub use registry::{lookup, Extractor};
pub use types::{Column, ColumnType, FlatRecord, Scalar, TableSchema};
