//! Relational store via DuckDB
//!
//! The ingestion pipeline is the only writer; the query interface opens the
//! same database read-only.

mod engine;
mod types;

pub use engine::{index_name, Store};
pub use types::{QueryFilter, TableInfo};

#[cfg(test)]
mod tests;
