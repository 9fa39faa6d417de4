// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pulse-etl
//!
//! Ingests quarterly JSON snapshots of a national digital-payments dataset
//! (transactions, insurance, users and devices, by country, state and
//! district), flattens them into uniform tables and loads them into DuckDB
//! for a dashboard to query.
//!
//! ## Features
//!
//! - **Discovery**: walks `aggregated|map|top` × `insurance|transaction|user`
//!   trees and reads year, quarter and state from the path
//! - **Closed extractor registry**: one extractor per
//!   `(data_type, category, scope)`, chosen by exhaustive match
//! - **Idempotent loads**: tables are dropped and recreated with a
//!   `quarter` index on every run
//! - **Arrow/Parquet export** of every written table
//! - **Read-only query API** over the CLI and HTTP
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pulse_etl::{config::PipelineConfig, pipeline::Pipeline, store::Store, Result};
//!
//! fn main() -> Result<()> {
//!     let config = PipelineConfig::new("pulse/data").with_database("pulse.duckdb");
//!     let mut store = Store::open(&config.database)?;
//!
//!     let summary = Pipeline::new(config)?.run(&mut store)?;
//!     println!("{}", summary.render_pretty());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌────────────┐   ┌──────────────┐
//! │ Discovery │ → │   Registry   │ → │ Extractors │ → │ Table (rows) │
//! │  walkdir  │   │ ExtractionKey│   │ JSON → rows│   │ per extractor│
//! └───────────┘   └──────────────┘   └────────────┘   └──────┬───────┘
//!                                                            │
//!                     ┌────────────────────┬─────────────────┤
//!                     ▼                    ▼                 ▼
//!               ┌──────────┐        ┌────────────┐    ┌─────────────┐
//!               │  DuckDB  │        │  Parquet   │    │ RunSummary  │
//!               │  Store   │        │  export    │    │             │
//!               └────┬─────┘        └────────────┘    └─────────────┘
//!                    │ read-only
//!          ┌─────────┴─────────┐
//!          │ query CLI / HTTP  │
//!          └───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Snapshot file discovery
pub mod discovery;

/// Extractor registry and row extractors
pub mod extract;

/// Table accumulator and Arrow/Parquet output
pub mod output;

/// DuckDB table store and query interface
pub mod store;

/// Ingestion pipeline
pub mod pipeline;

/// Pipeline configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::PipelineConfig;
pub use extract::{lookup, Extractor, FlatRecord, Scalar};
pub use output::Table;
pub use pipeline::{ingest, Pipeline, RunSummary};
pub use store::{QueryFilter, Store};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
