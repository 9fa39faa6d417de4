//! CLI module
//!
//! Command-line interface for ingesting and querying snapshot tables.
//!
//! # Commands
//!
//! - `ingest` - Load a snapshot tree into the database
//! - `tables` - List registered tables and columns
//! - `query` - Print rows of one table
//! - `serve` - Start the read-only HTTP query API

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat, ParquetCompression};
pub use runner::Runner;
pub use server::{build_router, serve, ServerConfig};
