//! CLI commands and argument parsing

use crate::output::ParquetWriterConfig;
use clap::{Parser, Subcommand};
use parquet::basic::Compression;
use std::path::PathBuf;

/// Digital payments snapshot ingestion
#[derive(Parser, Debug)]
#[command(name = "pulse-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a snapshot tree into the database
    Ingest {
        /// Root of the snapshot tree
        #[arg(short, long, env = "PULSE_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// DuckDB file, duckdb:// URL or :memory:
        #[arg(long, env = "PULSE_DATABASE")]
        database: Option<String>,

        /// Also export every table as Parquet into this directory
        #[arg(long)]
        parquet_dir: Option<PathBuf>,

        /// Compression codec for Parquet exports
        #[arg(long, default_value = "snappy")]
        parquet_compression: ParquetCompression,

        /// Process files on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// List registered tables and their columns
    Tables,

    /// Print rows of a table as JSON lines
    Query {
        /// Table name (see `tables`)
        table: String,

        /// DuckDB file or duckdb:// URL
        #[arg(long, env = "PULSE_DATABASE")]
        database: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: Option<u8>,

        /// State name or slug (state-level tables only)
        #[arg(long)]
        state: Option<String>,

        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Start the read-only HTTP query API
    Serve {
        /// DuckDB file or duckdb:// URL
        #[arg(long, env = "PULSE_DATABASE")]
        database: Option<String>,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Pretty,
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ParquetCompression {
    Snappy,
    Zstd,
    /// Write pages uncompressed
    None,
}

impl ParquetCompression {
    /// Writer settings for this codec
    pub fn writer_config(self) -> ParquetWriterConfig {
        let config = ParquetWriterConfig::new();
        match self {
            Self::Snappy => config.with_compression(Compression::SNAPPY),
            Self::Zstd => config.zstd(),
            Self::None => config.with_compression(Compression::UNCOMPRESSED),
        }
    }
}
