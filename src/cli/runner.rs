//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::output::ParquetWriterConfig;
use crate::pipeline::{Pipeline, RunSummary};
use crate::store::{QueryFilter, Store};
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Ingest {
                data_dir,
                database,
                parquet_dir,
                parquet_compression,
                sequential,
            } => {
                let overrides = ConfigOverrides {
                    data_dir: data_dir.clone(),
                    database: database.clone(),
                    parquet_dir: parquet_dir.clone(),
                    sequential: *sequential,
                };
                let config = self.load_config()?.with_overrides(overrides);
                let parquet = parquet_compression.writer_config();
                tokio::task::spawn_blocking(move || ingest(config, parquet))
                    .await
                    .map_err(|e| Error::Other(format!("Ingestion task failed: {e}")))?
                    .and_then(|summary| self.report(&summary))
            }
            Commands::Tables => self.tables(),
            Commands::Query {
                table,
                database,
                year,
                quarter,
                state,
                limit,
            } => {
                let filter = QueryFilter {
                    year: *year,
                    quarter: *quarter,
                    state: state.clone(),
                    limit: *limit,
                };
                let database = self.database(database.as_ref())?;
                self.query(&database, table, &filter)
            }
            Commands::Serve { database, port } => {
                let config = ServerConfig {
                    database: self.database(database.as_ref())?,
                };
                serve(config, *port).await
            }
        }
    }

    /// Load the YAML config file, if one was given
    fn load_config(&self) -> Result<PipelineConfig> {
        PipelineConfig::load(self.cli.config.as_deref())
    }

    /// Database from the flag or environment, falling back to the config file
    fn database(&self, flag: Option<&String>) -> Result<String> {
        match flag {
            Some(database) => Ok(database.clone()),
            None => Ok(self.load_config()?.database),
        }
    }

    /// Print the run summary; fails if any table was not persisted
    fn report(&self, summary: &RunSummary) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", summary.to_json()?),
            OutputFormat::Pretty => print!("{}", summary.render_pretty()),
        }

        if summary.has_failures() {
            let tables: Vec<&str> = summary
                .failed_tables
                .iter()
                .map(|t| t.table.as_str())
                .collect();
            return Err(Error::persistence(
                tables.join(", "),
                "one or more tables were not written",
            ));
        }
        Ok(())
    }

    /// List registered tables
    fn tables(&self) -> Result<()> {
        for extractor in Extractor::ALL {
            let schema = extractor.schema();
            match self.cli.format {
                OutputFormat::Json => {
                    let key = extractor.key();
                    println!(
                        "{}",
                        json!({
                            "table": schema.name,
                            "data_type": key.data_type,
                            "category": key.category,
                            "scope": key.scope,
                            "columns": schema.columns,
                        })
                    );
                }
                OutputFormat::Pretty => {
                    println!("{}", schema.name);
                    for column in schema.columns {
                        println!("  {:<26} {}", column.name, column.column_type);
                    }
                }
            }
        }
        Ok(())
    }

    /// Print matching rows, one JSON object per line
    fn query(&self, database: &str, table: &str, filter: &QueryFilter) -> Result<()> {
        let store = Store::open_read_only(database)?;
        let rows = store.query_table(table, filter)?;

        for row in &rows {
            let line = match self.cli.format {
                OutputFormat::Json => serde_json::to_string(row)?,
                OutputFormat::Pretty => serde_json::to_string_pretty(row)?,
            };
            println!("{line}");
        }

        if self.cli.verbose {
            eprintln!("{} rows from {table}", rows.len());
        }
        Ok(())
    }
}

/// Run the pipeline against the configured database
fn ingest(config: PipelineConfig, parquet: ParquetWriterConfig) -> Result<RunSummary> {
    let pipeline = Pipeline::new(config)?.with_parquet_config(parquet);
    let mut store = Store::open(&pipeline.config().database)?;
    pipeline.run(&mut store)
}
