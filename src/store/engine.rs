//! DuckDB-backed table store
//!
//! Tables are rebuilt from scratch on every load: drop, create, insert and
//! index all run inside one transaction.

use super::types::{QueryFilter, TableInfo};
use crate::error::{Error, Result};
use crate::extract::{Extractor, Scalar, TableSchema};
use crate::output::Table;
use crate::types::{JsonValue, StateName};
use duckdb::types::{ToSqlOutput, Value};
use duckdb::{params_from_iter, AccessMode, Config, Connection, ToSql};

/// Connection string prefix accepted in front of a file path
const URL_PREFIX: &str = "duckdb://";

/// In-memory database marker
const MEMORY: &str = ":memory:";

/// Handle on the DuckDB database holding the output tables
pub struct Store {
    conn: Connection,
    location: String,
}

impl Store {
    /// Open (or create) a database for writing
    ///
    /// Accepts a file path, a `duckdb://` prefixed path or `:memory:`.
    pub fn open(connection_string: &str) -> Result<Self> {
        let location = parse_location(connection_string)?;
        let conn = if location == MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(&location)
        }
        .map_err(|e| Error::config(format!("Failed to open DuckDB database '{location}': {e}")))?;

        tracing::debug!(location = %location, "Opened store");
        Ok(Self { conn, location })
    }

    /// Open an existing database without write access
    pub fn open_read_only(connection_string: &str) -> Result<Self> {
        let location = parse_location(connection_string)?;
        if location == MEMORY {
            return Err(Error::config(
                "An in-memory database cannot be opened read-only",
            ));
        }

        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(&location, config).map_err(|e| {
            Error::config(format!("Failed to open DuckDB database '{location}': {e}"))
        })?;

        Ok(Self { conn, location })
    }

    /// Path of the database, or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Replace a table with the given rows and index it on `quarter`
    ///
    /// Returns the number of rows written. Any failure rolls the table back
    /// to its previous state and surfaces as `Persistence`.
    pub fn replace_table(&mut self, table: &Table) -> Result<usize> {
        let name = table.name();
        self.try_replace(table)
            .map_err(|e| Error::persistence(name, e.to_string()))?;

        tracing::debug!(table = name, rows = table.len(), "Replaced table");
        Ok(table.len())
    }

    fn try_replace(&mut self, table: &Table) -> duckdb::Result<()> {
        let schema = table.schema();
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table_ident}; CREATE TABLE {table_ident} ({columns});",
            table_ident = quote_ident(schema.name),
            columns = column_definitions(schema),
        ))?;

        {
            let mut stmt = tx.prepare(&insert_sql(schema))?;
            for row in table.rows() {
                stmt.execute(params_from_iter(row.values()))?;
            }
        }

        tx.execute_batch(&format!(
            "CREATE INDEX {} ON {} (\"quarter\");",
            quote_ident(&index_name(schema.name)),
            quote_ident(schema.name),
        ))?;

        tx.commit()
    }

    /// Names of all tables present in the database
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = 'main'
             ORDER BY table_name",
        )?;

        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tables)
    }

    /// Whether a table has been written
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'main' AND table_name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether an index exists
    pub fn has_index(&self, index: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM duckdb_indexes() WHERE index_name = ?",
            [index],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Row count of a registered table
    pub fn row_count(&self, name: &str) -> Result<usize> {
        let schema = self.registered(name)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(schema.name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Every registered table with its columns and stored row count
    pub fn describe_tables(&self) -> Result<Vec<TableInfo>> {
        Extractor::ALL
            .into_iter()
            .map(|extractor| {
                let schema = extractor.schema();
                let rows = if self.has_table(schema.name)? {
                    Some(self.row_count(schema.name)?)
                } else {
                    None
                };
                Ok(TableInfo {
                    name: schema.name,
                    columns: schema.columns,
                    rows,
                })
            })
            .collect()
    }

    /// Read rows of a registered table, ordered by year and quarter
    ///
    /// Only names of registered extractors are accepted; filter values are
    /// bound as parameters.
    pub fn query_table(&self, name: &str, filter: &QueryFilter) -> Result<Vec<JsonValue>> {
        let schema = self.registered(name)?;
        if !self.has_table(schema.name)? {
            return Err(Error::TableNotFound {
                table: name.to_string(),
            });
        }

        let mut conditions = Vec::new();
        let mut params: Vec<Scalar> = Vec::new();

        if let Some(year) = filter.year {
            conditions.push("\"year\" = ?");
            params.push(year.into());
        }
        if let Some(quarter) = filter.quarter {
            conditions.push("\"quarter\" = ?");
            params.push(quarter.into());
        }
        if let Some(state) = &filter.state {
            if !schema.has_column("state") {
                return Err(Error::invalid_value(
                    "state",
                    format!("table '{name}' has no state column"),
                ));
            }
            conditions.push("\"state\" = ?");
            params.push(StateName::new(state).into_string().into());
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            select_list(schema),
            quote_ident(schema.name)
        );
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY \"year\", \"quarter\", rowid");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        tracing::debug!(sql = %sql, "Executing query");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let mut record = serde_json::Map::new();
            for (idx, column) in schema.columns.iter().enumerate() {
                let value: Value = row.get(idx)?;
                record.insert(column.name.to_string(), duckdb_value_to_json(value));
            }
            records.push(JsonValue::Object(record));
        }

        Ok(records)
    }

    fn registered(&self, name: &str) -> Result<&'static TableSchema> {
        Extractor::from_table_name(name)
            .map(Extractor::schema)
            .ok_or_else(|| Error::TableNotFound {
                table: name.to_string(),
            })
    }
}

impl ToSql for Scalar {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Scalar::Int(i) => ToSqlOutput::from(*i),
            Scalar::Float(f) => ToSqlOutput::from(*f),
            Scalar::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// Index created on every table's `quarter` column
pub fn index_name(table: &str) -> String {
    format!("idx_{table}_quarter")
}

fn parse_location(connection_string: &str) -> Result<String> {
    let location = connection_string
        .trim()
        .strip_prefix(URL_PREFIX)
        .unwrap_or(connection_string.trim());

    if location.is_empty() {
        return Err(Error::invalid_value(
            "database",
            "connection string is empty",
        ));
    }
    Ok(location.to_string())
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_definitions(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| format!("{} {} NOT NULL", quote_ident(c.name), c.column_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_list(schema: &TableSchema) -> String {
    schema
        .column_names()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql(schema: &TableSchema) -> String {
    let placeholders = vec!["?"; schema.columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(schema.name),
        select_list(schema)
    )
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::from(i),
        Value::SmallInt(i) => JsonValue::from(i),
        Value::Int(i) => JsonValue::from(i),
        Value::BigInt(i) => JsonValue::from(i),
        Value::HugeInt(i) => JsonValue::String(i.to_string()),
        Value::UTinyInt(i) => JsonValue::from(i),
        Value::USmallInt(i) => JsonValue::from(i),
        Value::UInt(i) => JsonValue::from(i),
        Value::UBigInt(i) => JsonValue::from(i),
        Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        Value::Double(f) => serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(s) => JsonValue::String(s),
        other => JsonValue::String(format!("{other:?}")),
    }
}
