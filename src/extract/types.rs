//! Row and table schema types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Serialize, Serializer};
use std::fmt;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    /// DuckDB column type
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Float => "DOUBLE",
            ColumnType::Text => "VARCHAR",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Integer,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Float,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Text,
        }
    }
}

/// Fixed schema of one output table
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Position of a column by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Scalar::Int(_) => ColumnType::Integer,
            Scalar::Float(_) => ColumnType::Float,
            Scalar::Text(_) => ColumnType::Text,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Int(i) => JsonValue::from(*i),
            Scalar::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
            }
            Scalar::Text(s) => JsonValue::String(s.clone()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<u8> for Scalar {
    fn from(v: u8) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

/// One output row, bound to the schema it was built for
///
/// Construction checks that there is exactly one value per schema column
/// and that each value has the column's type, so every record of a table
/// carries identical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    schema: &'static TableSchema,
    values: Vec<Scalar>,
}

impl FlatRecord {
    /// Build a record, validating it against the schema
    pub fn new(schema: &'static TableSchema, values: Vec<Scalar>) -> Result<Self> {
        if values.len() != schema.columns.len() {
            return Err(Error::invalid_row(
                schema.name,
                format!(
                    "{} values for {} columns",
                    values.len(),
                    schema.columns.len()
                ),
            ));
        }

        for (column, value) in schema.columns.iter().zip(&values) {
            if column.column_type != value.column_type() {
                return Err(Error::invalid_row(
                    schema.name,
                    format!(
                        "column '{}' is {} but got {}",
                        column.name,
                        column.column_type,
                        value.column_type()
                    ),
                ));
            }
        }

        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> {
        self.schema.columns.iter().map(|c| c.name)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    /// Value of a column by name
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.schema.position(column).map(|i| &self.values[i])
    }

    /// Render as a JSON object keyed by column name
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .columns()
            .zip(&self.values)
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        JsonValue::Object(map)
    }
}
