//! Arrow schema derivation and record conversion
//!
//! Every table has a fixed schema, so Arrow schemas are derived directly
//! from the `TableSchema` rather than inferred from the data.

use crate::error::{Error, Result};
use crate::extract::{ColumnType, FlatRecord, Scalar, TableSchema};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Arrow schema of a table; every column is non-nullable
pub fn arrow_schema(schema: &TableSchema) -> Schema {
    let fields: Vec<Field> = schema
        .columns
        .iter()
        .map(|column| Field::new(column.name, arrow_type(column.column_type), false))
        .collect();
    Schema::new(fields)
}

fn arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Text => DataType::Utf8,
    }
}

/// Convert records of one table to a RecordBatch
///
/// All records must have been built for `schema`.
pub fn records_to_batch(schema: &'static TableSchema, records: &[FlatRecord]) -> Result<RecordBatch> {
    if let Some(other) = records.iter().find(|r| r.schema() != schema) {
        return Err(Error::output(format!(
            "Record for '{}' cannot be written to '{}'",
            other.schema().name,
            schema.name
        )));
    }

    let arrays: Vec<ArrayRef> = schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| build_array(records, idx, column.column_type))
        .collect();

    Ok(RecordBatch::try_new(
        Arc::new(arrow_schema(schema)),
        arrays,
    )?)
}

/// Build one column array from the records
fn build_array(records: &[FlatRecord], idx: usize, column_type: ColumnType) -> ArrayRef {
    let cells = records.iter().map(|r| &r.values()[idx]);
    match column_type {
        ColumnType::Integer => Arc::new(cells.map(Scalar::as_i64).collect::<Int64Array>()),
        ColumnType::Float => Arc::new(cells.map(Scalar::as_f64).collect::<Float64Array>()),
        ColumnType::Text => Arc::new(cells.map(Scalar::as_str).collect::<StringArray>()),
    }
}
