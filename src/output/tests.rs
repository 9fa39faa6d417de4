//! Tests for output module

use super::*;
use crate::extract::{Extractor, FlatRecord, Scalar};
use arrow::array::{Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use crate::types::Coordinates;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs::File;
use tempfile::tempdir;

fn string_column(batch: &RecordBatch, name: &str) -> Vec<String> {
    batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
        .iter()
        .map(|v| v.unwrap().to_string())
        .collect()
}

fn insurance_rows(names: &[&str]) -> Vec<FlatRecord> {
    let payload = json!({
        "data": {
            "transactionData": names
                .iter()
                .enumerate()
                .map(|(i, name)| json!({
                    "name": name,
                    "paymentInstruments": [{"count": i + 1, "amount": (i as f64) * 10.5}]
                }))
                .collect::<Vec<_>>()
        }
    });
    Extractor::AggregatedInsuranceCountry
        .extract(&payload, &Coordinates::country(2022, 3))
        .unwrap()
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_arrow_schema_types() {
    let schema = arrow_schema(Extractor::AggregatedUserState.schema());

    assert_eq!(schema.fields().len(), 8);
    assert_eq!(schema.field(0).name(), "state");
    assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
    assert_eq!(
        schema.field_with_name("registered_users").unwrap().data_type(),
        &DataType::Int64
    );
    assert_eq!(
        schema.field_with_name("percentage").unwrap().data_type(),
        &DataType::Float64
    );
    assert!(schema.fields().iter().all(|f| !f.is_nullable()));
}

#[test]
fn test_records_to_batch_round_trip() {
    let rows = insurance_rows(&["INSURANCE", "Other"]);
    let batch = records_to_batch(Extractor::AggregatedInsuranceCountry.schema(), &rows).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 5);

    let names = string_column(&batch, "name");
    assert_eq!(names, vec!["INSURANCE", "Other"]);
    let counts = batch
        .column_by_name("count")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(counts.values().to_vec(), vec![1, 2]);
}

#[test]
fn test_records_to_batch_empty() {
    let batch = records_to_batch(Extractor::TopUserState.schema(), &[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 6);
}

#[test]
fn test_records_to_batch_rejects_foreign_rows() {
    let rows = insurance_rows(&["INSURANCE"]);
    let err = records_to_batch(Extractor::AggregatedTransactionCountry.schema(), &rows).unwrap_err();
    assert!(err.to_string().contains("aggregated-insurance-country"));
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_accumulates_in_order() {
    let mut table = Table::new(Extractor::AggregatedInsuranceCountry);
    assert!(table.is_empty());
    assert_eq!(table.name(), "aggregated-insurance-country");

    table.append(insurance_rows(&["A", "B"])).unwrap();
    table.append(Vec::new()).unwrap();
    table.append(insurance_rows(&["C"])).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.sources(), 3);
    let names: Vec<_> = table
        .rows()
        .iter()
        .filter_map(|r| r.get("name").and_then(Scalar::as_str).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(table.rows()[2].to_json()["name"], json!("C"));
}

#[test]
fn test_table_rejects_other_schema() {
    let mut table = Table::new(Extractor::AggregatedTransactionCountry);
    assert!(table.append(insurance_rows(&["A"])).is_err());
    assert_eq!(table.sources(), 0);
}

// ============================================================================
// Parquet Tests
// ============================================================================

#[test]
fn test_parquet_writer_config() {
    let config = ParquetWriterConfig::new().with_row_group_size(10).zstd();
    assert_eq!(config.row_group_size(), 10);
    assert!(matches!(
        config.compression(),
        parquet::basic::Compression::ZSTD(_)
    ));
}

#[test]
fn test_write_table_parquet() {
    let dir = tempdir().unwrap();
    let mut table = Table::new(Extractor::AggregatedInsuranceCountry);
    table.append(insurance_rows(&["INSURANCE", "Other", "Third"])).unwrap();

    let path = write_table_parquet(
        dir.path().join("exports"),
        &table,
        &ParquetWriterConfig::default(),
    )
    .unwrap();
    assert_eq!(
        path.file_name().unwrap(),
        "aggregated-insurance-country.parquet"
    );

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(Result::unwrap).collect();
    assert_eq!(batches.iter().map(RecordBatch::num_rows).sum::<usize>(), 3);
    assert_eq!(
        string_column(&batches[0], "name"),
        vec!["INSURANCE", "Other", "Third"]
    );
}

#[test]
fn test_write_table_parquet_uses_configured_compression() {
    let dir = tempdir().unwrap();
    let mut table = Table::new(Extractor::AggregatedInsuranceCountry);
    table.append(insurance_rows(&["INSURANCE"])).unwrap();

    let path = write_table_parquet(dir.path(), &table, &ParquetWriterConfig::new().zstd()).unwrap();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    let column = builder.metadata().row_group(0).column(0);
    assert!(matches!(
        column.compression(),
        parquet::basic::Compression::ZSTD(_)
    ));
}

#[test]
fn test_parquet_writer_counts_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rows.parquet");
    let batch = records_to_batch(
        Extractor::AggregatedInsuranceCountry.schema(),
        &insurance_rows(&["A", "B"]),
    )
    .unwrap();

    let mut writer = ParquetWriter::new(&path, batch.schema().as_ref(), &ParquetWriterConfig::new())
        .unwrap();
    writer.write(&batch).unwrap();
    writer.write(&batch).unwrap();
    assert_eq!(writer.close().unwrap(), 4);
}

#[test]
fn test_write_table_parquet_reports_unusable_directory() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("exports");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut table = Table::new(Extractor::AggregatedInsuranceCountry);
    table.append(insurance_rows(&["INSURANCE"])).unwrap();

    let err = write_table_parquet(&blocker, &table, &ParquetWriterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to create export directory"));
}
