//! Tests for store module

use super::*;
use crate::error::Error;
use crate::extract::Extractor;
use crate::output::Table;
use crate::types::{Coordinates, StateName};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn map_user_table(entries: &[(i32, u8, &str, &str, i64)]) -> Table {
    let extractor = Extractor::MapUserHoverState;
    let mut table = Table::new(extractor);
    for (year, quarter, state, district, users) in entries {
        let payload = json!({"data": {"hoverData": {district.to_string(): {"registeredUsers": users}}}});
        let coords = Coordinates::state(*year, *quarter, StateName::new(state));
        table
            .append(extractor.extract(&payload, &coords).unwrap())
            .unwrap();
    }
    table
}

fn sample_table() -> Table {
    map_user_table(&[
        (2019, 2, "goa", "north goa", 20),
        (2018, 1, "karnataka", "mysuru", 10),
        (2019, 1, "karnataka", "bengaluru urban", 30),
        (2018, 3, "goa", "south goa", 5),
    ])
}

#[test]
fn test_replace_table_creates_table_and_index() {
    let mut store = Store::open(":memory:").unwrap();
    let table = sample_table();

    assert_eq!(store.replace_table(&table).unwrap(), 4);
    assert!(store.has_table("map-user-hover-state").unwrap());
    assert!(store
        .has_index(&index_name("map-user-hover-state"))
        .unwrap());
    assert_eq!(store.row_count("map-user-hover-state").unwrap(), 4);
    assert_eq!(store.list_tables().unwrap(), vec!["map-user-hover-state"]);
}

#[test]
fn test_replace_table_is_idempotent() {
    let mut store = Store::open(":memory:").unwrap();
    let table = sample_table();

    store.replace_table(&table).unwrap();
    let first = store
        .query_table(table.name(), &QueryFilter::new())
        .unwrap();
    store.replace_table(&table).unwrap();
    let second = store
        .query_table(table.name(), &QueryFilter::new())
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.row_count(table.name()).unwrap(), 4);
}

#[test]
fn test_replace_table_drops_old_rows() {
    let mut store = Store::open(":memory:").unwrap();
    store.replace_table(&sample_table()).unwrap();

    let smaller = map_user_table(&[(2022, 4, "kerala", "kollam", 1)]);
    store.replace_table(&smaller).unwrap();

    let rows = store
        .query_table(smaller.name(), &QueryFilter::new())
        .unwrap();
    assert_eq!(
        rows,
        vec![json!({
            "year": 2022,
            "quarter": 4,
            "state": "Kerala",
            "districts_name": "Kollam",
            "registered_users": 1
        })]
    );
}

#[test]
fn test_replace_empty_table() {
    let mut store = Store::open(":memory:").unwrap();
    let table = Table::new(Extractor::TopUserCountry);
    assert_eq!(store.replace_table(&table).unwrap(), 0);
    assert_eq!(store.row_count("top-user-country").unwrap(), 0);
}

#[test]
fn test_query_orders_by_year_and_quarter() {
    let mut store = Store::open(":memory:").unwrap();
    store.replace_table(&sample_table()).unwrap();

    let rows = store
        .query_table("map-user-hover-state", &QueryFilter::new())
        .unwrap();
    let periods: Vec<_> = rows
        .iter()
        .map(|r| (r["year"].as_i64().unwrap(), r["quarter"].as_i64().unwrap()))
        .collect();
    assert_eq!(periods, vec![(2018, 1), (2018, 3), (2019, 1), (2019, 2)]);
}

#[test]
fn test_query_filters() {
    let mut store = Store::open(":memory:").unwrap();
    store.replace_table(&sample_table()).unwrap();
    let name = "map-user-hover-state";

    let rows = store
        .query_table(name, &QueryFilter::new().with_year(2019))
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = store
        .query_table(name, &QueryFilter::new().with_year(2018).with_quarter(3))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["districts_name"], json!("South Goa"));

    // Filter values are normalized like the stored names
    let rows = store
        .query_table(name, &QueryFilter::new().with_state("karnataka"))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["state"] == json!("Karnataka")));

    let rows = store
        .query_table(name, &QueryFilter::new().with_limit(1))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["year"], json!(2018));
}

#[test]
fn test_query_state_filter_on_country_table() {
    let mut store = Store::open(":memory:").unwrap();
    let table = Table::new(Extractor::TopUserCountry);
    store.replace_table(&table).unwrap();

    let err = store
        .query_table(table.name(), &QueryFilter::new().with_state("goa"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[test]
fn test_query_rejects_unregistered_names() {
    let store = Store::open(":memory:").unwrap();

    let err = store
        .query_table("users\"; DROP TABLE x; --", &QueryFilter::new())
        .unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));

    // Registered but not yet written
    let err = store
        .query_table("top-user-state", &QueryFilter::new())
        .unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));
}

#[test]
fn test_describe_tables() {
    let mut store = Store::open(":memory:").unwrap();
    store.replace_table(&sample_table()).unwrap();

    let tables = store.describe_tables().unwrap();
    assert_eq!(tables.len(), Extractor::ALL.len());

    let loaded = tables
        .iter()
        .find(|t| t.name == "map-user-hover-state")
        .unwrap();
    assert_eq!(loaded.rows, Some(4));
    assert_eq!(loaded.columns.len(), 5);

    let missing = tables.iter().find(|t| t.name == "top-user-state").unwrap();
    assert_eq!(missing.rows, None);
}

#[test]
fn test_file_store_read_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pulse.duckdb");
    let conn = format!("duckdb://{}", path.display());

    {
        let mut store = Store::open(&conn).unwrap();
        store.replace_table(&sample_table()).unwrap();
    }

    let store = Store::open_read_only(&conn).unwrap();
    assert_eq!(store.location(), path.display().to_string());
    assert_eq!(store.row_count("map-user-hover-state").unwrap(), 4);
}

#[test]
fn test_read_only_rejects_memory() {
    assert!(matches!(
        Store::open_read_only(":memory:"),
        Err(Error::Config { .. })
    ));
}

#[test]
fn test_read_only_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.duckdb");
    assert!(Store::open_read_only(&path.display().to_string()).is_err());
}
