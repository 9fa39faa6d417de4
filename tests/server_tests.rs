//! HTTP query API tests
//!
//! Ingests a small tree into a DuckDB file, then drives the router with
//! in-process requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pulse_etl::cli::{build_router, ServerConfig};
use pulse_etl::{ingest, PipelineConfig, Store};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn write_json(root: &Path, relative: &str, value: &Value) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

fn hover(districts: &[(&str, i64)]) -> Value {
    let data: serde_json::Map<String, Value> = districts
        .iter()
        .map(|(name, users)| {
            (
                (*name).to_string(),
                json!({"registeredUsers": users, "appOpens": 0}),
            )
        })
        .collect();
    json!({"data": {"hoverData": data}})
}

/// Database holding `map-user-hover-state` for two states over two quarters
fn loaded_database() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    let base = "map/user/hover/country/india/state";

    write_json(&data, &format!("{base}/kerala/2022/1.json"), &hover(&[("ernakulam", 10)]));
    write_json(&data, &format!("{base}/kerala/2022/2.json"), &hover(&[("ernakulam", 12)]));
    write_json(
        &data,
        &format!("{base}/west-bengal/2022/1.json"),
        &hover(&[("kolkata", 40), ("howrah", 25)]),
    );

    let database = dir.path().join("pulse.duckdb").display().to_string();
    let mut store = Store::open(&database).unwrap();
    ingest(
        PipelineConfig::new(&data).with_database(database.clone()),
        &mut store,
    )
    .unwrap();

    (dir, database)
}

async fn get(database: &str, uri: &str) -> (StatusCode, Value) {
    let app = build_router(ServerConfig {
        database: database.to_string(),
    });

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (_dir, database) = loaded_database();
    let (status, body) = get(&database, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_tables_reports_row_counts() {
    let (_dir, database) = loaded_database();
    let (status, body) = get(&database, "/tables").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let tables = body["data"]["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 18);

    let hover = tables
        .iter()
        .find(|t| t["name"] == "map-user-hover-state")
        .unwrap();
    assert_eq!(hover["rows"], json!(4));

    let unwritten = tables
        .iter()
        .find(|t| t["name"] == "top-user-country")
        .unwrap();
    assert_eq!(unwritten["rows"], Value::Null);
}

#[tokio::test]
async fn test_query_table_with_filters() {
    let (_dir, database) = loaded_database();
    let (status, body) = get(
        &database,
        "/tables/map-user-hover-state?state=west-bengal&quarter=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["table"], json!("map-user-hover-state"));
    assert_eq!(body["data"]["count"], json!(2));

    let rows = body["data"]["rows"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["state"] == "West Bengal"));
    let mut districts: Vec<&str> = rows
        .iter()
        .map(|r| r["districts_name"].as_str().unwrap())
        .collect();
    districts.sort_unstable();
    assert_eq!(districts, vec!["Howrah", "Kolkata"]);
}

#[tokio::test]
async fn test_query_table_with_limit() {
    let (_dir, database) = loaded_database();
    let (status, body) = get(&database, "/tables/map-user-hover-state?year=2022&limit=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], json!(1));
    assert_eq!(body["data"]["rows"][0]["quarter"], json!(1));
}

#[tokio::test]
async fn test_unknown_table_is_not_found() {
    let (_dir, database) = loaded_database();
    let (status, body) = get(&database, "/tables/payments").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("payments"));
}

#[tokio::test]
async fn test_unwritten_table_is_not_found() {
    let (_dir, database) = loaded_database();
    let (status, _) = get(&database, "/tables/top-user-country").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Database holding country-level `map-user-hover-country` and `top-user-country`
fn country_database() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    write_json(
        &data,
        "map/user/hover/country/india/2022/1.json",
        &hover(&[("kerala", 100), ("tamil-nadu", 80)]),
    );
    write_json(
        &data,
        "top/user/country/india/2022/1.json",
        &json!({"data": {
            "states": [{"name": "kerala", "registeredUsers": 100}],
            "districts": [],
            "pincodes": []
        }}),
    );

    let database = dir.path().join("pulse.duckdb").display().to_string();
    let mut store = Store::open(&database).unwrap();
    ingest(
        PipelineConfig::new(&data).with_database(database.clone()),
        &mut store,
    )
    .unwrap();

    (dir, database)
}

#[tokio::test]
async fn test_state_filter_on_country_map_table() {
    let (_dir, database) = country_database();
    let (status, body) = get(&database, "/tables/map-user-hover-country?state=tamil-nadu").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], json!(1));
    assert_eq!(
        body["data"]["rows"][0],
        json!({"year": 2022, "quarter": 1, "state": "Tamil Nadu", "registered_users": 80})
    );
}

#[tokio::test]
async fn test_state_filter_on_table_without_state_is_rejected() {
    let (_dir, database) = country_database();
    let (status, body) = get(&database, "/tables/top-user-country?state=kerala").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("state"));
}
