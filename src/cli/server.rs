//! HTTP server mode: read-only query API over the loaded tables

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::store::{QueryFilter, Store};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// DuckDB file or duckdb:// URL, opened read-only per request
    pub database: String,
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    config: ServerConfig,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router with CORS and request tracing
pub fn build_router(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tables", get(list_tables))
        .route("/tables/:name", get(query_table))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { config }))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let app = build_router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Registered tables with their columns and stored row counts
async fn list_tables(State(state): State<Arc<AppState>>) -> Response {
    let database = state.config.database.clone();
    let result = with_store(database, |store| store.describe_tables()).await;

    match result {
        Ok(tables) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({ "tables": tables }))),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Rows of one table, filtered by `year`, `quarter`, `state` and `limit`
async fn query_table(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(filter): Query<QueryFilter>,
) -> Response {
    let database = state.config.database.clone();
    let table = name.clone();
    let result = with_store(database, move |store| store.query_table(&table, &filter)).await;

    match result {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({
                "table": name,
                "count": rows.len(),
                "rows": rows
            }))),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Open the store read-only on the blocking pool and run `f`
async fn with_store<T, F>(database: String, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let store = Store::open_read_only(&database)?;
        f(&store)
    })
    .await
    .map_err(|e| Error::Other(format!("Query task failed: {e}")))?
}

fn error_response(error: &Error) -> Response {
    let status = match error {
        Error::TableNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidConfigValue { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Query failed: {error}");
    }
    (status, Json(ApiResponse::<()>::error(error.to_string()))).into_response()
}
