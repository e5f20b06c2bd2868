//! HTTP server for package provenance lookups.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/get_package/{package_id}` | Full provenance tree for a package |
//! | `GET`  | `/health` | Health check (returns service title and version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": "Package not found" }
//! ```
//!
//! `404` when the package does not exist, `500` when the document store
//! fails. Missing retailers, farms, herbs or processing records are not
//! errors; they show up as empty values in a `200` response.
//!
//! # CORS
//!
//! Origins come from `[server].allowed_origins`; methods and headers are
//! unrestricted so the mobile client can call the API directly.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use herbtrace_core::{resolve, DocumentStore, ProvenanceResult};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
}

/// Starts the HTTP server on `[server].bind` backed by the SQLite store.
///
/// The pool is opened (and the schema applied) before binding, and closed
/// after the server drains on Ctrl-C.
pub async fn run_server(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;
    let store = Arc::new(SqliteStore::new(pool));

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        title = %config.api.title,
        version = %config.api.version,
        "server listening"
    );
    println!("{} listening on http://{}", config.api.title, config.server.bind);

    let result = serve(
        listener,
        Arc::new(config.clone()),
        store.clone(),
        shutdown_signal(),
    )
    .await;

    store.close().await;
    tracing::info!("server stopped");
    result
}

/// Serve requests on an already-bound listener until `shutdown` resolves.
///
/// Used by [`run_server`] and by tests that supply their own store.
pub async fn serve<F>(
    listener: TcpListener,
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(config, store);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Build the application router.
pub fn router(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Router {
    let cors = cors_layer(&config);
    let state = AppState { config, store };

    Router::new()
        .route("/get_package/{package_id}", get(handle_get_package))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.server.allows_any_origin() {
        AllowOrigin::any()
    } else {
        // Invalid origins are rejected by config validation.
        AllowOrigin::list(
            config
                .server
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.config.api.title.clone(),
        version: state.config.api.version.clone(),
    })
}

// ============ GET /get_package/{package_id} ============

/// Handler for `GET /get_package/{package_id}`.
///
/// Returns `200` with the provenance tree, `404` if the package does not
/// exist, and `500` if the store fails.
async fn handle_get_package(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<Json<ProvenanceResult>, AppError> {
    match resolve(state.store.as_ref(), &package_id).await {
        Ok(Some(provenance)) => Ok(Json(provenance)),
        Ok(None) => {
            tracing::debug!(%package_id, "package not found");
            Err(not_found("Package not found"))
        }
        Err(e) => {
            let message = format!("{:#}", e);
            tracing::error!(%package_id, error = %message, "provenance lookup failed");
            Err(internal(message))
        }
    }
}
