//! HTTP binding for the pipeline.
//!
//! ## Routes
//!
//! - `POST /api/upload` - multipart upload, file in the `file` field
//! - `GET /api/products` - raw records
//! - `GET /api/sales-history` - monthly history per product
//! - `GET /api/forecast` - 12-month projection per product
//! - `GET /health` - liveness

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::data::SnapshotStore;
use crate::domain::ServerConfig;
use crate::error::AppError;

pub mod routes;

/// All API routes are served under this prefix so a frontend can proxy them.
pub const API_PREFIX: &str = "/api";

/// Build the axum `Router` over the given store.
pub fn router(store: SnapshotStore, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/upload", post(routes::upload))
        .route("/products", get(routes::products))
        .route("/sales-history", get(routes::sales_history))
        .route("/forecast", get(routes::forecast))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    Router::new()
        .route("/health", get(routes::liveness))
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(store)
}

/// Serve the API until Ctrl-C.
pub async fn serve(config: ServerConfig, store: SnapshotStore) -> Result<(), AppError> {
    let app = router(store, &config);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::io(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("skulytics v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::io(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
