//! API route handlers.
//!
//! Handlers only move data between HTTP and `app::pipeline`; all validation and
//! transformation happens there.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::app::pipeline::{self, Products};
use crate::data::SnapshotStore;
use crate::domain::{ProductForecast, ProductSales, UploadSummary};
use crate::error::AppError;

/// Multipart form field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Errors render as `{ "detail": "..." }` with the status chosen by `AppError`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.message() }))).into_response()
    }
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `POST /api/upload` - multipart upload of a CSV export.
pub async fn upload(State(store): State<SnapshotStore>, multipart: Multipart) -> Result<Json<UploadSummary>, AppError> {
    let (filename, bytes) = read_file_field(multipart).await?;
    // Decoding and typing a large export is CPU-bound; keep it off the async workers.
    let summary = tokio::task::spawn_blocking(move || pipeline::upload(&store, &bytes, &filename))
        .await
        .map_err(|e| AppError::io(format!("Upload task failed: {e}")))??;
    Ok(Json(summary))
}

/// `GET /api/products`
pub async fn products(State(store): State<SnapshotStore>) -> Result<Json<Products>, AppError> {
    Ok(Json(pipeline::products(&store)?))
}

/// `GET /api/sales-history`
pub async fn sales_history(State(store): State<SnapshotStore>) -> Result<Json<Vec<ProductSales>>, AppError> {
    Ok(Json(pipeline::sales_history(&store)?))
}

/// `GET /api/forecast`
pub async fn forecast(State(store): State<SnapshotStore>) -> Result<Json<Vec<ProductForecast>>, AppError> {
    Ok(Json(pipeline::forecast(&store)?))
}

/// Pull the first `file` field out of the form, ignoring any other fields.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read uploaded file: {e}")))?;
        return Ok((filename, bytes));
    }

    Err(AppError::bad_request(format!("Missing form field '{FILE_FIELD}'")))
}
