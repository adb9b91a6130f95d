//! Shared upload/query pipeline used by both the HTTP binding and the CLI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! decode -> validate -> store, and later store -> reshape / forecast.
//!
//! The front-ends then only deal with transport (multipart + JSON, or files +
//! terminal output).

use std::sync::Arc;

use serde::Serialize;

use crate::data::SnapshotStore;
use crate::domain::{ProductForecast, ProductSales, Snapshot, UploadSummary};
use crate::error::AppError;
use crate::io::{decode, validate};

/// Upload: decode -> validate -> replace the held snapshot.
///
/// Any failure leaves the previously held snapshot untouched.
pub fn upload(store: &SnapshotStore, bytes: &[u8], filename: &str) -> Result<UploadSummary, AppError> {
    let table = decode(bytes, filename).inspect_err(|e| {
        tracing::warn!(filename, error = %e, "upload rejected while decoding");
    })?;
    let encoding = table.encoding;

    let validated = validate(table).inspect_err(|e| {
        tracing::warn!(filename, error = %e, "upload rejected by schema validation");
    })?;
    let months = validated.month_columns.len();

    let rows = store.put(validated);
    tracing::info!(filename, rows, months, encoding = encoding.label(), "upload accepted");

    Ok(UploadSummary {
        message: "File uploaded successfully".to_string(),
        rows,
        encoding,
    })
}

/// Raw product records, every original column preserved.
pub fn products(store: &SnapshotStore) -> Result<Products, AppError> {
    Ok(Products(store.get()?))
}

/// Monthly sales history per product.
pub fn sales_history(store: &SnapshotStore) -> Result<Vec<ProductSales>, AppError> {
    let snapshot = store.get()?;
    crate::report::reshape(&snapshot)
}

/// Naive 12-month forecast per product.
pub fn forecast(store: &SnapshotStore) -> Result<Vec<ProductForecast>, AppError> {
    let snapshot = store.get()?;
    crate::forecast::forecast(&snapshot)
}

/// Serializable view of the held records as a JSON array of flat objects.
///
/// Holds its own handle, so a concurrent upload cannot change what gets
/// serialized.
#[derive(Debug, Clone)]
pub struct Products(Arc<Snapshot>);

impl Serialize for Products {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.records())
    }
}
