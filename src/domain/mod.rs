//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - typed table values and decoded tables (`Cell`, `Table`, `ValidatedTable`)
//! - the held snapshot and its record views (`Snapshot`, `Record`)
//! - response payloads (`ProductSales`, `ProductForecast`, `UploadSummary`)

pub mod types;

pub use types::*;
