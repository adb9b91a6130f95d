//! Fixed-ratio forecast projection.
//!
//! Every product is projected from a single anchor: its value in the last month
//! column. For step `i` in `1..=12` the projected value is
//! `anchor × 1.5^i`, rounded to cents, labelled with the anchor month advanced by
//! `i` calendar months. The rest of the history is not used.

use crate::domain::{ForecastPoint, ProductForecast, Record, Snapshot};
use crate::error::AppError;
use crate::forecast::calendar::YearMonth;

/// Number of projected months per product.
pub const HORIZON: u32 = 12;

/// Month-over-month growth factor (+50%).
pub const MONTHLY_GROWTH: f64 = 1.5;

/// Project every record in the snapshot.
pub fn forecast(snapshot: &Snapshot) -> Result<Vec<ProductForecast>, AppError> {
    if snapshot.is_empty() {
        return Ok(Vec::new());
    }

    let anchor_key = snapshot
        .last_month_key()
        .ok_or_else(|| AppError::invalid_month_format(""))?;
    let anchor: YearMonth = anchor_key.parse()?;
    let labels = horizon_labels(anchor)?;

    snapshot
        .records()
        .map(|record| product_forecast(record, &labels))
        .collect()
}

fn product_forecast(record: Record<'_>, labels: &[String]) -> Result<ProductForecast, AppError> {
    let (month, cell) = record
        .last_month()
        .ok_or_else(|| AppError::invalid_month_format(""))?;
    let anchor_value = cell
        .as_f64()
        .ok_or_else(|| AppError::malformed_value(record.sku(), month))?;

    Ok(ProductForecast {
        sku: record.sku(),
        name: record.name(),
        forecast: project_values(anchor_value, labels),
    })
}

/// Project a single anchor value over `HORIZON` months.
pub fn project(anchor: YearMonth, anchor_value: f64) -> Result<Vec<ForecastPoint>, AppError> {
    let labels = horizon_labels(anchor)?;
    Ok(project_values(anchor_value, &labels))
}

fn horizon_labels(anchor: YearMonth) -> Result<Vec<String>, AppError> {
    (1..=HORIZON)
        .map(|step| {
            anchor
                .add_months(step)
                .map(|ym| ym.to_string())
                .ok_or_else(|| AppError::invalid_month_format(anchor.to_string()))
        })
        .collect()
}

fn project_values(anchor_value: f64, labels: &[String]) -> Vec<ForecastPoint> {
    labels
        .iter()
        .zip(1..)
        .map(|(month, step)| ForecastPoint {
            month: month.clone(),
            value: round_cents(anchor_value * MONTHLY_GROWTH.powi(step)),
        })
        .collect()
}

/// Round to two decimal places, ties to even on the exact binary value.
///
/// Formatting with a fixed precision is correctly rounded, and parsing the
/// result back returns the nearest `f64` to that decimal.
pub fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
