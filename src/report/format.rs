//! Formatted terminal output for `skulytics inspect`.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation concerns and output changes are localized.

use crate::domain::{ProductForecast, Snapshot, TextEncoding};

/// Format a short summary of a parsed export plus a per-product forecast table.
pub fn format_summary(
    filename: &str,
    encoding: TextEncoding,
    snapshot: &Snapshot,
    forecasts: &[ProductForecast],
) -> String {
    let mut out = String::new();

    out.push_str("=== skulytics - export summary ===\n");
    out.push_str(&format!("File: {filename} ({})\n", encoding.label()));
    out.push_str(&format!(
        "Products: {} | columns: {}\n",
        snapshot.len(),
        snapshot.columns().len()
    ));

    let months: Vec<&str> = snapshot.month_keys().collect();
    if let (Some(first), Some(last)) = (months.first(), months.last()) {
        out.push_str(&format!("Months: {} ({first} .. {last})\n", months.len()));
        out.push_str(&format!("Forecast anchor: {last}\n"));
    }

    out.push('\n');
    out.push_str(&format_forecast_table(forecasts));
    out
}

fn format_forecast_table(forecasts: &[ProductForecast]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<16} {:<28} {:>12} {:>14} {:>14}\n",
            "SKU", "Name", "next", "+12m", "12m total"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<28} {:-<12} {:-<14} {:-<14}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for product in forecasts {
        let next = product.forecast.first().map(|p| p.value).unwrap_or(0.0);
        let last = product.forecast.last().map(|p| p.value).unwrap_or(0.0);
        let total: f64 = product.forecast.iter().map(|p| p.value).sum();
        out.push_str(
            format!(
                "{:<16} {:<28} {:>12.2} {:>14.2} {:>14.2}\n",
                truncate(&product.sku, 16),
                truncate(&product.name, 28),
                next,
                last,
                total
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
