//! Naive per-product sales forecast.
//!
//! Structure:
//! - `calendar`: `YYYY-MM` parsing and calendar-month arithmetic
//! - `projection`: the fixed-ratio projection anchored on the last month column

pub mod calendar;
pub mod projection;

pub use calendar::YearMonth;
pub use projection::{HORIZON, MONTHLY_GROWTH, forecast, project};
