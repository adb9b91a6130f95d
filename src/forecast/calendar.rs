//! Calendar year-month values.
//!
//! Month keys in exports look like `2024-01`. Forecast labels are produced by
//! advancing the anchor month with real calendar arithmetic (month index modulo
//! 12 with a year carry), never by adding a fixed number of days.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::AppError;

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Advance by `n` calendar months.
    pub fn add_months(self, n: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(n)).map(Self)
    }
}

impl FromStr for YearMonth {
    type Err = AppError;

    /// Parse a `YYYY-MM` key. A single-digit month is accepted; whitespace,
    /// signs and trailing text are rejected.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        // chrono's numeric scanner skips padding, so screen the raw key first.
        let screened = key.starts_with(|c: char| c.is_ascii_digit())
            && key.bytes().all(|b| b.is_ascii_digit() || b == b'-');
        if !screened {
            return Err(AppError::invalid_month_format(key));
        }
        NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AppError::invalid_month_format(key))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}
