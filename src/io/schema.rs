//! Schema validation for product exports.
//!
//! The check is purely structural:
//! - the six identifying columns must exist under their exact (German) names
//! - every column whose header starts with `"20"` counts as a month column,
//!   and there must be at least `MIN_MONTH_COLUMNS` of them
//!
//! Month columns are reported in header order. Nothing is re-sorted, so the
//! "last month" seen by the forecast is the last month *column*.

use crate::domain::{Table, ValidatedTable};
use crate::error::AppError;

/// Identifying columns, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 6] = ["SKU", "Name", "Beschreibung", "Preis", "Kategorie", "Lagerbestand"];

/// Minimum number of month columns (two years of history).
pub const MIN_MONTH_COLUMNS: usize = 24;

const MONTH_PREFIX: &str = "20";

pub fn is_month_column(name: &str) -> bool {
    name.starts_with(MONTH_PREFIX)
}

/// Validate a decoded table and resolve its month columns.
pub fn validate(table: Table) -> Result<ValidatedTable, AppError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::missing_columns(missing));
    }

    let month_indices: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| is_month_column(name))
        .map(|(idx, _)| idx)
        .collect();
    if month_indices.len() < MIN_MONTH_COLUMNS {
        return Err(AppError::insufficient_history(month_indices.len()));
    }

    let month_columns = month_indices.iter().map(|&i| table.columns[i].clone()).collect();
    let (Some(sku_index), Some(name_index)) = (table.column_index("SKU"), table.column_index("Name")) else {
        return Err(AppError::missing_columns(vec!["SKU".to_string(), "Name".to_string()]));
    };

    Ok(ValidatedTable {
        table,
        month_columns,
        month_indices,
        sku_index,
        name_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, TextEncoding};
    use crate::error::ErrorKind;

    fn month_keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}-{:02}", 2022 + i / 12, i % 12 + 1)).collect()
    }

    fn table_with(columns: Vec<String>) -> Table {
        let row = columns.iter().map(|_| Cell::Int(1)).collect();
        Table {
            columns,
            rows: vec![row],
            encoding: TextEncoding::Utf8,
        }
    }

    fn full_columns(months: usize) -> Vec<String> {
        let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(month_keys(months));
        columns
    }

    #[test]
    fn accepts_exactly_24_months() {
        let validated = validate(table_with(full_columns(24))).unwrap();
        assert_eq!(validated.month_columns.len(), 24);
        assert_eq!(validated.month_columns[0], "2022-01");
        assert_eq!(validated.month_columns[23], "2023-12");
    }

    #[test]
    fn rejects_23_months() {
        let err = validate(table_with(full_columns(23))).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InsufficientHistory { found: 23 });
        assert_eq!(err.to_string(), "CSV must contain at least 24 months of sales data");
    }

    #[test]
    fn names_exactly_the_missing_column() {
        for required in REQUIRED_COLUMNS {
            let columns: Vec<String> = full_columns(24).into_iter().filter(|c| c != required).collect();
            let err = validate(table_with(columns)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingColumns(vec![required.to_string()]));
        }
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let mut columns = full_columns(24);
        columns[3] = "preis".to_string();
        let err = validate(table_with(columns)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingColumns(vec!["Preis".to_string()]));
    }

    #[test]
    fn month_detection_is_prefix_only_and_keeps_header_order() {
        let mut columns = full_columns(23);
        columns.insert(6, "2099-bogus".to_string());
        let validated = validate(table_with(columns)).unwrap();
        assert_eq!(validated.month_columns[0], "2099-bogus");
        assert_eq!(validated.month_columns.len(), 24);
    }

    #[test]
    fn missing_columns_checked_before_history() {
        let columns = vec!["SKU".to_string(), "2024-01".to_string()];
        let err = validate(table_with(columns)).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MissingColumns(vec![
                "Name".to_string(),
                "Beschreibung".to_string(),
                "Preis".to_string(),
                "Kategorie".to_string(),
                "Lagerbestand".to_string(),
            ])
        );
    }
}
