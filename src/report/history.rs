//! Wide-to-long reshape of the month columns.
//!
//! Each record becomes one `(SKU, Name, [(month, value)])` entry with one
//! point per month column, in snapshot column order. No sorting, filtering or
//! aggregation happens here.

use crate::domain::{ProductSales, Record, SalesPoint, Snapshot};
use crate::error::AppError;

pub fn reshape(snapshot: &Snapshot) -> Result<Vec<ProductSales>, AppError> {
    snapshot.records().map(product_sales).collect()
}

fn product_sales(record: Record<'_>) -> Result<ProductSales, AppError> {
    let sales = record
        .months()
        .map(|(month, cell)| {
            cell.as_f64()
                .map(|value| SalesPoint {
                    month: month.to_string(),
                    value,
                })
                .ok_or_else(|| AppError::malformed_value(record.sku(), month))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProductSales {
        sku: record.sku(),
        name: record.name(),
        sales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::{decode, validate};

    const HEADER: &str = "SKU,Name,Beschreibung,Preis,Kategorie,Lagerbestand";

    fn snapshot_from(months: &[String], rows: &[(&str, Vec<String>)]) -> Snapshot {
        let mut csv = format!("{HEADER},{}\n", months.join(","));
        for (sku, values) in rows {
            csv.push_str(&format!("{sku},Name {sku},d,1.5,Cat,3,{}\n", values.join(",")));
        }
        Snapshot::from(validate(decode(csv.as_bytes(), "t.csv").unwrap()).unwrap())
    }

    fn months_2022_2023() -> Vec<String> {
        (0..24).map(|i| format!("{}-{:02}", 2022 + i / 12, i % 12 + 1)).collect()
    }

    #[test]
    fn keeps_column_order_and_values() {
        let months = months_2022_2023();
        let values: Vec<String> = (1..=24).map(|v| (v * 10).to_string()).collect();
        let snapshot = snapshot_from(&months, &[("A1", values)]);

        let history = reshape(&snapshot).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sku, "A1");
        assert_eq!(history[0].name, "Name A1");
        let dates: Vec<&str> = history[0].sales.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(dates, months.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(history[0].sales[0].value, 10.0);
        assert_eq!(history[0].sales[23].value, 240.0);
    }

    #[test]
    fn does_not_sort_unordered_headers() {
        let mut months = months_2022_2023();
        months.swap(0, 23);
        let values: Vec<String> = (0..24).map(|v| v.to_string()).collect();
        let snapshot = snapshot_from(&months, &[("A1", values)]);

        let history = reshape(&snapshot).unwrap();
        assert_eq!(history[0].sales[0].month, "2023-12");
        assert_eq!(history[0].sales[0].value, 0.0);
        assert_eq!(history[0].sales[23].month, "2022-01");
    }

    #[test]
    fn preserves_record_order() {
        let months = months_2022_2023();
        let values: Vec<String> = vec!["1".to_string(); 24];
        let snapshot = snapshot_from(&months, &[("Z9", values.clone()), ("A1", values)]);

        let skus: Vec<String> = reshape(&snapshot).unwrap().into_iter().map(|p| p.sku).collect();
        assert_eq!(skus, vec!["Z9", "A1"]);
    }

    #[test]
    fn non_numeric_cell_names_sku_and_month() {
        let months = months_2022_2023();
        let mut bad: Vec<String> = vec!["1".to_string(); 24];
        bad[5] = "n/a".to_string();
        let snapshot = snapshot_from(&months, &[("OK", vec!["2".to_string(); 24]), ("BAD", bad)]);

        let err = reshape(&snapshot).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MalformedValue {
                sku: "BAD".to_string(),
                month: "2022-06".to_string()
            }
        );
    }

    #[test]
    fn float_cells_keep_their_fraction() {
        let months = months_2022_2023();
        let mut values: Vec<String> = vec!["4".to_string(); 24];
        values[0] = "7.25".to_string();
        let snapshot = snapshot_from(&months, &[("A1", values)]);

        let history = reshape(&snapshot).unwrap();
        assert_eq!(history[0].sales[0].value, 7.25);
        assert_eq!(history[0].sales[1].value, 4.0);
    }
}
