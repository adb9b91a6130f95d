//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory as the current snapshot
//! - returned as JSON by the HTTP binding
//! - printed by the CLI

use std::fmt;

use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single table value, typed by the column it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Coerce the cell to a finite float.
    ///
    /// Text cells are accepted when they parse as a number, so a month column
    /// that was typed as text because of one stray value still yields numbers
    /// for every well-formed row.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => v.is_finite().then_some(*v),
            Cell::Text(s) => parse_finite(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a trimmed string as a finite float.
pub fn parse_finite(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Which text decoding produced the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

/// A decoded, typed table: ordered headers plus rows aligned to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub encoding: TextEncoding,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A table that passed schema validation.
///
/// Column indices are resolved once here so downstream readers never have to
/// look identifying columns up by name again.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTable {
    pub table: Table,
    /// Month column names in header order (never re-sorted).
    pub month_columns: Vec<String>,
    pub(crate) month_indices: Vec<usize>,
    pub(crate) sku_index: usize,
    pub(crate) name_index: usize,
}

/// The single in-memory set of validated product records.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    month_indices: Vec<usize>,
    sku_index: usize,
    name_index: usize,
}

impl From<ValidatedTable> for Snapshot {
    fn from(validated: ValidatedTable) -> Self {
        Self {
            columns: validated.table.columns,
            rows: validated.table.rows,
            month_indices: validated.month_indices,
            sku_index: validated.sku_index,
            name_index: validated.name_index,
        }
    }
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Month keys in source header order.
    pub fn month_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.month_indices.iter().map(|&i| self.columns[i].as_str())
    }

    /// The last month key in source order (not necessarily the latest date).
    pub fn last_month_key(&self) -> Option<&str> {
        self.month_indices.last().map(|&i| self.columns[i].as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |cells| Record {
            snapshot: self,
            cells,
        })
    }
}

/// Read-only view of one product row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    snapshot: &'a Snapshot,
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    pub fn sku(&self) -> String {
        self.cells[self.snapshot.sku_index].to_string()
    }

    pub fn name(&self) -> String {
        self.cells[self.snapshot.name_index].to_string()
    }

    /// `(month key, cell)` pairs in snapshot month order.
    pub fn months(self) -> impl Iterator<Item = (&'a str, &'a Cell)> + 'a {
        let snapshot = self.snapshot;
        let cells = self.cells;
        snapshot
            .month_indices
            .iter()
            .map(move |&i| (snapshot.columns[i].as_str(), &cells[i]))
    }

    /// The value at the last month column, as `(month key, cell)`.
    pub fn last_month(&self) -> Option<(&'a str, &'a Cell)> {
        let snapshot = self.snapshot;
        let &i = snapshot.month_indices.last()?;
        Some((snapshot.columns[i].as_str(), &self.cells[i]))
    }
}

/// Records serialize as flat objects with every original column, in order.
impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in self.snapshot.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// One reshaped observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint {
    #[serde(rename = "date")]
    pub month: String,
    pub value: f64,
}

/// One projected observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    #[serde(rename = "date")]
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Name")]
    pub name: String,
    pub sales: Vec<SalesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForecast {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Name")]
    pub name: String,
    pub forecast: Vec<ForecastPoint>,
}

/// Response to a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    pub message: String,
    pub rows: usize,
    /// Decoding that succeeded; reported by the CLI, not part of the API body.
    #[serde(skip)]
    pub encoding: TextEncoding,
}

/// Which derived view the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Short terminal summary of the parsed file.
    Summary,
    Products,
    History,
    Forecast,
}

/// Resolved configuration for the HTTP binding.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the request body accepted by the upload route.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
