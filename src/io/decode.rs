//! CSV decoding.
//!
//! This module turns the raw bytes of an uploaded export into a typed `Table`.
//! It knows nothing about the product schema; see `io::schema` for that.
//!
//! Text decoding is a two-step affair: the bytes are read as UTF-8, and if that
//! fails they are reinterpreted as Latin-1. Latin-1 maps every byte to a code
//! point, so the second attempt always succeeds.

use std::collections::HashMap;

use csv::StringRecord;

use crate::domain::{Cell, Table, TextEncoding, parse_finite};
use crate::error::AppError;

/// Text produced by `decode_text`, tagged with the decoding that worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedText<'a> {
    Utf8(&'a str),
    Latin1(String),
}

impl DecodedText<'_> {
    pub fn encoding(&self) -> TextEncoding {
        match self {
            DecodedText::Utf8(_) => TextEncoding::Utf8,
            DecodedText::Latin1(_) => TextEncoding::Latin1,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DecodedText::Utf8(s) => s,
            DecodedText::Latin1(s) => s,
        }
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1.
pub fn decode_text(bytes: &[u8]) -> DecodedText<'_> {
    match std::str::from_utf8(bytes) {
        Ok(text) => DecodedText::Utf8(text),
        Err(_) => DecodedText::Latin1(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Decode an uploaded file into a typed table.
///
/// Fails with `InvalidFileType` before looking at the content when the file
/// name does not end with `.csv`.
pub fn decode(bytes: &[u8], filename: &str) -> Result<Table, AppError> {
    if !filename.ends_with(".csv") {
        return Err(AppError::invalid_file_type());
    }

    let text = decode_text(bytes);
    if text.encoding() == TextEncoding::Latin1 {
        tracing::debug!(filename, "content is not valid UTF-8; decoded as Latin-1");
    }

    let (columns, raw_rows) = read_records(text.as_str())?;
    let rows = type_columns(columns.len(), raw_rows);

    Ok(Table {
        columns,
        rows,
        encoding: text.encoding(),
    })
}

fn read_records(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let columns = build_columns(&headers);
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(AppError::parse("No columns to parse from file"));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::parse(format!("CSV parse error on line {line}: {e}")))?;

        if record.len() > columns.len() {
            return Err(AppError::parse(format!(
                "Error tokenizing data: expected {} fields on line {line}, saw {}",
                columns.len(),
                record.len()
            )));
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok((columns, rows))
}

/// Resolve header names: strip a UTF-8 BOM and disambiguate duplicates.
fn build_columns(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(headers.len());

    for (idx, name) in headers.iter().enumerate() {
        // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
        // first header. If we don't strip it, schema validation will incorrectly
        // report `SKU` as missing.
        let name = if idx == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };

        // A generated `x.1` may itself collide with a literal `x.1` header, so
        // keep suffixing until the name is free.
        let mut resolved = name.to_string();
        let mut count = seen.get(&resolved).copied().unwrap_or(0);
        while count > 0 {
            seen.insert(resolved.clone(), count + 1);
            resolved = format!("{resolved}.{count}");
            count = seen.get(&resolved).copied().unwrap_or(0);
        }
        seen.insert(resolved.clone(), count + 1);
        columns.push(resolved);
    }

    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

/// Type every column as a whole, then convert its cells.
fn type_columns(width: usize, raw_rows: Vec<Vec<String>>) -> Vec<Vec<Cell>> {
    let kinds: Vec<ColumnKind> = (0..width)
        .map(|col| infer_kind(raw_rows.iter().map(|row| row[col].as_str())))
        .collect();

    raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(raw, &kind)| to_cell(raw, kind))
                .collect()
        })
        .collect()
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Int;
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if kind == ColumnKind::Int && value.parse::<i64>().is_ok() {
            continue;
        }
        if parse_finite(value).is_some() {
            kind = ColumnKind::Float;
            continue;
        }
        return ColumnKind::Text;
    }
    kind
}

fn to_cell(raw: String, kind: ColumnKind) -> Cell {
    if raw.trim().is_empty() {
        return Cell::Empty;
    }
    match kind {
        ColumnKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(Cell::Int)
            .unwrap_or(Cell::Text(raw)),
        ColumnKind::Float => parse_finite(&raw).map(Cell::Float).unwrap_or(Cell::Text(raw)),
        ColumnKind::Text => Cell::Text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn decode_str(text: &str, filename: &str) -> Result<Table, AppError> {
        decode(text.as_bytes(), filename)
    }

    fn encode_latin1(text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect()
    }

    #[test]
    fn rejects_non_csv_filename_regardless_of_content() {
        let err = decode(b"SKU,Name\n1,a\n", "export.xlsx").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFileType);

        let err = decode(b"", "export.CSV").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFileType);
    }

    #[test]
    fn falls_back_to_latin1_on_invalid_utf8() {
        // "Müsli" with ü as the single Latin-1 byte 0xFC.
        let bytes = b"SKU,Name\nA1,M\xfcsli\n";
        let table = decode(bytes, "x.csv").unwrap();
        assert_eq!(table.encoding, TextEncoding::Latin1);
        assert_eq!(table.rows[0][1], Cell::Text("Müsli".to_string()));
    }

    #[test]
    fn utf8_and_latin1_decode_to_same_cells() {
        let text = "SKU,Name,2024-01\nA1,Müsli,3\n";
        let utf8 = decode(text.as_bytes(), "a.csv").unwrap();
        let latin1 = decode(&encode_latin1(text), "a.csv").unwrap();
        assert_eq!(utf8.encoding, TextEncoding::Utf8);
        assert_eq!(latin1.encoding, TextEncoding::Latin1);
        assert_eq!(utf8.columns, latin1.columns);
        assert_eq!(utf8.rows, latin1.rows);
    }

    #[test]
    fn types_columns_as_a_whole() {
        let table = decode_str("a,b,c,d\n1,1.5,x,\n2,2,3,\n", "t.csv").unwrap();
        assert_eq!(table.rows[0], vec![Cell::Int(1), Cell::Float(1.5), Cell::Text("x".into()), Cell::Empty]);
        assert_eq!(table.rows[1], vec![Cell::Int(2), Cell::Float(2.0), Cell::Text("3".into()), Cell::Empty]);
    }

    #[test]
    fn strips_bom_and_renames_duplicate_headers() {
        let table = decode_str("\u{feff}SKU,x,x,x\n1,2,3,4\n", "t.csv").unwrap();
        assert_eq!(table.columns, vec!["SKU", "x", "x.1", "x.2"]);
    }

    #[test]
    fn renamed_duplicates_never_collide_with_literal_headers() {
        let table = decode_str("x,x,x.1\n1,2,3\n", "t.csv").unwrap();
        assert_eq!(table.columns, vec!["x", "x.1", "x.1.1"]);

        let table = decode_str("x,x.1,x\n1,2,3\n", "t.csv").unwrap();
        assert_eq!(table.columns, vec!["x", "x.1", "x.1.1"]);
    }

    #[test]
    fn pads_short_rows_and_rejects_long_rows() {
        let table = decode_str("a,b,c\n1,2\n", "t.csv").unwrap();
        assert_eq!(table.rows[0], vec![Cell::Int(1), Cell::Int(2), Cell::Empty]);

        let err = decode_str("a,b\n1,2,3\n", "t.csv").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Parse);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = decode(b"", "empty.csv").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Parse);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn skips_blank_lines() {
        let table = decode_str("a,b\n1,2\n\n3,4\n", "t.csv").unwrap();
        assert_eq!(table.rows.len(), 2);
    }
}
