//! Spreadsheet ingestion.
//!
//! The format is chosen from the file extension.  CSV is decoded as UTF-8
//! and retried as Latin-1 when that fails; XLSX and XLS read the first
//! worksheet.  The first row is always the header.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xls, Xlsx};
use tracing::{debug, warn};

use crate::error::{Result, TableError};
use crate::table::{Cell, Table};

/// A supported upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Detect the format from a filename's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

/// Parse an uploaded file into a [`Table`].
///
/// Unsupported extensions yield [`TableError::UnsupportedFormat`]; parse
/// failures yield [`TableError::Read`].
pub fn read_table(filename: &str, bytes: &[u8]) -> Result<Table> {
    let format = FileFormat::from_filename(filename).ok_or_else(|| {
        TableError::UnsupportedFormat {
            filename: filename.to_owned(),
        }
    })?;

    debug!(filename, ?format, bytes = bytes.len(), "reading uploaded table");

    let table = match format {
        FileFormat::Csv => read_csv(bytes),
        FileFormat::Xlsx => {
            let workbook: Xlsx<_> = open(bytes)?;
            read_first_sheet(workbook)
        }
        FileFormat::Xls => {
            let workbook: Xls<_> = open(bytes)?;
            read_first_sheet(workbook)
        }
    }?;

    debug!(
        filename,
        rows = table.row_count(),
        columns = table.column_count(),
        "table loaded"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(bytes: &[u8]) -> Result<Table> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            warn!(error = %e, "csv is not valid UTF-8, retrying as Latin-1");
            Cow::Owned(decode_latin1(bytes))
        }
    };
    let text: &str = text.strip_prefix('\u{feff}').unwrap_or(&*text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(read_error)?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(TableError::Read {
            reason: "no columns to parse from file".into(),
        });
    }

    let width = headers.len();
    let mut table = Table::new(headers.iter().enumerate().map(|(i, name)| {
        if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_owned()
        }
    }));
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        if record.len() > width {
            let line = record.position().map_or(index as u64 + 2, |p| p.line());
            return Err(TableError::Read {
                reason: format!("expected {width} fields in line {line}, saw {}", record.len()),
            });
        }
        // Short rows are padded out to the header width.
        let mut row: Vec<Cell> = record.iter().map(Cell::infer).collect();
        row.resize(width, Cell::Empty);
        table.push_row(row)?;
    }
    Ok(table)
}

/// Latin-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn read_error(e: csv::Error) -> TableError {
    TableError::Read {
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Workbooks
// ---------------------------------------------------------------------------

fn open<R>(bytes: &[u8]) -> Result<R>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    R::new(Cursor::new(bytes.to_vec())).map_err(|e| TableError::Read {
        reason: e.to_string(),
    })
}

fn read_first_sheet<R>(mut workbook: R) -> Result<Table>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::Read {
            reason: "workbook contains no worksheets".into(),
        })?
        .map_err(|e| TableError::Read {
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| TableError::Read {
        reason: "no columns to parse from file".into(),
    })?;

    let columns = header.iter().enumerate().map(|(i, cell)| match cell {
        Data::Empty => format!("Unnamed: {i}"),
        other => other.to_string(),
    });
    let mut table = Table::new(columns);

    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect())?;
    }
    Ok(table)
}

/// Excel stores every number as a float; whole values come back as integers.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Cell::Int(*f as i64),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(FileFormat::from_filename("a.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_filename("Report.XLSX"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_filename("old.xls"), Some(FileFormat::Xls));
        assert_eq!(FileFormat::from_filename("notes.txt"), None);
        assert_eq!(FileFormat::from_filename("csv"), None);
    }

    #[test]
    fn unsupported_extension_is_typed() {
        let err = read_table("data.json", b"{}").unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat { .. }));
        assert_eq!(
            err.to_string(),
            "Unsupported file format. Please upload CSV, XLSX, or XLS."
        );
    }

    #[test]
    fn csv_with_header() {
        let table = read_table("t.csv", b"Name,Score\nalice,3\nbob,4.5\n").unwrap();
        assert_eq!(table.columns(), ["Name", "Score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "Score"), Some(&Cell::Int(3)));
        assert_eq!(table.get(1, "Score"), Some(&Cell::Float(4.5)));
    }

    #[test]
    fn csv_latin1_fallback() {
        // "café" in Latin-1: 0xE9 is not valid UTF-8 on its own.
        let bytes = b"Item\ncaf\xe9\n";
        let table = read_table("menu.csv", bytes).unwrap();
        assert_eq!(table.get(0, "Item"), Some(&Cell::Text("café".into())));
    }

    #[test]
    fn csv_utf8_bom_is_stripped() {
        let table = read_table("t.csv", "\u{feff}A,B\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.columns(), ["A", "B"]);
    }

    #[test]
    fn long_csv_row_is_a_read_error() {
        let err = read_table("t.csv", b"A,B\n1,2,3\n").unwrap_err();
        assert!(matches!(err, TableError::Read { .. }));
        assert_eq!(
            err.to_string(),
            "Error reading file: expected 2 fields in line 2, saw 3"
        );
    }

    #[test]
    fn short_csv_rows_are_padded() {
        let table = read_table("t.csv", b"a,b,c\n1,2\n3,4,5\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "b"), Some(&Cell::Int(2)));
        assert_eq!(table.get(0, "c"), Some(&Cell::Empty));
        assert_eq!(table.get(1, "c"), Some(&Cell::Int(5)));
    }

    #[test]
    fn blank_csv_headers_are_named_by_position() {
        let table = read_table("t.csv", b"id,,score\n1,x,2\n").unwrap();
        assert_eq!(table.columns(), ["id", "Unnamed: 1", "score"]);
    }

    #[test]
    fn empty_csv_is_a_read_error() {
        let err = read_table("t.csv", b"").unwrap_err();
        assert!(matches!(err, TableError::Read { .. }));
    }

    #[test]
    fn garbage_xlsx_is_a_read_error() {
        let err = read_table("t.xlsx", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, TableError::Read { .. }));
    }

    #[test]
    fn workbook_numbers_become_ints_when_whole() {
        assert_eq!(cell_from_data(&Data::Float(12.0)), Cell::Int(12));
        assert_eq!(cell_from_data(&Data::Float(12.5)), Cell::Float(12.5));
        assert_eq!(cell_from_data(&Data::String(String::new())), Cell::Empty);
    }
}
