//! Table export to CSV text and XLSX bytes.
//!
//! CSV cells are written with [`Cell`]'s `Display`: integers and text are
//! exact, floats use the shortest round-trip form (whole floats keep a
//! trailing `.0`), booleans become `true`/`false`, and empty cells become
//! empty fields.  Re-reading the CSV therefore reproduces the same cells
//! except that any text which itself looks like a number or boolean comes
//! back typed.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::{Result, TableError};
use crate::table::{Cell, Table};

/// Serialize a table to CSV text with a header row.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::to_string))?;
    }
    let bytes = writer.into_inner().map_err(|e| TableError::Export {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| TableError::Export {
        reason: e.to_string(),
    })
}

/// Serialize a table to an in-memory XLSX workbook with a single sheet.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, name) in table.columns().iter().enumerate() {
        sheet.write_string(0, column_number(c)?, name)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let r = u32::try_from(r + 1).map_err(|_| TableError::Export {
            reason: "too many rows for a worksheet".into(),
        })?;
        for (c, cell) in row.iter().enumerate() {
            let c = column_number(c)?;
            match cell {
                Cell::Int(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                }
                Cell::Float(x) => {
                    sheet.write_number(r, c, *x)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_number(c: usize) -> Result<u16> {
    u16::try_from(c).map_err(|_| TableError::Export {
        reason: "too many columns for a worksheet".into(),
    })
}

/// Download filename: the original upload name with its extension swapped,
/// or `data.<ext>` when there was no upload.
pub fn export_filename(original: Option<&str>, extension: &str) -> String {
    let stem = original
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("data");
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_rows() {
        let mut table = Table::new(["Lead", "Value"]);
        table
            .push_row(vec!["Company_1".into(), Cell::Int(500)])
            .unwrap();
        let csv = to_csv(&table).unwrap();
        assert_eq!(csv, "Lead,Value\nCompany_1,500\n");
    }

    #[test]
    fn csv_quotes_commas() {
        let mut table = Table::new(["Note"]);
        table.push_row(vec!["a, b".into()]).unwrap();
        assert_eq!(to_csv(&table).unwrap(), "Note\n\"a, b\"\n");
    }

    #[test]
    fn xlsx_buffer_is_a_zip() {
        let mut table = Table::new(["A", "B", "C"]);
        table
            .push_row(vec![Cell::Int(1), Cell::Bool(true), Cell::Empty])
            .unwrap();
        let bytes = to_xlsx(&table).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn filename_extension_swap() {
        assert_eq!(export_filename(Some("sales.xlsx"), "csv"), "sales.csv");
        assert_eq!(export_filename(Some("q1.report.csv"), "xlsx"), "q1.report.xlsx");
        assert_eq!(export_filename(Some("noext"), "csv"), "noext.csv");
        assert_eq!(export_filename(None, "xlsx"), "data.xlsx");
    }
}
