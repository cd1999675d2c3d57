//! In-memory table with named columns and typed cells.
//!
//! Every row always has exactly one cell per column; the mutators enforce it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single cell value.
///
/// Serializes as a plain JSON scalar (`"text"`, `42`, `1.5`, `true`, `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl Cell {
    /// Infer a typed cell from raw text: integer, then float, then boolean,
    /// falling back to text.  Empty text is [`Cell::Empty`].
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        match raw.to_ascii_lowercase().as_str() {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_owned()),
        }
    }

    /// The integer value, if this is an [`Cell::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The text value, if this is a [`Cell::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // Keep a fractional part on whole floats so they re-read as floats.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A rectangular table: ordered column names and ordered rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns.
    ///
    /// Repeated names are disambiguated with a `.N` suffix (`Name`,
    /// `Name.1`, ...).
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in columns {
            let name = name.into();
            let mut candidate = name.clone();
            let mut n = 1;
            while unique.contains(&candidate) {
                candidate = format!("{name}.{n}");
                n += 1;
            }
            unique.push(candidate);
        }
        Self {
            columns: unique,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// The cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Append a row.  The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Fill the named column with `value` in every row, appending the column
    /// when the table does not have it yet.
    pub fn set_constant_column(&mut self, name: impl Into<String>, value: Cell) {
        let name = name.into();
        match self.column_index(&name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name);
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// A copy holding at most the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_cell_types() {
        assert_eq!(Cell::infer(""), Cell::Empty);
        assert_eq!(Cell::infer("42"), Cell::Int(42));
        assert_eq!(Cell::infer("-7"), Cell::Int(-7));
        assert_eq!(Cell::infer("2.5"), Cell::Float(2.5));
        assert_eq!(Cell::infer("TRUE"), Cell::Bool(true));
        assert_eq!(Cell::infer("Data_3"), Cell::Text("Data_3".into()));
        assert_eq!(Cell::infer("2024-01-05"), Cell::Text("2024-01-05".into()));
    }

    #[test]
    fn whole_float_displays_with_fraction() {
        assert_eq!(Cell::Float(3.0).to_string(), "3.0");
        assert_eq!(Cell::infer(&Cell::Float(3.0).to_string()), Cell::Float(3.0));
        assert_eq!(Cell::Float(0.1).to_string(), "0.1");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn push_row_enforces_width() {
        let mut table = Table::new(["A", "B"]);
        assert!(table.push_row(vec![Cell::Int(1), Cell::Int(2)]).is_ok());
        let err = table.push_row(vec![Cell::Int(1)]).unwrap_err();
        assert!(matches!(err, TableError::RowWidth { expected: 2, found: 1 }));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn duplicate_headers_are_disambiguated() {
        let table = Table::new(["a", "a", "b", "a"]);
        assert_eq!(table.columns(), ["a", "a.1", "b", "a.2"]);
    }

    #[test]
    fn constant_column_fills_every_row() {
        let mut table = Table::new(["A"]);
        for i in 0..3 {
            table.push_row(vec![Cell::Int(i)]).unwrap();
        }
        table.set_constant_column("Stamp", "now".into());
        assert_eq!(table.column_count(), 2);
        assert!(table.column("Stamp").unwrap().all(|c| c == &Cell::from("now")));
    }

    #[test]
    fn constant_column_overwrites_existing() {
        let mut table = Table::new(["A", "Stamp"]);
        table.push_row(vec![Cell::Int(1), "old".into()]).unwrap();
        table.push_row(vec![Cell::Int(2), Cell::Empty]).unwrap();
        table.set_constant_column("Stamp", "new".into());
        assert_eq!(table.columns(), ["A", "Stamp"]);
        assert!(table.column("Stamp").unwrap().all(|c| c == &Cell::from("new")));
        assert_eq!(table.get(1, "A"), Some(&Cell::Int(2)));
    }

    #[test]
    fn head_truncates() {
        let mut table = Table::new(["A"]);
        for i in 0..10 {
            table.push_row(vec![Cell::Int(i)]).unwrap();
        }
        assert_eq!(table.head(5).row_count(), 5);
        assert_eq!(table.head(50).row_count(), 10);
        assert_eq!(table.get(9, "A"), Some(&Cell::Int(9)));
    }

    #[test]
    fn cells_serialize_as_scalars() {
        let mut table = Table::new(["n", "s", "e"]);
        table
            .push_row(vec![Cell::Int(1), "x".into(), Cell::Empty])
            .unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["rows"][0], serde_json::json!([1, "x", null]));
    }
}
