//! Tabular data for TaskPilot.
//!
//! - [`table`] -- The in-memory [`Table`] and its [`Cell`] values.
//! - [`ingest`] -- CSV / XLSX / XLS byte streams into a `Table`.
//! - [`export`] -- A `Table` back out to CSV text or an XLSX buffer.

pub mod error;
pub mod export;
pub mod ingest;
pub mod table;

pub use error::{Result, TableError};
pub use export::{export_filename, to_csv, to_xlsx};
pub use ingest::{FileFormat, read_table};
pub use table::{Cell, Table};
