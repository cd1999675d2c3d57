//! Table error types.
//!
//! Ingestion failures are user-facing: their `Display` text is shown to the
//! user verbatim, so the messages are written as sentences.

/// Unified error type for table construction, ingestion, and export.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The uploaded file's extension is not CSV, XLSX, or XLS.
    #[error("Unsupported file format. Please upload CSV, XLSX, or XLS.")]
    UnsupportedFormat { filename: String },

    /// The file had a supported extension but could not be parsed.
    #[error("Error reading file: {reason}")]
    Read { reason: String },

    /// A row did not have one cell per column.
    #[error("row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    /// Serializing the table failed.
    #[error("export failed: {reason}")]
    Export { reason: String },

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX writer error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Convenience alias used throughout the table crate.
pub type Result<T> = std::result::Result<T, TableError>;
