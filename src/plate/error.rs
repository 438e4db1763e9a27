//! Error types for plate file loading and export.

use thiserror::Error;

/// Result type for plate operations.
pub type Result<T> = std::result::Result<T, PlateError>;

/// Errors surfaced while loading or exporting a plate file.
///
/// Each error is fatal for the file it occurred in; sibling files in a
/// multi-file batch keep processing. Malformed data rows are not errors:
/// the normalizer drops them silently.
#[derive(Error, Debug)]
pub enum PlateError {
    /// Required header label(s) absent from the data range.
    #[error("required column(s) missing from data range: {0}")]
    MissingColumns(String),

    /// File extension is not a supported spreadsheet format.
    #[error("unsupported file type: {0} (expected .xlsx or .xls)")]
    UnsupportedFileType(String),

    /// The workbook contains no sheets.
    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    /// Spreadsheet reader error.
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// I/O error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX export error.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
