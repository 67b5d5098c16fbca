use thiserror::Error;

/// Errors produced while reading input tables or writing result files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file type \"{extension}\"; supported types are .xlsx, .csv")]
    UnsupportedFormat { extension: String },

    #[error("unique ID column \"{name}\" not found in the data")]
    ColumnNotFound { name: String },

    #[error("ID column index {index} is out of range for a table with {columns} columns")]
    ColumnIndexOutOfRange { index: usize, columns: usize },

    #[error("result for \"{id}\" has {actual} distances, expected {expected}")]
    DistanceCountMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse spreadsheet: {0}")]
    Xlsx(#[from] calamine::XlsxError),
}
