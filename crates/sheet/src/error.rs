use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Column index out of bounds: {index} (sheet has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Sheet '{name}' not found in {path}")]
    SheetNotFound { name: String, path: String },

    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Excel error: {0}")]
    Xlsx(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// Whether the error means the source file or sheet is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SheetError::FileNotFound { .. } | SheetError::SheetNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
