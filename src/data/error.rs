use std::path::PathBuf;

use thiserror::Error;

/// Why a dataset could not be produced. Both kinds halt everything
/// downstream until the user fixes the file and reloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// A required column is present but holds a value the pipeline cannot use.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("column '{column}', row {row}: missing value")]
    Missing { column: &'static str, row: usize },

    #[error("column '{column}', row {row}: '{value}' is not {expected}")]
    Invalid {
        column: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },
}
