// src/error.rs
use arrow::error::ArrowError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CleanError>;

/// Failures that abort a cleaning call.
///
/// Unparseable numeric text is not an error: it is absorbed as a missing
/// value by the stage that meets it.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("missing column `{column}`")]
    MissingColumn { column: String },

    #[error("duplicate column name `{column}`")]
    DuplicateColumn { column: String },

    /// A `/`-delimited value whose second token is empty, e.g. `3/`.
    #[error("malformed delimited value {value:?} in column `{column}` at row {row}")]
    MalformedDelimitedField {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl CleanError {
    pub(crate) fn missing_column(column: &str) -> Self {
        CleanError::MissingColumn {
            column: column.to_string(),
        }
    }
}
