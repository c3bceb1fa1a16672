//! Ingestion error types.

use tally_core::TallyError;
use thiserror::Error;

/// Result type for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

/// A row that could not be turned into a trade record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct RowError {
    /// 1-based line number in the source.
    pub line: u64,
    /// What was wrong with the row.
    #[source]
    pub error: TallyError,
}

/// Errors raised while loading an instruction file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (I/O or encoding).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row failed validation under the reject policy.
    #[error(transparent)]
    Row(#[from] RowError),
}

impl IngestError {
    /// Returns the row-level error, if this is one.
    #[must_use]
    pub fn row(&self) -> Option<&RowError> {
        match self {
            IngestError::Row(row) => Some(row),
            _ => None,
        }
    }
}
