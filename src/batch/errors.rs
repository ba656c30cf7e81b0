//! Batch processing errors

use thiserror::Error;

use crate::inference::EngineError;

/// Errors raised while processing a CSV batch
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}': {source}")]
    Header {
        column: String,
        #[source]
        source: EngineError,
    },

    #[error("row {row}: {source}")]
    Row {
        /// 1-based data row number
        row: usize,
        #[source]
        source: EngineError,
    },
}

impl BatchError {
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::Csv(_) | BatchError::Io(_) => "ECORISK_BATCH_IO_ERROR",
            BatchError::Header { source, .. } | BatchError::Row { source, .. } => source.code(),
        }
    }
}

/// Result type for batch processing
pub type BatchResult<T> = Result<T, BatchError>;
