//! Error types for reelrank-core

use reelrank_io::IoError;
use reelrank_stats::{AggregateError, HistogramError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::records::ItemId;

/// Main error type for pipeline runs. Every variant is terminal.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading or writing a table failed
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Aggregation could not run
    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    /// Histogram edges were rejected
    #[error("Histogram failed: {0}")]
    Histogram(#[from] HistogramError),

    /// The item table lists the same id more than once
    #[error("Duplicate item_id {item_id} in item metadata")]
    DuplicateItem { item_id: ItemId },
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_item_display() {
        let err = PipelineError::DuplicateItem { item_id: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: PipelineError = IoError::FileNotFound("ratings.csv".to_string()).into();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(err.to_string().contains("ratings.csv"));
    }

    #[test]
    fn test_source_is_the_wrapped_error() {
        use std::error::Error;

        let err: PipelineError = IoError::FileNotFound("ratings.csv".to_string()).into();
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source, Some(IoError::FileNotFound("ratings.csv".to_string()).to_string()));
    }
}
