//! Error types for the liquidity analyzer

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use types::errors::BookError;

/// Result alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Line {line}: malformed record: {source}")]
    Decode {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: invalid book data: {source}")]
    Book {
        line: u64,
        #[source]
        source: BookError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Line number of the offending input record, for decode failures.
    pub fn line(&self) -> Option<u64> {
        match self {
            AnalyzerError::Decode { line, .. } | AnalyzerError::Book { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_error_display() {
        let err = AnalyzerError::Book {
            line: 12,
            source: BookError::InvalidDecimal("x".to_string()),
        };
        assert_eq!(err.to_string(), "Line 12: invalid book data: Invalid decimal: \"x\"");
        assert_eq!(err.line(), Some(12));
    }

    #[test]
    fn test_io_error_has_no_line() {
        let err: AnalyzerError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(err.line().is_none());
        assert!(err.to_string().contains("boom"));
    }
}
