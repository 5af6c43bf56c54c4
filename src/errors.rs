//! Custom error types for the Casefile report renderer.
//!
//! Provides a structured error hierarchy for better error handling
//! and more informative error messages.

use serde_json::error::Category;
use std::path::PathBuf;

/// The main error type for Casefile operations.
#[derive(Debug, thiserror::Error)]
pub enum CasefileError {
    /// I/O error (file read/write, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid JSON at all
    #[error("Invalid JSON in report input: {0}")]
    Json(#[source] serde_json::Error),

    /// Input is valid JSON but does not match the report contract
    #[error("Schema violation in report input: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Result type alias using CasefileError
pub type CasefileResult<T> = Result<T, CasefileError>;

impl CasefileError {
    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for CasefileError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

/// Malformed JSON and schema drift surface as separate variants so the
/// caller can tell a truncated upload from a contract violation.
impl From<serde_json::Error> for CasefileError {
    fn from(source: serde_json::Error) -> Self {
        match source.classify() {
            Category::Data => Self::Schema(source),
            _ => Self::Json(source),
        }
    }
}
