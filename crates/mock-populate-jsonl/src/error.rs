//! Error types for JSONL output.

use mock_core::FieldError;
use thiserror::Error;

/// Errors that can occur while writing mock records.
#[derive(Error, Debug)]
pub enum JsonlPopulatorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field failed to produce a value.
    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}
