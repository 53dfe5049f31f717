//! Error types for schema loading and construction.

use mock_core::FieldError;
use mock_infer::InferError;

/// Errors raised while loading samples, descriptors or declarations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading a schema, sample or declaration file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field could not be constructed or decoded
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A sample could not be inferred
    #[error(transparent)]
    Infer(#[from] InferError),
}
