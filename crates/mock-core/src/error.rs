//! Error types for field construction, descriptor decoding and generation.

/// Error type for field and descriptor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Descriptor names a type that is not in the registry
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    /// Descriptor arguments could not be coerced by the target constructor
    #[error("Malformed descriptor '{descriptor}': {reason}")]
    MalformedDescriptor { descriptor: String, reason: String },

    /// A constructor rejected one of its parameters
    #[error("Invalid parameter for {type_name}: {reason}")]
    InvalidParameter { type_name: String, reason: String },

    /// Type names must be non-empty and free of the delimiter and escape characters
    #[error("Invalid type name: {0:?}")]
    InvalidTypeName(String),

    /// No provider (built-in or registered) exposes the requested method
    #[error("Unknown provider method: {0}")]
    UnknownProviderMethod(String),
}

impl FieldError {
    pub(crate) fn invalid(type_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(descriptor: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}
