//! Loading samples and descriptor trees from disk.
//!
//! Files ending in `.yaml` or `.yml` are read as YAML, everything else as JSON.

use crate::error::SchemaError;
use mock_core::Descriptor;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// On-disk encoding of a sample or descriptor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// Render a descriptor tree in this format.
    pub fn render(self, descriptor: &Descriptor) -> Result<String, SchemaError> {
        Ok(match self {
            Self::Json => descriptor.to_json_pretty()?,
            Self::Yaml => descriptor.to_yaml()?,
        })
    }
}

/// Read a sample document.
pub fn load_sample<P: AsRef<Path>>(path: P) -> Result<Value, SchemaError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(&content)?),
        DocumentFormat::Json => Ok(serde_json::from_str(&content)?),
    }
}

/// Read a descriptor tree.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<Descriptor, SchemaError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => Ok(Descriptor::from_yaml(&content)?),
        DocumentFormat::Json => Ok(Descriptor::from_json(&content)?),
    }
}
