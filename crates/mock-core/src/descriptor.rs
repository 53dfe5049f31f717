//! Descriptor encoding and decoding.
//!
//! Scalar fields encode to `TypeName[_arg]*`. Composites encode to a tree of
//! descriptors with the same shape as the data: a map for keyed composites,
//! a list for ordered composites.
//!
//! ```text
//! {"a": {"1": "Datetime_%Y-%m-%dT%H:%M:%S", "4": "Int"},
//!  "b": "Timestamp_0",
//!  "e": ["StrTimestamp_6", "Str"]}
//! ```
//!
//! Arguments that contain the delimiter or the escape character are escaped
//! with a backslash (`_` → `\_`, `\` → `\\`), so a format like `%Y_%m_%d`
//! survives the round trip. Arguments without either character encode as-is.

use crate::composite::{KeyedComposite, OrderedComposite};
use crate::error::FieldError;
use crate::field::FieldSpec;
use crate::registry::TypeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Separates the type name and each argument.
pub const DELIMITER: char = '_';

/// Escapes a literal delimiter or escape character inside an argument.
pub const ESCAPE: char = '\\';

/// A field descriptor: a scalar string or a keyed/ordered tree of descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    Scalar(String),
    Ordered(Vec<Descriptor>),
    Keyed(IndexMap<String, Descriptor>),
}

impl Descriptor {
    /// Parse a descriptor tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a descriptor tree from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// True for composites without children.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::Ordered(items) => items.is_empty(),
            Self::Keyed(fields) => fields.is_empty(),
        }
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

/// Compact JSON.
impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Join a type name and its arguments into a scalar descriptor.
pub fn encode_scalar(type_name: &str, args: &[String]) -> String {
    let mut out = String::from(type_name);
    for arg in args {
        out.push(DELIMITER);
        for c in arg.chars() {
            if c == DELIMITER || c == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Split a scalar descriptor into its type name and unescaped arguments.
pub fn split_scalar(descriptor: &str) -> Result<(String, Vec<String>), FieldError> {
    if descriptor.is_empty() {
        return Err(FieldError::malformed(descriptor, "empty descriptor"));
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = descriptor.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(FieldError::malformed(descriptor, "dangling escape")),
            },
            DELIMITER => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tokens.push(current);

    let mut tokens = tokens.into_iter();
    let type_name = tokens.next().unwrap_or_default();
    if type_name.is_empty() {
        return Err(FieldError::malformed(descriptor, "missing type name"));
    }
    Ok((type_name, tokens.collect()))
}

/// Rebuild a field from its descriptor.
///
/// Scalars are constructed through `registry`; constructor parameter errors
/// are reported as [`FieldError::MalformedDescriptor`].
pub fn decode(descriptor: &Descriptor, registry: &TypeRegistry) -> Result<FieldSpec, FieldError> {
    match descriptor {
        Descriptor::Keyed(fields) => {
            let mut dict = KeyedComposite::default();
            for (name, child) in fields {
                dict.insert(name.clone(), decode(child, registry)?);
            }
            Ok(FieldSpec::Dict(dict))
        }
        Descriptor::Ordered(items) => items
            .iter()
            .map(|child| decode(child, registry))
            .collect::<Result<OrderedComposite, _>>()
            .map(FieldSpec::List),
        Descriptor::Scalar(s) => decode_scalar(s, registry),
    }
}

fn decode_scalar(descriptor: &str, registry: &TypeRegistry) -> Result<FieldSpec, FieldError> {
    let (type_name, args) = split_scalar(descriptor)?;
    debug!("Decoding '{}' as {} with args {:?}", descriptor, type_name, args);

    registry
        .construct(&type_name, &args)
        .map_err(|e| match e {
            FieldError::InvalidParameter { reason, .. } => FieldError::malformed(descriptor, reason),
            FieldError::MalformedDescriptor { reason, .. } => {
                FieldError::malformed(descriptor, reason)
            }
            other => other,
        })
}
