//! Sample-to-field inference.
//!
//! Dispatch is by the sample's JSON shape:
//!
//! - integer → `Timestamp` when a resolution places it near the reference
//!   time, otherwise `Int`
//! - float → `Float`
//! - string → `Datetime` (first registered format that parses), then
//!   `StrTimestamp` (all digits and a resolution matches), then `StrInt`
//!   (digits with an optional leading `-`), `StrFloat` or `Str`
//! - object / array → `Dict` / `List`, recursively
//! - bool / null → [`InferError::UnsupportedSampleType`]

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use mock_core::{
    DatetimeField, FieldError, FieldSpec, KeyedComposite, OrderedComposite, Resolution,
    TypeRegistry,
};
use serde_json::Value;
use tracing::debug;

pub use mock_core::TIMESTAMP_WINDOW_WEEKS;

/// Error type for inference.
#[derive(Debug, thiserror::Error)]
pub enum InferError {
    /// No field type represents this kind of sample
    #[error("Unsupported sample type at {path}: {kind}")]
    UnsupportedSampleType { path: String, kind: &'static str },

    /// A field could not be constructed
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Infers field specs from sample values using a registry's hints.
#[derive(Debug, Clone)]
pub struct Matcher<'r> {
    registry: &'r TypeRegistry,
    /// Fixed reference time; `None` means "now" at each call
    reference: Option<DateTime<Utc>>,
}

impl<'r> Matcher<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            reference: None,
        }
    }

    /// Pin the instant the timestamp window is centered on.
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    fn reference(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    /// Infer a field for `sample`. Composite inference fails as a whole if
    /// any child fails.
    pub fn infer(&self, sample: &Value) -> Result<FieldSpec, InferError> {
        self.infer_at(sample, &mut String::new())
    }

    fn infer_at(&self, sample: &Value, path: &mut String) -> Result<FieldSpec, InferError> {
        match sample {
            Value::Number(n) if n.is_f64() => Ok(FieldSpec::float()),
            Value::Number(n) => {
                let value = n.as_f64().unwrap_or_default();
                match self.match_timestamp(value) {
                    Some(resolution) => Ok(FieldSpec::timestamp(resolution)),
                    None => Ok(FieldSpec::int()),
                }
            }
            Value::String(s) => self.infer_str(s),
            Value::Object(map) => {
                let mut dict = KeyedComposite::default();
                for (key, child) in map {
                    let len = path.len();
                    push_pointer_token(path, key);
                    let field = self.infer_at(child, path)?;
                    path.truncate(len);
                    dict.insert(key.clone(), field);
                }
                Ok(FieldSpec::Dict(dict))
            }
            Value::Array(items) => {
                let mut list = OrderedComposite::default();
                for (index, child) in items.iter().enumerate() {
                    let len = path.len();
                    push_pointer_token(path, &index.to_string());
                    let field = self.infer_at(child, path)?;
                    path.truncate(len);
                    list.push(field);
                }
                Ok(FieldSpec::List(list))
            }
            Value::Bool(_) => Err(unsupported(path, "boolean")),
            Value::Null => Err(unsupported(path, "null")),
        }
    }

    fn infer_str(&self, value: &str) -> Result<FieldSpec, InferError> {
        if let Some(format) = self.match_datetime(value) {
            return Ok(FieldSpec::Datetime(DatetimeField::new(format)?));
        }
        if let Some(resolution) = self.match_str_timestamp(value) {
            return Ok(FieldSpec::str_timestamp(resolution));
        }
        Ok(classify_str(value))
    }

    /// First registered datetime format that strictly parses `value`.
    ///
    /// A format matches if it yields a full datetime, a date, or a time.
    pub fn match_datetime(&self, value: &str) -> Option<&'r str> {
        let registry: &'r TypeRegistry = self.registry;
        let matched = registry
            .datetime_formats()
            .iter()
            .map(String::as_str)
            .find(|format| parses_with(value, format));
        if let Some(format) = matched {
            debug!("'{}' matched datetime format '{}'", value, format);
        }
        matched
    }

    /// First registered resolution that places `value` inside the window.
    ///
    /// A value accepted by several resolutions resolves to the earliest one in
    /// the registry's order; use [`Matcher::timestamp_candidates`] to see them all.
    pub fn match_timestamp(&self, value: f64) -> Option<Resolution> {
        let reference = self.reference();
        let matched = self
            .registry
            .timestamp_resolutions()
            .iter()
            .copied()
            .find(|resolution| resolution.in_window(value, reference));
        if let Some(resolution) = matched {
            debug!("{} matched timestamp resolution {}", value, resolution);
        }
        matched
    }

    /// Every registered resolution that places `value` inside the window, in
    /// registry order.
    pub fn timestamp_candidates(&self, value: f64) -> Vec<Resolution> {
        let reference = self.reference();
        self.registry
            .timestamp_resolutions()
            .iter()
            .copied()
            .filter(|resolution| resolution.in_window(value, reference))
            .collect()
    }

    /// Timestamp resolution for an all-digit string.
    pub fn match_str_timestamp(&self, value: &str) -> Option<Resolution> {
        if !is_ascii_digits(value) {
            return None;
        }
        value.parse::<f64>().ok().and_then(|v| self.match_timestamp(v))
    }
}

/// Fallback classification for strings that are neither datetimes nor
/// timestamps.
pub fn classify_str(value: &str) -> FieldSpec {
    if is_ascii_digits(value.strip_prefix('-').unwrap_or(value)) {
        FieldSpec::str_int()
    } else if value.parse::<f64>().is_ok() {
        FieldSpec::str_float()
    } else {
        FieldSpec::string()
    }
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn parses_with(value: &str, format: &str) -> bool {
    NaiveDateTime::parse_from_str(value, format).is_ok()
        || NaiveDate::parse_from_str(value, format).is_ok()
        || NaiveTime::parse_from_str(value, format).is_ok()
}

fn push_pointer_token(path: &mut String, token: &str) {
    path.push('/');
    path.push_str(&token.replace('~', "~0").replace('/', "~1"));
}

fn unsupported(path: &str, kind: &'static str) -> InferError {
    InferError::UnsupportedSampleType {
        path: if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        },
        kind,
    }
}
