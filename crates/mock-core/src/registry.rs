//! Type registry backing descriptor decoding and inference.
//!
//! The registry is an explicit value rather than process-wide state: build
//! one with [`TypeRegistry::builtin`], extend it, and pass it to whatever
//! decodes or infers. It holds three things:
//!
//! - constructors keyed by descriptor type name (last registration wins)
//! - datetime formats tried by inference, in priority order
//! - timestamp resolutions tried by inference, in priority order

use crate::descriptor::{DELIMITER, ESCAPE};
use crate::error::FieldError;
use crate::field::{
    validate_datetime_format, DatetimeField, FakeField, FieldSpec, FloatField, IntField,
    Resolution, TimestampField, DEFAULT_DATETIME_FORMAT, ISO_DATETIME_FORMAT,
};
use crate::step::parse_step;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Builds a field from positional string arguments.
pub type FieldConstructor =
    Arc<dyn Fn(&[String]) -> Result<FieldSpec, FieldError> + Send + Sync>;

/// Registry of field constructors and inference hints.
#[derive(Clone)]
pub struct TypeRegistry {
    constructors: HashMap<String, FieldConstructor>,
    /// Registration order of type names
    names: Vec<String>,
    datetime_formats: Vec<String>,
    timestamp_resolutions: Vec<Resolution>,
}

impl TypeRegistry {
    /// A registry with no types, formats or resolutions.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
            names: Vec::new(),
            datetime_formats: Vec::new(),
            timestamp_resolutions: Vec::new(),
        }
    }

    /// A registry with every built-in type, the two default datetime formats
    /// and all four timestamp resolutions (finest first).
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        let ints: [(&'static str, IntField); 8] = [
            ("UInt", IntField::UINT64),
            ("UInt8", IntField::UINT8),
            ("Int8", IntField::INT8),
            ("UInt16", IntField::UINT16),
            ("Int16", IntField::INT16),
            ("UInt32", IntField::UINT32),
            ("Int32", IntField::INT32),
            ("Int", IntField::INT64),
        ];
        for (name, int) in ints {
            let ctor: FieldConstructor = if int.bits() == 64 {
                let signed = int.signed();
                Arc::new(move |args: &[String]| construct_wide_int(name, signed, args))
            } else {
                Arc::new(move |args: &[String]| {
                    expect_args(name, args, 0)?;
                    Ok(FieldSpec::Int(int))
                })
            };
            registry.insert_builtin(name, ctor);
        }

        registry.insert_builtin("Float", Arc::new(|args: &[String]| {
            construct_float("Float", args).map(FieldSpec::Float)
        }));
        registry.insert_builtin("Str", Arc::new(|args: &[String]| {
            expect_args("Str", args, 0)?;
            Ok(FieldSpec::Str)
        }));
        registry.insert_builtin("StrInt", Arc::new(construct_str_int));
        registry.insert_builtin("StrFloat", Arc::new(|args: &[String]| {
            construct_float("StrFloat", args).map(FieldSpec::StrFloat)
        }));
        registry.insert_builtin("Datetime", Arc::new(construct_datetime));
        registry.insert_builtin("Timestamp", Arc::new(|args: &[String]| {
            construct_timestamp("Timestamp", args).map(FieldSpec::Timestamp)
        }));
        registry.insert_builtin("StrTimestamp", Arc::new(|args: &[String]| {
            construct_timestamp("StrTimestamp", args).map(FieldSpec::StrTimestamp)
        }));
        registry.insert_builtin("Fake", Arc::new(|args: &[String]| {
            expect_args("Fake", args, 1)?;
            let method = args.first().cloned().unwrap_or_default();
            FakeField::new(method).map(FieldSpec::Fake)
        }));
        registry.insert_builtin("Dict", Arc::new(|args: &[String]| {
            expect_args("Dict", args, 0)?;
            Ok(default_dict())
        }));
        registry.insert_builtin("List", Arc::new(|args: &[String]| {
            expect_args("List", args, 0)?;
            Ok(default_list())
        }));

        registry.datetime_formats = vec![
            DEFAULT_DATETIME_FORMAT.to_string(),
            ISO_DATETIME_FORMAT.to_string(),
        ];
        registry.timestamp_resolutions = Resolution::ALL.to_vec();
        registry
    }

    fn insert_builtin(&mut self, name: &str, ctor: FieldConstructor) {
        self.names.push(name.to_string());
        self.constructors.insert(name.to_string(), ctor);
    }

    /// Register a constructor under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, ctor: F) -> Result<(), FieldError>
    where
        F: Fn(&[String]) -> Result<FieldSpec, FieldError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() || name.contains(DELIMITER) || name.contains(ESCAPE) {
            return Err(FieldError::InvalidTypeName(name));
        }

        if self.constructors.insert(name.clone(), Arc::new(ctor)).is_some() {
            debug!("Replaced field type '{}'", name);
        } else {
            debug!("Registered field type '{}'", name);
            self.names.push(name);
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered type names, in first-registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Construct the field registered under `name`.
    pub fn construct(&self, name: &str, args: &[String]) -> Result<FieldSpec, FieldError> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| FieldError::UnknownFieldType(name.to_string()))?;
        ctor(args)
    }

    /// Formats tried by datetime inference, in priority order.
    pub fn datetime_formats(&self) -> &[String] {
        &self.datetime_formats
    }

    /// Append a datetime format with lowest priority. Duplicates are ignored.
    pub fn register_datetime_format(&mut self, format: impl Into<String>) -> Result<(), FieldError> {
        let format = format.into();
        validate_datetime_format(&format)?;
        if !self.datetime_formats.contains(&format) {
            debug!("Registered datetime format '{}'", format);
            self.datetime_formats.push(format);
        }
        Ok(())
    }

    /// Resolutions tried by timestamp inference, in priority order.
    pub fn timestamp_resolutions(&self) -> &[Resolution] {
        &self.timestamp_resolutions
    }

    /// Append a resolution with lowest priority. Duplicates are ignored.
    pub fn register_timestamp_resolution(&mut self, resolution: Resolution) {
        if !self.timestamp_resolutions.contains(&resolution) {
            self.timestamp_resolutions.push(resolution);
        }
    }

    /// Replace the resolution priority order.
    pub fn set_timestamp_resolutions(&mut self, resolutions: Vec<Resolution>) {
        let mut deduped = Vec::with_capacity(resolutions.len());
        for resolution in resolutions {
            if !deduped.contains(&resolution) {
                deduped.push(resolution);
            }
        }
        self.timestamp_resolutions = deduped;
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names)
            .field("datetime_formats", &self.datetime_formats)
            .field("timestamp_resolutions", &self.timestamp_resolutions)
            .finish()
    }
}

// ============================================================================
// Built-in constructors
// ============================================================================

fn expect_args(type_name: &str, args: &[String], max: usize) -> Result<(), FieldError> {
    if args.len() > max {
        return Err(FieldError::invalid(
            type_name,
            format!("expected at most {max} argument(s), got {}", args.len()),
        ));
    }
    Ok(())
}

fn parse_arg<T: FromStr>(
    type_name: &str,
    args: &[String],
    index: usize,
    what: &str,
) -> Result<Option<T>, FieldError> {
    args.get(index)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| FieldError::invalid(type_name, format!("invalid {what}: {raw:?}")))
        })
        .transpose()
}

fn parse_signedness(type_name: &str, raw: &str) -> Result<bool, FieldError> {
    match raw {
        "signed" => Ok(true),
        "unsigned" => Ok(false),
        _ => Err(FieldError::invalid(
            type_name,
            format!("expected 'signed' or 'unsigned', got {raw:?}"),
        )),
    }
}

/// `Dict` with no children spelled out.
fn default_dict() -> FieldSpec {
    FieldSpec::dict([
        ("a", FieldSpec::int()),
        ("b", FieldSpec::string()),
        ("c", FieldSpec::Timestamp(TimestampField::default())),
    ])
}

/// `List` with no children spelled out.
fn default_list() -> FieldSpec {
    FieldSpec::list([FieldSpec::string(), FieldSpec::int(), FieldSpec::float()])
}

/// `Int` and `UInt` take an optional bit width.
fn construct_wide_int(name: &str, signed: bool, args: &[String]) -> Result<FieldSpec, FieldError> {
    expect_args(name, args, 1)?;
    let bits = parse_arg::<u8>(name, args, 0, "bit width")?.unwrap_or(64);
    IntField::new(bits, signed).map(FieldSpec::Int)
}

/// `StrInt[_<bits>[_<signed|unsigned>]]`
fn construct_str_int(args: &[String]) -> Result<FieldSpec, FieldError> {
    expect_args("StrInt", args, 2)?;
    let bits = parse_arg::<u8>("StrInt", args, 0, "bit width")?.unwrap_or(64);
    let signed = match args.get(1) {
        Some(raw) => parse_signedness("StrInt", raw)?,
        None => true,
    };
    IntField::new(bits, signed).map(FieldSpec::StrInt)
}

/// `<name>[_<left>[_<right>]]`
fn construct_float(name: &str, args: &[String]) -> Result<FloatField, FieldError> {
    expect_args(name, args, 2)?;
    let defaults = FloatField::default();
    let left = parse_arg::<u32>(name, args, 0, "left digits")?.unwrap_or(defaults.left());
    let right = parse_arg::<u32>(name, args, 1, "right digits")?.unwrap_or(defaults.right());
    FloatField::new(left, right)
}

/// `Datetime[_<format>[_<step>]]`
fn construct_datetime(args: &[String]) -> Result<FieldSpec, FieldError> {
    expect_args("Datetime", args, 2)?;
    let format = args
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATETIME_FORMAT);
    let mut field = DatetimeField::new(format)?;
    if let Some(step) = args.get(1) {
        field = field.with_step(parse_step(step)?)?;
    }
    Ok(FieldSpec::Datetime(field))
}

/// `<name>[_<exponent>[_<step>]]`
fn construct_timestamp(name: &str, args: &[String]) -> Result<TimestampField, FieldError> {
    expect_args(name, args, 2)?;
    let resolution = match args.first() {
        Some(raw) => raw.parse::<Resolution>()?,
        None => Resolution::Nanos,
    };
    let mut field = TimestampField::new(resolution);
    if let Some(step) = args.get(1) {
        field = field.with_step(parse_step(step)?)?;
    }
    Ok(field)
}
