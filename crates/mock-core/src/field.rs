//! The field-type catalog.
//!
//! Every field knows how to produce one synthetic value (`mock`) and how to
//! describe itself as a [`Descriptor`]. Scalar fields render as
//! `TypeName[_arg]*`; composites render as keyed or ordered descriptor trees.
//!
//! ## Descriptor names
//!
//! | Field | Descriptor |
//! |---|---|
//! | 64-bit signed integer | `Int` |
//! | Standard-width integers | `UInt`, `Int8`, `UInt8`, `Int16`, `UInt16`, `Int32`, `UInt32` |
//! | Other widths | `Int_<bits>`, `UInt_<bits>` |
//! | Float | `Float_<left>_<right>` |
//! | Word | `Str` |
//! | Stringified numbers | `StrInt[_<bits>_<signed/unsigned>]`, `StrFloat_<left>_<right>` |
//! | Datetime | `Datetime_<format>[_<step>]` |
//! | Epoch timestamp | `Timestamp_<exponent>[_<step>]`, `StrTimestamp_<exponent>[_<step>]` |
//! | Provider method | `Fake_<method>` |

use crate::composite::{KeyedComposite, OrderedComposite};
use crate::descriptor::{encode_scalar, Descriptor};
use crate::error::FieldError;
use crate::provider::Provider;
use crate::step::{default_step, format_step};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, Utc};
use serde_json::Value;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Format used by `Datetime` when none is given.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO-8601 style format without offset.
pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Half-width of the window around a reference time in which a scaled
/// integer reads as an epoch timestamp.
pub const TIMESTAMP_WINDOW_WEEKS: i64 = 100;

const MAX_FLOAT_DIGITS: u32 = 15;

const MAX_INT_REDRAWS: usize = 64;

// ============================================================================
// Integer
// ============================================================================

/// Integer whose range is derived from a bit width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntField {
    bits: u8,
    signed: bool,
}

impl IntField {
    pub const INT64: IntField = IntField { bits: 64, signed: true };
    pub const UINT64: IntField = IntField { bits: 64, signed: false };
    pub const INT32: IntField = IntField { bits: 32, signed: true };
    pub const UINT32: IntField = IntField { bits: 32, signed: false };
    pub const INT16: IntField = IntField { bits: 16, signed: true };
    pub const UINT16: IntField = IntField { bits: 16, signed: false };
    pub const INT8: IntField = IntField { bits: 8, signed: true };
    pub const UINT8: IntField = IntField { bits: 8, signed: false };

    /// Create an integer field with `bits` in `1..=64`.
    pub fn new(bits: u8, signed: bool) -> Result<Self, FieldError> {
        if !(1..=64).contains(&bits) {
            return Err(FieldError::invalid(
                "Int",
                format!("bit width must be in 1..=64, got {bits}"),
            ));
        }
        Ok(Self { bits, signed })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Smallest value `mock()` can return.
    pub fn min(&self) -> i128 {
        if self.signed {
            -(1i128 << (self.bits - 1))
        } else {
            0
        }
    }

    /// Largest value `mock()` can return.
    pub fn max(&self) -> i128 {
        if self.signed {
            (1i128 << (self.bits - 1)) - 1
        } else {
            (1i128 << self.bits) - 1
        }
    }

    /// Draw a value from the range.
    ///
    /// Draws that read as an epoch timestamp near now at any resolution are
    /// redrawn, so integer values never infer back as `Timestamp`.
    pub fn generate(&self, provider: &mut Provider) -> i128 {
        let now = Utc::now();
        for _ in 0..MAX_INT_REDRAWS {
            let value = provider.int_in(self.min(), self.max());
            if !reads_as_timestamp(value, now) {
                return value;
            }
        }
        // Zero is in every range and never a timestamp.
        0
    }

    /// Registered alias for the standard widths.
    pub fn alias(&self) -> Option<&'static str> {
        match (self.bits, self.signed) {
            (64, true) => Some("Int"),
            (64, false) => Some("UInt"),
            (32, true) => Some("Int32"),
            (32, false) => Some("UInt32"),
            (16, true) => Some("Int16"),
            (16, false) => Some("UInt16"),
            (8, true) => Some("Int8"),
            (8, false) => Some("UInt8"),
            _ => None,
        }
    }

    fn signedness(&self) -> &'static str {
        if self.signed {
            "signed"
        } else {
            "unsigned"
        }
    }
}

impl Default for IntField {
    fn default() -> Self {
        Self::INT64
    }
}

fn reads_as_timestamp(value: i128, now: DateTime<Utc>) -> bool {
    Resolution::ALL
        .iter()
        .any(|resolution| resolution.in_window(value as f64, now))
}

/// Values below zero always fit `i64`; the rest fit `u64` for widths up to 64.
fn int_to_value(value: i128) -> Value {
    if value < 0 {
        Value::from(value as i64)
    } else {
        Value::from(value as u64)
    }
}

// ============================================================================
// Float
// ============================================================================

/// Float with bounded integer and fractional digit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatField {
    left: u32,
    right: u32,
}

impl FloatField {
    /// Create a float field. `left + right` must be in `1..=15`.
    pub fn new(left: u32, right: u32) -> Result<Self, FieldError> {
        if left == 0 && right == 0 {
            return Err(FieldError::invalid(
                "Float",
                "left and right digits cannot both be zero",
            ));
        }
        if left.saturating_add(right) > MAX_FLOAT_DIGITS {
            return Err(FieldError::invalid(
                "Float",
                format!("left + right digits must not exceed {MAX_FLOAT_DIGITS}"),
            ));
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn generate(&self, provider: &mut Provider) -> f64 {
        provider.pyfloat(self.left, self.right)
    }

    fn args(&self) -> Vec<String> {
        vec![self.left.to_string(), self.right.to_string()]
    }
}

impl Default for FloatField {
    fn default() -> Self {
        Self { left: 2, right: 10 }
    }
}

/// Debug formatting keeps a fractional part (`12.0`, not `12`), so the text
/// still classifies as a float when read back.
fn float_to_string(value: f64) -> String {
    format!("{value:?}")
}

// ============================================================================
// Temporal
// ============================================================================

/// Power-of-ten scale distinguishing epoch encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl Resolution {
    /// Default matching order: finest resolution first.
    pub const ALL: [Resolution; 4] = [
        Resolution::Nanos,
        Resolution::Micros,
        Resolution::Millis,
        Resolution::Seconds,
    ];

    pub fn exponent(self) -> u32 {
        match self {
            Resolution::Seconds => 0,
            Resolution::Millis => 3,
            Resolution::Micros => 6,
            Resolution::Nanos => 9,
        }
    }

    pub fn from_exponent(exponent: u32) -> Option<Self> {
        match exponent {
            0 => Some(Resolution::Seconds),
            3 => Some(Resolution::Millis),
            6 => Some(Resolution::Micros),
            9 => Some(Resolution::Nanos),
            _ => None,
        }
    }

    /// `10^exponent`
    pub fn scale(self) -> i64 {
        10i64.pow(self.exponent())
    }

    /// Whether `value`, read at this resolution, lands strictly within
    /// [`TIMESTAMP_WINDOW_WEEKS`] of `reference`.
    ///
    /// Values that scale to one second past the epoch or less never match.
    pub fn in_window(self, value: f64, reference: DateTime<Utc>) -> bool {
        let candidate = value / 10f64.powi(self.exponent() as i32);
        if !candidate.is_finite() || candidate <= 1.0 {
            return false;
        }

        let secs = candidate.trunc();
        if secs > i64::MAX as f64 {
            return false;
        }
        let nanos = (candidate.fract() * 1e9) as u32;
        let Some(instant) = DateTime::<Utc>::from_timestamp(secs as i64, nanos) else {
            return false;
        };

        let window = TimeDelta::weeks(TIMESTAMP_WINDOW_WEEKS);
        reference - window < instant && instant < reference + window
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.exponent())
    }
}

impl FromStr for Resolution {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Resolution::from_exponent)
            .ok_or_else(|| {
                FieldError::invalid(
                    "Timestamp",
                    format!("resolution exponent must be one of 0, 3, 6, 9, got {s:?}"),
                )
            })
    }
}

/// Check that `format` is a usable strftime string for wall-clock times.
///
/// Offset and zone specifiers are rejected since the datetime clock carries
/// no timezone.
pub(crate) fn validate_datetime_format(format: &str) -> Result<(), FieldError> {
    if format.is_empty() {
        return Err(FieldError::invalid("Datetime", "empty format"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FieldError::invalid(
            "Datetime",
            format!("invalid format string: {format:?}"),
        ));
    }
    let mut rendered = String::new();
    if write!(rendered, "{}", NaiveDateTime::default().format(format)).is_err() {
        return Err(FieldError::invalid(
            "Datetime",
            format!("format needs a timezone: {format:?}"),
        ));
    }
    Ok(())
}

fn validate_step(type_name: &str, step: TimeDelta) -> Result<(), FieldError> {
    match step.num_nanoseconds() {
        Some(nanos) if nanos > 0 => Ok(()),
        _ => Err(FieldError::invalid(
            type_name,
            "step must be positive and fit in 64-bit nanoseconds",
        )),
    }
}

/// Formatted datetime driven by a private wall clock.
///
/// The clock starts at the local wall time of construction and advances by
/// `step` before every `mock()`. It is naive, so DST transitions neither
/// repeat nor skip values and successive values are strictly increasing.
#[derive(Debug, Clone)]
pub struct DatetimeField {
    format: String,
    step: TimeDelta,
    clock: NaiveDateTime,
}

impl DatetimeField {
    pub fn new(format: impl Into<String>) -> Result<Self, FieldError> {
        let format = format.into();
        validate_datetime_format(&format)?;
        Ok(Self {
            format,
            step: default_step(),
            clock: Local::now().naive_local(),
        })
    }

    /// Restart the clock at `start`; the first value is `start + step`.
    pub fn starting_at(mut self, start: NaiveDateTime) -> Self {
        self.clock = start;
        self
    }

    pub fn with_step(mut self, step: TimeDelta) -> Result<Self, FieldError> {
        validate_step("Datetime", step)?;
        self.step = step;
        Ok(self)
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Current clock position (the wall time of the last generated value).
    pub fn clock(&self) -> NaiveDateTime {
        self.clock
    }

    pub fn generate(&mut self) -> String {
        self.clock += self.step;
        self.clock.format(&self.format).to_string()
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![self.format.clone()];
        if self.step != default_step() {
            args.push(format_step(self.step));
        }
        args
    }
}

impl Default for DatetimeField {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATETIME_FORMAT.to_string(),
            step: default_step(),
            clock: Local::now().naive_local(),
        }
    }
}

/// Integer epoch timestamp driven by a private clock.
#[derive(Debug, Clone)]
pub struct TimestampField {
    resolution: Resolution,
    step: TimeDelta,
    clock: DateTime<Local>,
}

impl TimestampField {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            step: default_step(),
            clock: Local::now(),
        }
    }

    pub fn with_step(mut self, step: TimeDelta) -> Result<Self, FieldError> {
        validate_step("Timestamp", step)?;
        self.step = step;
        Ok(self)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    pub fn clock(&self) -> DateTime<Local> {
        self.clock
    }

    pub fn generate(&mut self) -> i64 {
        self.clock += self.step;
        let exponent = self.resolution.exponent();
        let subsec = i64::from(self.clock.timestamp_subsec_nanos()) / 10i64.pow(9 - exponent);
        self.clock.timestamp() * self.resolution.scale() + subsec
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![self.resolution.to_string()];
        if self.step != default_step() {
            args.push(format_step(self.step));
        }
        args
    }
}

impl Default for TimestampField {
    fn default() -> Self {
        Self::new(Resolution::Nanos)
    }
}

// ============================================================================
// Provider-backed and custom fields
// ============================================================================

/// Field that calls a named provider method, built-in or registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeField {
    method: String,
}

impl FakeField {
    pub fn new(method: impl Into<String>) -> Result<Self, FieldError> {
        let method = method.into();
        if method.is_empty() {
            return Err(FieldError::invalid("Fake", "empty provider method"));
        }
        Ok(Self { method })
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Integrator-defined field type.
///
/// Register a constructor for `type_name()` in the
/// [`TypeRegistry`](crate::TypeRegistry) so descriptors decode back to it.
pub trait CustomField: fmt::Debug + Send {
    /// Descriptor type name.
    fn type_name(&self) -> &str;

    /// Constructor arguments, in order.
    fn args(&self) -> Vec<String> {
        Vec::new()
    }

    fn mock(&mut self, provider: &mut Provider) -> Result<Value, FieldError>;

    fn clone_box(&self) -> Box<dyn CustomField>;
}

impl Clone for Box<dyn CustomField> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// ============================================================================
// FieldSpec
// ============================================================================

/// A typed description of one value.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Int(IntField),
    Float(FloatField),
    Str,
    StrInt(IntField),
    StrFloat(FloatField),
    Datetime(DatetimeField),
    Timestamp(TimestampField),
    StrTimestamp(TimestampField),
    Fake(FakeField),
    Dict(KeyedComposite),
    List(OrderedComposite),
    Custom(Box<dyn CustomField>),
}

impl FieldSpec {
    /// 64-bit signed integer.
    pub fn int() -> Self {
        Self::Int(IntField::INT64)
    }

    /// 64-bit unsigned integer.
    pub fn uint() -> Self {
        Self::Int(IntField::UINT64)
    }

    pub fn int8() -> Self {
        Self::Int(IntField::INT8)
    }

    pub fn uint8() -> Self {
        Self::Int(IntField::UINT8)
    }

    pub fn int16() -> Self {
        Self::Int(IntField::INT16)
    }

    pub fn uint16() -> Self {
        Self::Int(IntField::UINT16)
    }

    pub fn int32() -> Self {
        Self::Int(IntField::INT32)
    }

    pub fn uint32() -> Self {
        Self::Int(IntField::UINT32)
    }

    pub fn int_with(bits: u8, signed: bool) -> Result<Self, FieldError> {
        IntField::new(bits, signed).map(Self::Int)
    }

    pub fn float() -> Self {
        Self::Float(FloatField::default())
    }

    pub fn float_with(left: u32, right: u32) -> Result<Self, FieldError> {
        FloatField::new(left, right).map(Self::Float)
    }

    pub fn string() -> Self {
        Self::Str
    }

    pub fn str_int() -> Self {
        Self::StrInt(IntField::default())
    }

    pub fn str_float() -> Self {
        Self::StrFloat(FloatField::default())
    }

    pub fn datetime(format: impl Into<String>) -> Result<Self, FieldError> {
        DatetimeField::new(format).map(Self::Datetime)
    }

    pub fn timestamp(resolution: Resolution) -> Self {
        Self::Timestamp(TimestampField::new(resolution))
    }

    pub fn str_timestamp(resolution: Resolution) -> Self {
        Self::StrTimestamp(TimestampField::new(resolution))
    }

    pub fn fake(method: impl Into<String>) -> Result<Self, FieldError> {
        FakeField::new(method).map(Self::Fake)
    }

    pub fn dict<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        Self::Dict(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        Self::List(items.into_iter().collect())
    }

    pub fn custom<C: CustomField + 'static>(field: C) -> Self {
        Self::Custom(Box::new(field))
    }

    /// Descriptor type name; `None` for composites.
    pub fn type_name(&self) -> Option<&str> {
        let name = match self {
            Self::Int(int) => int
                .alias()
                .unwrap_or(if int.signed { "Int" } else { "UInt" }),
            Self::Float(_) => "Float",
            Self::Str => "Str",
            Self::StrInt(_) => "StrInt",
            Self::StrFloat(_) => "StrFloat",
            Self::Datetime(_) => "Datetime",
            Self::Timestamp(_) => "Timestamp",
            Self::StrTimestamp(_) => "StrTimestamp",
            Self::Fake(_) => "Fake",
            Self::Custom(custom) => custom.type_name(),
            Self::Dict(_) | Self::List(_) => return None,
        };
        Some(name)
    }

    /// Constructor arguments rendered as strings, in constructor order.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Int(int) if int.alias().is_some() => Vec::new(),
            Self::Int(int) => vec![int.bits.to_string()],
            Self::StrInt(int) if *int == IntField::INT64 => Vec::new(),
            Self::StrInt(int) => vec![int.bits.to_string(), int.signedness().to_string()],
            Self::Float(float) | Self::StrFloat(float) => float.args(),
            Self::Datetime(datetime) => datetime.args(),
            Self::Timestamp(timestamp) | Self::StrTimestamp(timestamp) => timestamp.args(),
            Self::Fake(fake) => vec![fake.method.clone()],
            Self::Custom(custom) => custom.args(),
            Self::Str | Self::Dict(_) | Self::List(_) => Vec::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Dict(_) | Self::List(_))
    }

    /// Produce one synthetic value. Temporal fields advance their clock.
    pub fn mock(&mut self, provider: &mut Provider) -> Result<Value, FieldError> {
        let value = match self {
            Self::Int(int) => int_to_value(int.generate(provider)),
            Self::Float(float) => Value::from(float.generate(provider)),
            Self::Str => Value::String(provider.word()),
            Self::StrInt(int) => Value::String(int.generate(provider).to_string()),
            Self::StrFloat(float) => Value::String(float_to_string(float.generate(provider))),
            Self::Datetime(datetime) => Value::String(datetime.generate()),
            Self::Timestamp(timestamp) => Value::from(timestamp.generate()),
            Self::StrTimestamp(timestamp) => Value::String(timestamp.generate().to_string()),
            Self::Fake(fake) => provider.call(&fake.method)?,
            Self::Dict(dict) => dict.mock(provider)?,
            Self::List(list) => list.mock(provider)?,
            Self::Custom(custom) => custom.mock(provider)?,
        };
        Ok(value)
    }

    /// Canonical descriptor for this field.
    pub fn descriptor(&self) -> Descriptor {
        match self {
            Self::Dict(dict) => dict.descriptor(),
            Self::List(list) => list.descriptor(),
            _ => Descriptor::Scalar(encode_scalar(
                self.type_name().unwrap_or_default(),
                &self.args(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_int_ranges() {
        assert_eq!(IntField::UINT8.min(), 0);
        assert_eq!(IntField::UINT8.max(), 255);
        assert_eq!(IntField::INT8.min(), -128);
        assert_eq!(IntField::INT8.max(), 127);
        assert_eq!(IntField::INT64.min(), i64::MIN as i128);
        assert_eq!(IntField::INT64.max(), i64::MAX as i128);
        assert_eq!(IntField::UINT64.max(), u64::MAX as i128);

        let odd = IntField::new(12, false).unwrap();
        assert_eq!(odd.max(), 4095);
    }

    #[test]
    fn test_int_width_validation() {
        assert!(IntField::new(0, true).is_err());
        assert!(IntField::new(65, false).is_err());
        assert!(IntField::new(1, false).is_ok());
    }

    #[test]
    fn test_int_mock_stays_in_range() {
        let mut provider = Provider::seeded(42);
        for (bits, signed) in [(8, false), (8, true), (16, true), (3, false), (64, false)] {
            let int = IntField::new(bits, signed).unwrap();
            let mut field = FieldSpec::Int(int);
            for _ in 0..500 {
                let value = field.mock(&mut provider).unwrap();
                let n = value
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| value.as_u64().map(i128::from))
                    .unwrap();
                assert!(n >= int.min() && n <= int.max(), "{n} outside {bits}/{signed}");
            }
        }
    }

    #[test]
    fn test_int_mock_avoids_timestamp_windows() {
        // About 3% of the UInt32 range reads as seconds near now.
        let mut provider = Provider::seeded(7);
        let mut uint32 = FieldSpec::uint32();
        let mut str_int = FieldSpec::str_int();
        let now = Utc::now();
        for _ in 0..2000 {
            let n = uint32.mock(&mut provider).unwrap().as_u64().unwrap();
            assert!(!reads_as_timestamp(i128::from(n), now), "{n} reads as a timestamp");

            let text = str_int.mock(&mut provider).unwrap();
            let n: i128 = text.as_str().unwrap().parse().unwrap();
            assert!(!reads_as_timestamp(n, now), "{n} reads as a timestamp");
        }
    }

    #[test]
    fn test_resolution_window() {
        let reference = DateTime::from_timestamp(1_680_441_525, 0).unwrap();
        assert!(Resolution::Seconds.in_window(1_680_441_525.0, reference));
        assert!(Resolution::Millis.in_window(1_680_441_525_000.0, reference));
        assert!(!Resolution::Seconds.in_window(1_680_441_525_000.0, reference));
        assert!(!Resolution::Nanos.in_window(1.0, reference));
        assert!(!Resolution::Seconds.in_window(-1_680_441_525.0, reference));

        let edge = (reference + TimeDelta::weeks(TIMESTAMP_WINDOW_WEEKS)).timestamp() as f64;
        assert!(!Resolution::Seconds.in_window(edge, reference));
        assert!(Resolution::Seconds.in_window(edge - 1.0, reference));
    }

    #[test]
    fn test_float_validation() {
        assert!(FloatField::new(0, 0).is_err());
        assert!(FloatField::new(10, 6).is_err());
        assert!(FloatField::new(5, 10).is_ok());
    }

    #[test]
    fn test_str_float_keeps_fraction() {
        assert_eq!(float_to_string(12.0), "12.0");
        assert_eq!(float_to_string(-3.25), "-3.25");

        let mut provider = Provider::seeded(1);
        let mut field = FieldSpec::str_float();
        for _ in 0..50 {
            let value = field.mock(&mut provider).unwrap();
            let text = value.as_str().unwrap();
            assert!(text.parse::<f64>().is_ok());
            assert!(!text.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_str_int_is_digits_or_signed() {
        let mut provider = Provider::seeded(3);
        let mut field = FieldSpec::StrInt(IntField::UINT16);
        for _ in 0..50 {
            let value = field.mock(&mut provider).unwrap();
            let n: u32 = value.as_str().unwrap().parse().unwrap();
            assert!(n <= 65535);
        }
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("3".parse::<Resolution>().unwrap(), Resolution::Millis);
        assert_eq!("9".parse::<Resolution>().unwrap(), Resolution::Nanos);
        assert!("4".parse::<Resolution>().is_err());
        assert!("ms".parse::<Resolution>().is_err());
        assert_eq!(Resolution::Micros.scale(), 1_000_000);
    }

    #[test]
    fn test_datetime_clock_is_monotonic() {
        let mut field = DatetimeField::new("%Y-%m-%d %H:%M:%S%.6f").unwrap();
        let mut previous: Option<NaiveDateTime> = None;
        for _ in 0..100 {
            let text = field.generate();
            let parsed = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.6f").unwrap();
            if let Some(prev) = previous {
                assert!(parsed > prev);
            }
            previous = Some(parsed);
        }
    }

    #[test]
    fn test_datetime_clock_ignores_dst_fall_back() {
        // 2026-11-01 01:00-02:00 occurs twice in US zones.
        let start = NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut field = DatetimeField::new(ISO_DATETIME_FORMAT)
            .unwrap()
            .with_step(TimeDelta::minutes(20))
            .unwrap()
            .starting_at(start);

        let values: Vec<String> = (0..9).map(|_| field.generate()).collect();
        assert_eq!(values[0], "2026-11-01T00:20:00");
        assert_eq!(values[8], "2026-11-01T03:00:00");
        assert!(values.windows(2).all(|pair| pair[1] > pair[0]));
        assert_eq!(values.iter().filter(|v| v.starts_with("2026-11-01T01:")).count(), 3);
        assert_eq!(field.clock(), start + TimeDelta::hours(3));
    }

    #[test]
    fn test_timestamp_clock_is_monotonic() {
        for resolution in Resolution::ALL {
            let step = TimeDelta::seconds(1);
            let mut field = TimestampField::new(resolution).with_step(step).unwrap();
            let mut previous = field.generate();
            for _ in 0..50 {
                let next = field.generate();
                assert!(next > previous);
                assert_eq!(next - previous, resolution.scale());
                previous = next;
            }
        }
    }

    #[test]
    fn test_timestamp_tracks_clock() {
        let mut field = TimestampField::new(Resolution::Seconds);
        let value = field.generate();
        assert_eq!(value, field.clock().timestamp());

        let mut field = TimestampField::new(Resolution::Millis);
        let value = field.generate();
        assert_eq!(value, field.clock().timestamp_millis());
    }

    #[test]
    fn test_clones_do_not_share_clock() {
        let mut original = TimestampField::new(Resolution::Nanos);
        let mut copy = original.clone();
        let first = original.generate();
        original.generate();
        assert_eq!(copy.generate(), first);
    }

    #[test]
    fn test_invalid_format_and_step() {
        assert!(DatetimeField::new("").is_err());
        assert!(DatetimeField::new("%Q").is_err());
        assert!(DatetimeField::new("%Y-%m-%d %H:%M:%S %z").is_err());
        assert!(TimestampField::new(Resolution::Seconds)
            .with_step(TimeDelta::zero())
            .is_err());
        assert!(DatetimeField::default()
            .with_step(TimeDelta::seconds(-1))
            .is_err());
    }

    #[test]
    fn test_scalar_descriptors() {
        let cases = vec![
            (FieldSpec::int(), "Int"),
            (FieldSpec::uint(), "UInt"),
            (FieldSpec::int8(), "Int8"),
            (FieldSpec::uint32(), "UInt32"),
            (FieldSpec::int_with(12, true).unwrap(), "Int_12"),
            (FieldSpec::int_with(12, false).unwrap(), "UInt_12"),
            (FieldSpec::float(), "Float_2_10"),
            (FieldSpec::float_with(3, 4).unwrap(), "Float_3_4"),
            (FieldSpec::string(), "Str"),
            (FieldSpec::str_int(), "StrInt"),
            (FieldSpec::StrInt(IntField::UINT8), "StrInt_8_unsigned"),
            (FieldSpec::str_float(), "StrFloat_2_10"),
            (
                FieldSpec::datetime(ISO_DATETIME_FORMAT).unwrap(),
                "Datetime_%Y-%m-%dT%H:%M:%S",
            ),
            (FieldSpec::timestamp(Resolution::Millis), "Timestamp_3"),
            (FieldSpec::str_timestamp(Resolution::Micros), "StrTimestamp_6"),
            (FieldSpec::fake("symbols").unwrap(), "Fake_symbols"),
        ];

        for (field, expected) in cases {
            assert_eq!(field.descriptor(), Descriptor::Scalar(expected.to_string()));
        }
    }

    #[test]
    fn test_step_is_encoded_only_when_not_default() {
        let field = FieldSpec::Timestamp(
            TimestampField::new(Resolution::Seconds)
                .with_step(TimeDelta::minutes(5))
                .unwrap(),
        );
        assert_eq!(field.descriptor(), Descriptor::from("Timestamp_0_5m"));
    }

    #[test]
    fn test_fake_uses_provider() {
        let mut provider = Provider::seeded(42);
        let mut field = FieldSpec::fake("word").unwrap();
        assert!(field.mock(&mut provider).unwrap().is_string());

        let mut missing = FieldSpec::fake("nope").unwrap();
        assert!(matches!(
            missing.mock(&mut provider),
            Err(FieldError::UnknownProviderMethod(_))
        ));
    }
}
