//! Step delta parsing for temporal fields.
//!
//! A step is written as an integer with an optional unit suffix:
//! - Plain numbers (interpreted as milliseconds): "5"
//! - Nanoseconds / microseconds / milliseconds: "10ns", "10us", "10ms"
//! - Seconds / minutes / hours: "30s", "5m", "1h"
//! - Days / weeks: "1d", "2w"

use crate::error::FieldError;
use chrono::TimeDelta;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Units from largest to smallest; `format_step` picks the first exact one.
const UNITS: [(&str, i64); 8] = [
    ("w", 7 * 86_400 * 1_000_000_000),
    ("d", 86_400 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("s", 1_000_000_000),
    ("ms", NANOS_PER_MILLI),
    ("us", 1_000),
    ("ns", 1),
];

/// Step applied to a temporal field's clock when none is given.
pub fn default_step() -> TimeDelta {
    TimeDelta::milliseconds(1)
}

/// Parse a step string like "1ms", "30s", "2h" or "5" into a strictly positive delta.
pub fn parse_step(s: &str) -> Result<TimeDelta, FieldError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(FieldError::malformed(s, "empty step"));
    }

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, unit) = s.split_at(split);

    let amount: i64 = num_str
        .parse()
        .map_err(|_| FieldError::malformed(s, format!("invalid step amount: {num_str:?}")))?;

    let factor = if unit.is_empty() {
        NANOS_PER_MILLI
    } else {
        UNITS
            .iter()
            .find(|(suffix, _)| *suffix == unit)
            .map(|(_, factor)| *factor)
            .ok_or_else(|| FieldError::malformed(s, format!("unknown step unit: {unit:?}")))?
    };

    let nanos = amount
        .checked_mul(factor)
        .ok_or_else(|| FieldError::malformed(s, "step out of range"))?;
    if nanos <= 0 {
        return Err(FieldError::malformed(s, "step must be positive"));
    }

    Ok(TimeDelta::nanoseconds(nanos))
}

/// Render a step in its shortest exact unit, e.g. 90s becomes "90s" and 120s becomes "2m".
///
/// Deltas beyond the nanosecond range fall back to whole milliseconds.
pub fn format_step(step: TimeDelta) -> String {
    match step.num_nanoseconds() {
        Some(nanos) => UNITS
            .iter()
            .find(|(_, factor)| nanos % factor == 0)
            .map(|(suffix, factor)| format!("{}{}", nanos / factor, suffix))
            .unwrap_or_else(|| format!("{nanos}ns")),
        None => format!("{}ms", step.num_milliseconds()),
    }
}
