//! Input coercion for primitive schemas.
//!
//! A coercing schema first converts the raw input to its target kind, then
//! runs the ordinary checks on the converted value. Conversions are
//! deterministic table lookups, not best-effort guesses: each rule either
//! produces a value of the target kind or fails with a
//! [`CoercionFailed`](crate::IssueKind::CoercionFailed) issue carrying the
//! target name and the rendered raw input.
//!
//! # Example
//!
//! ```rust
//! use sluice::{Schema, SchemaLike, Value};
//!
//! let schema = Schema::coerce().number();
//! assert_eq!(schema.parse(&Value::from("  42 ")).unwrap(), 42.0);
//! assert!(schema.safe_parse(&Value::from("")).is_failure());
//! ```

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::Violation;
use crate::schema::numeric::{BigIntSchema, NumberSchema};
use crate::schema::primitives::{BooleanSchema, DateSchema};
use crate::schema::string::StringSchema;
use crate::value::Value;

/// Largest absolute epoch-millisecond value accepted as a date.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Largest integer magnitude a float can represent contiguously.
const MAX_SAFE_INTEGER: i128 = 1 << 53;

/// Factory for coercing schema variants, reached via
/// [`Schema::coerce`](crate::Schema::coerce).
///
/// Each method returns the corresponding primitive schema with coercion
/// enabled; all the usual builder checks remain available.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::coerce().boolean();
/// assert_eq!(schema.parse(&Value::from("NO")).unwrap(), false);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Coerce;

impl Coerce {
    /// A string schema that first converts the input to a string.
    pub fn string(self) -> StringSchema {
        StringSchema::coercing()
    }

    /// A number schema that first converts the input to a number.
    pub fn number(self) -> NumberSchema {
        NumberSchema::coercing()
    }

    /// A boolean schema that first converts the input to a boolean.
    pub fn boolean(self) -> BooleanSchema {
        BooleanSchema::coercing()
    }

    /// A big integer schema that first converts the input to a big integer.
    pub fn bigint(self) -> BigIntSchema {
        BigIntSchema::coercing()
    }

    /// A date schema that first converts the input to a date.
    pub fn date(self) -> DateSchema {
        DateSchema::coercing()
    }
}

fn failed(target: &'static str, value: &Value) -> Violation {
    Violation::CoercionFailed {
        target,
        raw: value.to_string(),
    }
}

/// Converts any present value to a string via its canonical rendering.
///
/// `Null` and `Undefined` fail immediately.
pub(crate) fn to_string(value: &Value) -> Result<Value, Violation> {
    match value {
        Value::Undefined | Value::Null => Err(failed("string", value)),
        Value::String(_) => Ok(value.clone()),
        other => Ok(Value::String(other.to_string())),
    }
}

/// Converts strings, booleans, dates, and safe-range big integers to a
/// number.
///
/// String inputs are trimmed and parsed as a numeric literal; an empty
/// string fails, and so does any conversion producing `NaN`.
pub(crate) fn to_number(value: &Value) -> Result<Value, Violation> {
    let converted = match value {
        Value::Number(n) if !n.is_nan() => Some(*n),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        Value::Bool(true) => Some(1.0),
        Value::Bool(false) => Some(0.0),
        Value::Date(d) => Some(d.timestamp_millis() as f64),
        Value::BigInt(n) if *n >= -MAX_SAFE_INTEGER && *n <= MAX_SAFE_INTEGER => {
            Some(*n as f64)
        }
        _ => None,
    };
    converted
        .map(Value::Number)
        .ok_or_else(|| failed("number", value))
}

/// Converts recognized string tokens and the numbers 1 and 0 to a boolean.
///
/// Tokens are matched case-insensitively after trimming: `true`/`1`/`yes`
/// produce `true`, `false`/`0`/`no` produce `false`. Anything else fails.
pub(crate) fn to_boolean(value: &Value) -> Result<Value, Violation> {
    let converted = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        _ => None,
    };
    converted
        .map(Value::Bool)
        .ok_or_else(|| failed("boolean", value))
}

/// Converts integer strings, integer-valued numbers, and booleans to a big
/// integer.
///
/// Fractional numbers fail; so do strings with any non-integer content.
pub(crate) fn to_bigint(value: &Value) -> Result<Value, Violation> {
    let converted = match value {
        Value::BigInt(n) => Some(*n),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => {
            let as_int = *n as i128;
            if as_int as f64 == *n {
                Some(as_int)
            } else {
                None
            }
        }
        Value::Bool(true) => Some(1),
        Value::Bool(false) => Some(0),
        _ => None,
    };
    converted
        .map(Value::BigInt)
        .ok_or_else(|| failed("bigint", value))
}

/// Converts date strings and epoch-millisecond numbers to a date.
///
/// Strings are parsed as RFC 3339, falling back to a plain `YYYY-MM-DD`
/// calendar date at midnight UTC. Numbers outside the representable
/// millisecond range fail.
pub(crate) fn to_date(value: &Value) -> Result<Value, Violation> {
    let converted = match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => parse_date_string(s.trim()),
        Value::Number(n) if n.is_finite() && n.abs() <= MAX_EPOCH_MILLIS => {
            Utc.timestamp_millis_opt(n.trunc() as i64).single()
        }
        _ => None,
    };
    converted
        .map(Value::Date)
        .ok_or_else(|| failed("date", value))
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_renders_present_values() {
        assert_eq!(to_string(&Value::from(42.0)).unwrap(), Value::from("42"));
        assert_eq!(to_string(&Value::from(true)).unwrap(), Value::from("true"));
        assert_eq!(to_string(&Value::from("x")).unwrap(), Value::from("x"));
        assert!(to_string(&Value::Null).is_err());
        assert!(to_string(&Value::Undefined).is_err());
    }

    #[test]
    fn test_to_number_trims_strings() {
        assert_eq!(to_number(&Value::from("  42 ")).unwrap(), Value::from(42.0));
        assert_eq!(to_number(&Value::from("-1.5")).unwrap(), Value::from(-1.5));
        assert!(to_number(&Value::from("")).is_err());
        assert!(to_number(&Value::from("   ")).is_err());
        assert!(to_number(&Value::from("abc")).is_err());
    }

    #[test]
    fn test_to_number_booleans_and_bigints() {
        assert_eq!(to_number(&Value::from(true)).unwrap(), Value::from(1.0));
        assert_eq!(to_number(&Value::from(false)).unwrap(), Value::from(0.0));
        assert_eq!(to_number(&Value::BigInt(7)).unwrap(), Value::from(7.0));
        // Outside the contiguous float range conversion would lose digits.
        assert!(to_number(&Value::BigInt(i128::MAX)).is_err());
    }

    #[test]
    fn test_to_number_rejects_nan_results() {
        assert!(to_number(&Value::from("NaN")).is_err());
        assert!(to_number(&Value::Number(f64::NAN)).is_err());
    }

    #[test]
    fn test_to_boolean_tokens() {
        for token in ["true", "TRUE", "1", "yes", "Yes"] {
            assert_eq!(to_boolean(&Value::from(token)).unwrap(), Value::from(true));
        }
        for token in ["false", "0", "no", "NO"] {
            assert_eq!(
                to_boolean(&Value::from(token)).unwrap(),
                Value::from(false)
            );
        }
        assert!(to_boolean(&Value::from("maybe")).is_err());
        assert!(to_boolean(&Value::from("")).is_err());
    }

    #[test]
    fn test_to_boolean_numbers() {
        assert_eq!(to_boolean(&Value::from(1.0)).unwrap(), Value::from(true));
        assert_eq!(to_boolean(&Value::from(0.0)).unwrap(), Value::from(false));
        assert!(to_boolean(&Value::from(2.0)).is_err());
    }

    #[test]
    fn test_to_bigint() {
        assert_eq!(to_bigint(&Value::from(" 123 ")).unwrap(), Value::BigInt(123));
        assert_eq!(to_bigint(&Value::from(-4.0)).unwrap(), Value::BigInt(-4));
        assert_eq!(to_bigint(&Value::from(true)).unwrap(), Value::BigInt(1));
        assert!(to_bigint(&Value::from(1.5)).is_err());
        assert!(to_bigint(&Value::from("12.5")).is_err());
        assert!(to_bigint(&Value::from("")).is_err());
    }

    #[test]
    fn test_to_date_strings() {
        let full = to_date(&Value::from("2024-06-01T12:30:00Z")).unwrap();
        match full {
            Value::Date(d) => assert_eq!(d.to_rfc3339(), "2024-06-01T12:30:00+00:00"),
            other => panic!("expected date, got {:?}", other),
        }

        let day_only = to_date(&Value::from("2024-06-01")).unwrap();
        match day_only {
            Value::Date(d) => assert_eq!(d.to_rfc3339(), "2024-06-01T00:00:00+00:00"),
            other => panic!("expected date, got {:?}", other),
        }

        assert!(to_date(&Value::from("not a date")).is_err());
        assert!(to_date(&Value::from("2024-13-40")).is_err());
    }

    #[test]
    fn test_to_date_epoch_millis() {
        let epoch = to_date(&Value::from(0.0)).unwrap();
        match epoch {
            Value::Date(d) => assert_eq!(d.to_rfc3339(), "1970-01-01T00:00:00+00:00"),
            other => panic!("expected date, got {:?}", other),
        }
        assert!(to_date(&Value::from(9e15)).is_err());
    }

    #[test]
    fn test_coercion_violation_carries_target_and_raw() {
        let violation = to_number(&Value::from("abc")).unwrap_err();
        assert_eq!(
            violation,
            Violation::CoercionFailed {
                target: "number",
                raw: "abc".to_string(),
            }
        );
    }
}
