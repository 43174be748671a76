//! Primitive schema validation.
//!
//! This module provides the remaining leaf schemas: booleans, dates,
//! symbols, literal values, enumerations, and the special acceptance
//! schemas (`any`, `unknown`, `never`, `void`, `nan`).

use chrono::{DateTime, Utc};
use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::coerce;
use crate::schema::traits::SchemaLike;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A schema for validating boolean values.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::boolean();
/// assert_eq!(schema.parse(&Value::from(true)).unwrap(), true);
/// assert!(schema.safe_parse(&Value::from(1.0)).is_failure());
/// ```
#[derive(Clone)]
pub struct BooleanSchema {
    type_error_message: Option<String>,
    coercing: bool,
}

impl BooleanSchema {
    /// Creates a new boolean schema.
    pub fn new() -> Self {
        Self {
            type_error_message: None,
            coercing: false,
        }
    }

    /// Creates a boolean schema that coerces its input first.
    pub(crate) fn coercing() -> Self {
        Self {
            coercing: true,
            ..Self::new()
        }
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for BooleanSchema {
    type Output = bool;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<bool> {
        let custom = self.type_error_message.as_deref();

        let coerced;
        let value = if self.coercing {
            match coerce::to_boolean(value) {
                Ok(converted) => {
                    coerced = converted;
                    &coerced
                }
                Err(violation) => {
                    return Validation::Failure(ValidationError::report(path, violation, custom))
                }
            }
        } else {
            value
        };

        match value {
            Value::Bool(b) => Validation::Success(*b),
            other => Validation::Failure(ValidationError::report(
                path,
                Violation::InvalidKind {
                    expected: "boolean",
                    got: other.kind_name(),
                },
                custom,
            )),
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::Bool)
    }
}

/// A check applied to date values.
#[derive(Clone)]
enum DateCheck {
    Min {
        value: DateTime<Utc>,
        message: Option<String>,
    },
    Max {
        value: DateTime<Utc>,
        message: Option<String>,
    },
}

/// A schema for validating date values.
///
/// Dates are UTC timestamps. With coercion enabled the schema also accepts
/// RFC 3339 strings, `YYYY-MM-DD` strings, and epoch-millisecond numbers.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use sluice::{Schema, SchemaLike, Value};
///
/// let launch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let schema = Schema::date().min(launch);
///
/// let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// assert!(schema.safe_parse(&Value::Date(late)).is_success());
///
/// let early = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
/// assert!(schema.safe_parse(&Value::Date(early)).is_failure());
/// ```
#[derive(Clone)]
pub struct DateSchema {
    checks: Vec<DateCheck>,
    type_error_message: Option<String>,
    coercing: bool,
}

impl DateSchema {
    /// Creates a new date schema with no checks.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            type_error_message: None,
            coercing: false,
        }
    }

    /// Creates a date schema that coerces its input first.
    pub(crate) fn coercing() -> Self {
        Self {
            coercing: true,
            ..Self::new()
        }
    }

    /// Adds a minimum date check (inclusive).
    pub fn min(mut self, value: DateTime<Utc>) -> Self {
        self.checks.push(DateCheck::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum date check (inclusive).
    pub fn max(mut self, value: DateTime<Utc>) -> Self {
        self.checks.push(DateCheck::Max {
            value,
            message: None,
        });
        self
    }

    /// Sets a custom error message for the most recent check, or the type
    /// error message if no checks have been added.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                DateCheck::Min { message, .. } => message,
                DateCheck::Max { message, .. } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for DateSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for DateSchema {
    type Output = DateTime<Utc>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<DateTime<Utc>> {
        let custom = self.type_error_message.as_deref();

        let coerced;
        let value = if self.coercing {
            match coerce::to_date(value) {
                Ok(converted) => {
                    coerced = converted;
                    &coerced
                }
                Err(violation) => {
                    return Validation::Failure(ValidationError::report(path, violation, custom))
                }
            }
        } else {
            value
        };

        let date = match value {
            Value::Date(date) => *date,
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "date",
                        got: other.kind_name(),
                    },
                    custom,
                ))
            }
        };

        for check in &self.checks {
            match check {
                DateCheck::Min { value, message } => {
                    if date < *value {
                        return Validation::Failure(ValidationError::report(
                            path,
                            Violation::TooSmall {
                                min: value.to_rfc3339(),
                                actual: date.to_rfc3339(),
                                exclusive: false,
                            },
                            message.as_deref(),
                        ));
                    }
                }
                DateCheck::Max { value, message } => {
                    if date > *value {
                        return Validation::Failure(ValidationError::report(
                            path,
                            Violation::TooLarge {
                                max: value.to_rfc3339(),
                                actual: date.to_rfc3339(),
                                exclusive: false,
                            },
                            message.as_deref(),
                        ));
                    }
                }
            }
        }

        Validation::Success(date)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::Date)
    }
}

/// A schema for validating symbol values.
#[derive(Clone)]
pub struct SymbolSchema {
    type_error_message: Option<String>,
}

impl SymbolSchema {
    /// Creates a new symbol schema.
    pub fn new() -> Self {
        Self {
            type_error_message: None,
        }
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl Default for SymbolSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for SymbolSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<Value> {
        match value {
            Value::Symbol(_) => Validation::Success(value.clone()),
            other => Validation::Failure(ValidationError::report(
                path,
                Violation::InvalidKind {
                    expected: "symbol",
                    got: other.kind_name(),
                },
                self.type_error_message.as_deref(),
            )),
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
    }
}

/// A schema that accepts exactly one value.
///
/// Equality is deep, and a `NaN` literal matches `NaN` input.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::literal("admin");
/// assert!(schema.safe_parse(&Value::from("admin")).is_success());
/// assert!(schema.safe_parse(&Value::from("user")).is_failure());
/// ```
#[derive(Clone)]
pub struct LiteralSchema {
    expected: Value,
    message: Option<String>,
}

impl LiteralSchema {
    /// Creates a schema accepting only `expected`.
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
            message: None,
        }
    }

    /// Sets a custom error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for LiteralSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<Value> {
        if *value == self.expected {
            Validation::Success(value.clone())
        } else {
            Validation::Failure(ValidationError::report(
                path,
                Violation::InvalidLiteral {
                    expected: self.expected.stable_key(),
                    got: value.stable_key(),
                },
                self.message.as_deref(),
            ))
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
    }
}

/// A schema that accepts one of a fixed set of string variants.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::enumeration(["red", "green", "blue"]);
/// assert_eq!(schema.parse(&Value::from("green")).unwrap(), "green");
/// assert!(schema.safe_parse(&Value::from("yellow")).is_failure());
/// ```
#[derive(Clone)]
pub struct EnumSchema {
    variants: Vec<String>,
    message: Option<String>,
}

impl EnumSchema {
    /// Creates a schema accepting the given string variants.
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Returns the accepted variants.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Sets a custom error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for EnumSchema {
    type Output = String;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<String> {
        if let Value::String(s) = value {
            if self.variants.iter().any(|v| v == s) {
                return Validation::Success(s.clone());
            }
        }
        Validation::Failure(ValidationError::report(
            path,
            Violation::InvalidEnumValue {
                variants: self.variants.clone(),
                got: value.to_string(),
            },
            self.message.as_deref(),
        ))
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::String)
    }
}

/// A schema that accepts every value unchanged.
///
/// Both `Schema::any()` and `Schema::unknown()` build this schema.
#[derive(Clone, Default)]
pub struct AnySchema;

impl AnySchema {
    /// Creates a new accept-everything schema.
    pub fn new() -> Self {
        Self
    }
}

impl SchemaLike for AnySchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        _path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<Value> {
        Validation::Success(value.clone())
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
    }
}

/// A schema that rejects every value.
#[derive(Clone, Default)]
pub struct NeverSchema {
    message: Option<String>,
}

impl NeverSchema {
    /// Creates a new reject-everything schema.
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Sets a custom error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for NeverSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<Value> {
        Validation::Failure(ValidationError::report(
            path,
            Violation::InvalidKind {
                expected: "never",
                got: value.kind_name(),
            },
            self.message.as_deref(),
        ))
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
    }
}

/// A schema that accepts only the absent value.
#[derive(Clone, Default)]
pub struct VoidSchema {
    message: Option<String>,
}

impl VoidSchema {
    /// Creates a new void schema.
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Sets a custom error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for VoidSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<Value> {
        match value {
            Value::Undefined => Validation::Success(Value::Undefined),
            other => Validation::Failure(ValidationError::report(
                path,
                Violation::InvalidKind {
                    expected: "undefined",
                    got: other.kind_name(),
                },
                self.message.as_deref(),
            )),
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
    }
}

/// A schema that accepts only `NaN`.
///
/// Plain finite numbers fail this schema, and `NaN` fails every other
/// number schema, so the two are disjoint.
#[derive(Clone, Default)]
pub struct NanSchema {
    message: Option<String>,
}

impl NanSchema {
    /// Creates a new NaN schema.
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Sets a custom error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for NanSchema {
    type Output = f64;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<f64> {
        match value {
            Value::Number(n) if n.is_nan() => Validation::Success(*n),
            other => Validation::Failure(ValidationError::report(
                path,
                Violation::InvalidKind {
                    expected: "nan",
                    got: other.kind_name(),
                },
                self.message.as_deref(),
            )),
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::Number)
    }
}
