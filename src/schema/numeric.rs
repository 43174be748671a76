//! Numeric schema validation.
//!
//! This module provides [`NumberSchema`] for validating finite floats and
//! [`BigIntSchema`] for validating 128-bit integers, with ordered checks
//! like bounds, sign requirements, and divisibility.

use std::ops::RangeInclusive;

use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::coerce;
use crate::schema::traits::SchemaLike;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A check applied to number values.
#[derive(Clone)]
enum NumberCheck {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
    Gt { value: f64, message: Option<String> },
    Lt { value: f64, message: Option<String> },
    Int { message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
    MultipleOf { step: f64, message: Option<String> },
}

/// A schema for validating number values.
///
/// `NumberSchema` validates that values are finite numbers (`NaN` and the
/// infinities always fail the base check), then runs its checks in chain
/// order. The first failing check determines the reported issue. Negative
/// zero is a valid number; the sign checks treat it as zero.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::number().min(0.0).max(100.0);
///
/// assert!(schema.safe_parse(&Value::from(50.0)).is_success());
/// assert!(schema.safe_parse(&Value::from(-1.0)).is_failure());
/// assert!(schema.safe_parse(&Value::Number(f64::NAN)).is_failure());
/// ```
#[derive(Clone)]
pub struct NumberSchema {
    checks: Vec<NumberCheck>,
    type_error_message: Option<String>,
    coercing: bool,
}

impl NumberSchema {
    /// Creates a new number schema with no checks.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            type_error_message: None,
            coercing: false,
        }
    }

    /// Creates a number schema that coerces its input first.
    pub(crate) fn coercing() -> Self {
        Self {
            coercing: true,
            ..Self::new()
        }
    }

    /// Adds a minimum value check (inclusive).
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().min(5.0);
    /// assert!(schema.safe_parse(&Value::from(5.0)).is_success());
    /// assert!(schema.safe_parse(&Value::from(4.0)).is_failure());
    /// ```
    pub fn min(mut self, value: f64) -> Self {
        self.checks.push(NumberCheck::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum value check (inclusive).
    pub fn max(mut self, value: f64) -> Self {
        self.checks.push(NumberCheck::Max {
            value,
            message: None,
        });
        self
    }

    /// Adds a strictly-greater-than check.
    pub fn gt(mut self, value: f64) -> Self {
        self.checks.push(NumberCheck::Gt {
            value,
            message: None,
        });
        self
    }

    /// Adds a strictly-less-than check.
    pub fn lt(mut self, value: f64) -> Self {
        self.checks.push(NumberCheck::Lt {
            value,
            message: None,
        });
        self
    }

    /// Adds both minimum and maximum value checks (inclusive range).
    ///
    /// This is a convenience method equivalent to calling
    /// `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<f64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Requires the number to have no fractional part.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().int();
    /// assert!(schema.safe_parse(&Value::from(3.0)).is_success());
    /// assert!(schema.safe_parse(&Value::from(1.5)).is_failure());
    /// ```
    pub fn int(mut self) -> Self {
        self.checks.push(NumberCheck::Int { message: None });
        self
    }

    /// Requires the number to be greater than 0.
    pub fn positive(mut self) -> Self {
        self.checks.push(NumberCheck::Positive { message: None });
        self
    }

    /// Requires the number to be greater than or equal to 0.
    pub fn non_negative(mut self) -> Self {
        self.checks.push(NumberCheck::NonNegative { message: None });
        self
    }

    /// Requires the number to be less than 0.
    pub fn negative(mut self) -> Self {
        self.checks.push(NumberCheck::Negative { message: None });
        self
    }

    /// Requires the number to be a multiple of `step`.
    ///
    /// Divisibility uses the raw floating-point remainder. Steps that are
    /// not exactly representable (such as `0.1`) can therefore reject
    /// values that print like multiples.
    pub fn multiple_of(mut self, step: f64) -> Self {
        self.checks.push(NumberCheck::MultipleOf {
            step,
            message: None,
        });
        self
    }

    /// Sets a custom error message for the most recent check.
    ///
    /// If no checks have been added yet, this sets the type error message
    /// (used when the value is not a number, or cannot be coerced to one).
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().min(18.0).error("must be an adult age");
    /// let error = schema.parse(&Value::from(16.0)).unwrap_err();
    /// assert_eq!(error.first().message, "must be an adult age");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                NumberCheck::Min { message, .. } => message,
                NumberCheck::Max { message, .. } => message,
                NumberCheck::Gt { message, .. } => message,
                NumberCheck::Lt { message, .. } => message,
                NumberCheck::Int { message } => message,
                NumberCheck::Positive { message } => message,
                NumberCheck::NonNegative { message } => message,
                NumberCheck::Negative { message } => message,
                NumberCheck::MultipleOf { message, .. } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for NumberSchema {
    type Output = f64;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<f64> {
        let custom = self.type_error_message.as_deref();

        let coerced;
        let value = if self.coercing {
            match coerce::to_number(value) {
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

        let n = match value {
            Value::Number(n) if n.is_finite() => *n,
            Value::Number(n) => {
                let got = if n.is_nan() { "nan" } else { "infinity" };
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "number",
                        got,
                    },
                    custom,
                ));
            }
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "number",
                        got: other.kind_name(),
                    },
                    custom,
                ))
            }
        };

        for check in &self.checks {
            if let Some((violation, message)) = run_number_check(check, n) {
                return Validation::Failure(ValidationError::report(path, violation, message));
            }
        }

        Validation::Success(n)
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

fn fmt_number(n: f64) -> String {
    format!("{}", n)
}

/// Runs a single number check, returning the violation and any custom
/// message on failure.
fn run_number_check<'a>(check: &'a NumberCheck, n: f64) -> Option<(Violation, Option<&'a str>)> {
    match check {
        NumberCheck::Min { value, message } => {
            if n < *value {
                Some((
                    Violation::TooSmall {
                        min: fmt_number(*value),
                        actual: fmt_number(n),
                        exclusive: false,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::Max { value, message } => {
            if n > *value {
                Some((
                    Violation::TooLarge {
                        max: fmt_number(*value),
                        actual: fmt_number(n),
                        exclusive: false,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::Gt { value, message } => {
            if n <= *value {
                Some((
                    Violation::TooSmall {
                        min: fmt_number(*value),
                        actual: fmt_number(n),
                        exclusive: true,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::Lt { value, message } => {
            if n >= *value {
                Some((
                    Violation::TooLarge {
                        max: fmt_number(*value),
                        actual: fmt_number(n),
                        exclusive: true,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::Int { message } => {
            if n.fract() != 0.0 {
                Some((Violation::NotInteger { actual: n }, message.as_deref()))
            } else {
                None
            }
        }
        NumberCheck::Positive { message } => {
            if n <= 0.0 {
                Some((
                    Violation::WrongSign {
                        expected: "positive",
                        actual: fmt_number(n),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::NonNegative { message } => {
            if n < 0.0 {
                Some((
                    Violation::WrongSign {
                        expected: "nonnegative",
                        actual: fmt_number(n),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::Negative { message } => {
            if n >= 0.0 {
                Some((
                    Violation::WrongSign {
                        expected: "negative",
                        actual: fmt_number(n),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        NumberCheck::MultipleOf { step, message } => {
            if n % *step != 0.0 {
                Some((
                    Violation::NotMultipleOf {
                        step: *step,
                        actual: n,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
    }
}

/// A check applied to big integer values.
#[derive(Clone)]
enum BigIntCheck {
    Min { value: i128, message: Option<String> },
    Max { value: i128, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
}

/// A schema for validating big integer values.
///
/// `BigIntSchema` validates 128-bit integers with the same builder shape as
/// [`NumberSchema`]. Plain numbers never pass it; use
/// [`Schema::coerce`](crate::Schema::coerce)`.bigint()` to accept
/// integer-valued numbers and integer strings.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::bigint().positive();
/// assert!(schema.safe_parse(&Value::BigInt(7)).is_success());
/// assert!(schema.safe_parse(&Value::from(7.0)).is_failure());
/// ```
#[derive(Clone)]
pub struct BigIntSchema {
    checks: Vec<BigIntCheck>,
    type_error_message: Option<String>,
    coercing: bool,
}

impl BigIntSchema {
    /// Creates a new big integer schema with no checks.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            type_error_message: None,
            coercing: false,
        }
    }

    /// Creates a big integer schema that coerces its input first.
    pub(crate) fn coercing() -> Self {
        Self {
            coercing: true,
            ..Self::new()
        }
    }

    /// Adds a minimum value check (inclusive).
    pub fn min(mut self, value: i128) -> Self {
        self.checks.push(BigIntCheck::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum value check (inclusive).
    pub fn max(mut self, value: i128) -> Self {
        self.checks.push(BigIntCheck::Max {
            value,
            message: None,
        });
        self
    }

    /// Requires the integer to be greater than 0.
    pub fn positive(mut self) -> Self {
        self.checks.push(BigIntCheck::Positive { message: None });
        self
    }

    /// Requires the integer to be greater than or equal to 0.
    pub fn non_negative(mut self) -> Self {
        self.checks.push(BigIntCheck::NonNegative { message: None });
        self
    }

    /// Requires the integer to be less than 0.
    pub fn negative(mut self) -> Self {
        self.checks.push(BigIntCheck::Negative { message: None });
        self
    }

    /// Sets a custom error message for the most recent check, or the type
    /// error message if no checks have been added.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                BigIntCheck::Min { message, .. } => message,
                BigIntCheck::Max { message, .. } => message,
                BigIntCheck::Positive { message } => message,
                BigIntCheck::NonNegative { message } => message,
                BigIntCheck::Negative { message } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for BigIntSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for BigIntSchema {
    type Output = i128;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<i128> {
        let custom = self.type_error_message.as_deref();

        let coerced;
        let value = if self.coercing {
            match coerce::to_bigint(value) {
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

        let n = match value {
            Value::BigInt(n) => *n,
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "bigint",
                        got: other.kind_name(),
                    },
                    custom,
                ))
            }
        };

        for check in &self.checks {
            if let Some((violation, message)) = run_bigint_check(check, n) {
                return Validation::Failure(ValidationError::report(path, violation, message));
            }
        }

        Validation::Success(n)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::BigInt)
    }
}

/// Runs a single big integer check, returning the violation and any custom
/// message on failure.
fn run_bigint_check<'a>(check: &'a BigIntCheck, n: i128) -> Option<(Violation, Option<&'a str>)> {
    match check {
        BigIntCheck::Min { value, message } => {
            if n < *value {
                Some((
                    Violation::TooSmall {
                        min: value.to_string(),
                        actual: n.to_string(),
                        exclusive: false,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        BigIntCheck::Max { value, message } => {
            if n > *value {
                Some((
                    Violation::TooLarge {
                        max: value.to_string(),
                        actual: n.to_string(),
                        exclusive: false,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        BigIntCheck::Positive { message } => {
            if n <= 0 {
                Some((
                    Violation::WrongSign {
                        expected: "positive",
                        actual: n.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        BigIntCheck::NonNegative { message } => {
            if n < 0 {
                Some((
                    Violation::WrongSign {
                        expected: "nonnegative",
                        actual: n.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        BigIntCheck::Negative { message } => {
            if n >= 0 {
                Some((
                    Violation::WrongSign {
                        expected: "negative",
                        actual: n.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;

    fn unwrap_success<T>(v: ParseResult<T>) -> T {
        v.into_result().unwrap()
    }

    fn unwrap_failure<T: std::fmt::Debug>(v: ParseResult<T>) -> ValidationError {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_accepts_numbers() {
        let schema = NumberSchema::new();

        assert_eq!(unwrap_success(schema.safe_parse(&Value::from(42.0))), 42.0);
        assert_eq!(unwrap_success(schema.safe_parse(&Value::from(-1.5))), -1.5);
        assert_eq!(unwrap_success(schema.safe_parse(&Value::from(0.0))), 0.0);
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        let schema = NumberSchema::new();

        let error = unwrap_failure(schema.safe_parse(&Value::Number(f64::NAN)));
        assert_eq!(error.first().message, "expected number, got nan");

        let error = unwrap_failure(schema.safe_parse(&Value::Number(f64::INFINITY)));
        assert_eq!(error.first().message, "expected number, got infinity");

        assert!(schema
            .safe_parse(&Value::Number(f64::NEG_INFINITY))
            .is_failure());
    }

    #[test]
    fn test_rejects_non_number() {
        let schema = NumberSchema::new();

        let error = unwrap_failure(schema.safe_parse(&Value::from("42")));
        assert_eq!(error.first().kind, IssueKind::InvalidKind);
        assert_eq!(error.first().message, "expected number, got string");

        assert!(schema.safe_parse(&Value::Null).is_failure());
        assert!(schema.safe_parse(&Value::from(true)).is_failure());
        assert!(schema.safe_parse(&Value::BigInt(1)).is_failure());
    }

    #[test]
    fn test_min_max() {
        let schema = NumberSchema::new().min(5.0).max(10.0);

        assert!(schema.safe_parse(&Value::from(5.0)).is_success());
        assert!(schema.safe_parse(&Value::from(10.0)).is_success());

        let error = unwrap_failure(schema.safe_parse(&Value::from(4.0)));
        assert_eq!(error.first().message, "must be at least 5, got 4");

        let error = unwrap_failure(schema.safe_parse(&Value::from(11.0)));
        assert_eq!(error.first().message, "must be at most 10, got 11");
    }

    #[test]
    fn test_exclusive_bounds() {
        let schema = NumberSchema::new().gt(0.0).lt(1.0);

        assert!(schema.safe_parse(&Value::from(0.5)).is_success());

        let error = unwrap_failure(schema.safe_parse(&Value::from(0.0)));
        assert_eq!(error.first().message, "must be greater than 0, got 0");

        let error = unwrap_failure(schema.safe_parse(&Value::from(1.0)));
        assert_eq!(error.first().message, "must be less than 1, got 1");
    }

    #[test]
    fn test_range() {
        let schema = NumberSchema::new().range(5.0..=10.0);

        assert!(schema.safe_parse(&Value::from(7.0)).is_success());
        assert!(schema.safe_parse(&Value::from(4.0)).is_failure());
        assert!(schema.safe_parse(&Value::from(11.0)).is_failure());
    }

    #[test]
    fn test_int_check() {
        let schema = NumberSchema::new().int();

        assert!(schema.safe_parse(&Value::from(3.0)).is_success());
        assert!(schema.safe_parse(&Value::from(-2.0)).is_success());

        let error = unwrap_failure(schema.safe_parse(&Value::from(1.5)));
        assert_eq!(error.first().message, "expected an integer, got 1.5");
    }

    #[test]
    fn test_sign_checks() {
        assert!(NumberSchema::new()
            .positive()
            .safe_parse(&Value::from(0.1))
            .is_success());
        assert!(NumberSchema::new()
            .positive()
            .safe_parse(&Value::from(0.0))
            .is_failure());

        // Negative zero counts as zero for the sign checks.
        assert!(NumberSchema::new()
            .positive()
            .safe_parse(&Value::from(-0.0))
            .is_failure());
        assert!(NumberSchema::new()
            .non_negative()
            .safe_parse(&Value::from(-0.0))
            .is_success());

        assert!(NumberSchema::new()
            .negative()
            .safe_parse(&Value::from(-1.0))
            .is_success());
        assert!(NumberSchema::new()
            .negative()
            .safe_parse(&Value::from(0.0))
            .is_failure());
    }

    #[test]
    fn test_multiple_of() {
        let schema = NumberSchema::new().multiple_of(5.0);

        assert!(schema.safe_parse(&Value::from(10.0)).is_success());
        assert!(schema.safe_parse(&Value::from(0.0)).is_success());

        let error = unwrap_failure(schema.safe_parse(&Value::from(7.0)));
        assert_eq!(error.first().message, "must be a multiple of 5, got 7");
    }

    #[test]
    fn test_multiple_of_uses_raw_remainder() {
        // The raw float remainder of 0.3 % 0.1 is nonzero.
        let schema = NumberSchema::new().multiple_of(0.1);
        assert!(schema.safe_parse(&Value::from(0.3)).is_failure());
    }

    #[test]
    fn test_first_failing_check_wins() {
        let schema = NumberSchema::new().min(10.0).positive();

        // -5 violates both checks; only the first reports.
        let error = unwrap_failure(schema.safe_parse(&Value::from(-5.0)));
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().message, "must be at least 10, got -5");
    }

    #[test]
    fn test_custom_messages() {
        let schema = NumberSchema::new().min(18.0).error("must be an adult age");
        let error = unwrap_failure(schema.safe_parse(&Value::from(16.0)));
        assert_eq!(error.first().message, "must be an adult age");

        let schema = NumberSchema::new().error("must be a number");
        let error = unwrap_failure(schema.safe_parse(&Value::from("abc")));
        assert_eq!(error.first().message, "must be a number");
    }

    #[test]
    fn test_coercion() {
        let schema = NumberSchema::coercing();

        assert_eq!(
            unwrap_success(schema.safe_parse(&Value::from("  42 "))),
            42.0
        );
        assert_eq!(unwrap_success(schema.safe_parse(&Value::from(true))), 1.0);

        let error = unwrap_failure(schema.safe_parse(&Value::from("")));
        assert_eq!(error.first().kind, IssueKind::CoercionFailed);
    }

    #[test]
    fn test_coercion_feeds_checks() {
        let schema = NumberSchema::coercing().int().min(0.0);

        assert!(schema.safe_parse(&Value::from("7")).is_success());
        assert!(schema.safe_parse(&Value::from("7.5")).is_failure());
        assert!(schema.safe_parse(&Value::from("-7")).is_failure());
    }

    #[test]
    fn test_path_tracking() {
        let schema = NumberSchema::new().min(5.0);
        let path = IssuePath::root().push_field("user").push_field("age");

        let error = unwrap_failure(schema.validate(&Value::from(3.0), &path));
        assert_eq!(error.first().path.to_string(), "user.age");
    }

    #[test]
    fn test_bigint_accepts_bigints_only() {
        let schema = BigIntSchema::new();

        assert_eq!(
            unwrap_success(schema.safe_parse(&Value::BigInt(i128::MAX))),
            i128::MAX
        );

        let error = unwrap_failure(schema.safe_parse(&Value::from(7.0)));
        assert_eq!(error.first().message, "expected bigint, got number");
    }

    #[test]
    fn test_bigint_checks() {
        let schema = BigIntSchema::new().min(0).max(100);
        assert!(schema.safe_parse(&Value::BigInt(50)).is_success());
        assert!(schema.safe_parse(&Value::BigInt(-1)).is_failure());
        assert!(schema.safe_parse(&Value::BigInt(101)).is_failure());

        assert!(BigIntSchema::new()
            .positive()
            .safe_parse(&Value::BigInt(0))
            .is_failure());
        assert!(BigIntSchema::new()
            .negative()
            .safe_parse(&Value::BigInt(-3))
            .is_success());
    }

    #[test]
    fn test_bigint_coercion() {
        let schema = BigIntSchema::coercing();

        assert_eq!(unwrap_success(schema.safe_parse(&Value::from("123"))), 123);
        assert_eq!(unwrap_success(schema.safe_parse(&Value::from(-4.0))), -4);

        let error = unwrap_failure(schema.safe_parse(&Value::from(1.5)));
        assert_eq!(error.first().kind, IssueKind::CoercionFailed);
    }

    #[test]
    fn test_schema_clone() {
        let schema = NumberSchema::new().min(5.0).max(10.0);
        let cloned = schema.clone();
        assert!(cloned.safe_parse(&Value::from(7.0)).is_success());
    }
}
