//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! pre-transforms (trim, case folding), ordered checks (length bounds,
//! patterns, named formats), and optional input coercion.

use once_cell::sync::Lazy;
use regex::Regex;
use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::coerce;
use crate::schema::traits::SchemaLike;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("url regex is valid"));

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid regex is valid")
});

/// A transform applied to the string before any checks run.
#[derive(Debug, Clone, Copy)]
enum StringTransform {
    Trim,
    Lowercase,
    Uppercase,
}

/// A check applied to string values.
#[derive(Clone)]
enum StringCheck {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    ExactLength {
        len: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
    Url {
        message: Option<String>,
    },
    Uuid {
        message: Option<String>,
    },
    StartsWith {
        prefix: String,
        message: Option<String>,
    },
    EndsWith {
        suffix: String,
        message: Option<String>,
    },
    Contains {
        substring: String,
        message: Option<String>,
    },
}

/// A schema for validating string values.
///
/// `StringSchema` validates that values are strings, applies its transforms
/// (in chain order, before any check), then runs its checks in chain order.
/// The first failing check determines the reported issue; later checks are
/// not evaluated.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::string()
///     .trim()
///     .to_lowercase()
///     .min_len(3)
///     .max_len(20);
///
/// assert_eq!(schema.parse(&Value::from("  Ada  ")).unwrap(), "ada");
/// assert!(schema.safe_parse(&Value::from("ab")).is_failure());
/// ```
#[derive(Clone)]
pub struct StringSchema {
    transforms: Vec<StringTransform>,
    checks: Vec<StringCheck>,
    type_error_message: Option<String>,
    coercing: bool,
}

impl StringSchema {
    /// Creates a new string schema with no checks.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
            checks: Vec::new(),
            type_error_message: None,
            coercing: false,
        }
    }

    /// Creates a string schema that coerces its input first.
    ///
    /// Any present value converts via its canonical rendering; `Null` and
    /// `Undefined` fail with a coercion issue.
    pub(crate) fn coercing() -> Self {
        Self {
            coercing: true,
            ..Self::new()
        }
    }

    /// Trims leading and trailing whitespace before checks run.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().trim().min_len(1);
    /// assert!(schema.safe_parse(&Value::from("   ")).is_failure());
    /// ```
    pub fn trim(mut self) -> Self {
        self.transforms.push(StringTransform::Trim);
        self
    }

    /// Lowercases the string before checks run.
    pub fn to_lowercase(mut self) -> Self {
        self.transforms.push(StringTransform::Lowercase);
        self
    }

    /// Uppercases the string before checks run.
    pub fn to_uppercase(mut self) -> Self {
        self.transforms.push(StringTransform::Uppercase);
        self
    }

    /// Adds a minimum length check.
    ///
    /// Lengths count characters (Unicode scalar values), not bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().min_len(5);
    /// assert!(schema.safe_parse(&Value::from("hello")).is_success());
    /// assert!(schema.safe_parse(&Value::from("hi")).is_failure());
    /// ```
    pub fn min_len(mut self, min: usize) -> Self {
        self.checks
            .push(StringCheck::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length check.
    pub fn max_len(mut self, max: usize) -> Self {
        self.checks
            .push(StringCheck::MaxLength { max, message: None });
        self
    }

    /// Adds an exact length check.
    pub fn length(mut self, len: usize) -> Self {
        self.checks
            .push(StringCheck::ExactLength { len, message: None });
        self
    }

    /// Adds a regex pattern check.
    ///
    /// Returns an error if the pattern itself is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().pattern(r"^\d+$").unwrap();
    /// assert!(schema.safe_parse(&Value::from("12345")).is_success());
    /// assert!(schema.safe_parse(&Value::from("abc")).is_failure());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.checks.push(StringCheck::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Adds an email format check.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().email();
    /// assert!(schema.safe_parse(&Value::from("ada@example.com")).is_success());
    /// assert!(schema.safe_parse(&Value::from("not-an-email")).is_failure());
    /// ```
    pub fn email(mut self) -> Self {
        self.checks.push(StringCheck::Email { message: None });
        self
    }

    /// Adds a URL format check (`scheme://` form).
    pub fn url(mut self) -> Self {
        self.checks.push(StringCheck::Url { message: None });
        self
    }

    /// Adds a UUID format check (8-4-4-4-12 hex digits).
    pub fn uuid(mut self) -> Self {
        self.checks.push(StringCheck::Uuid { message: None });
        self
    }

    /// Requires the string to start with `prefix`.
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.checks.push(StringCheck::StartsWith {
            prefix: prefix.into(),
            message: None,
        });
        self
    }

    /// Requires the string to end with `suffix`.
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.checks.push(StringCheck::EndsWith {
            suffix: suffix.into(),
            message: None,
        });
        self
    }

    /// Requires the string to contain `substring`.
    pub fn contains(mut self, substring: impl Into<String>) -> Self {
        self.checks.push(StringCheck::Contains {
            substring: substring.into(),
            message: None,
        });
        self
    }

    /// Sets a custom error message for the most recent check.
    ///
    /// If no checks have been added yet, this sets the type error message
    /// (used when the value is not a string, or cannot be coerced to one).
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string()
    ///     .min_len(5)
    ///     .error("username must be at least 5 characters");
    ///
    /// let error = schema.parse(&Value::from("hi")).unwrap_err();
    /// assert_eq!(error.first().message, "username must be at least 5 characters");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                StringCheck::MinLength { message, .. } => message,
                StringCheck::MaxLength { message, .. } => message,
                StringCheck::ExactLength { message, .. } => message,
                StringCheck::Pattern { message, .. } => message,
                StringCheck::Email { message } => message,
                StringCheck::Url { message } => message,
                StringCheck::Uuid { message } => message,
                StringCheck::StartsWith { message, .. } => message,
                StringCheck::EndsWith { message, .. } => message,
                StringCheck::Contains { message, .. } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        _context: &ValidationContext,
    ) -> ParseResult<String> {
        let custom = self.type_error_message.as_deref();

        let coerced;
        let value = if self.coercing {
            match coerce::to_string(value) {
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

        let raw = match value {
            Value::String(s) => s,
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "string",
                        got: other.kind_name(),
                    },
                    custom,
                ))
            }
        };

        let mut s = raw.clone();
        for transform in &self.transforms {
            s = match transform {
                StringTransform::Trim => s.trim().to_string(),
                StringTransform::Lowercase => s.to_lowercase(),
                StringTransform::Uppercase => s.to_uppercase(),
            };
        }

        for check in &self.checks {
            if let Some((violation, message)) = run_check(check, &s) {
                return Validation::Failure(ValidationError::report(path, violation, message));
            }
        }

        Validation::Success(s)
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

/// Runs a single check, returning the violation and any custom message on
/// failure.
fn run_check<'a>(check: &'a StringCheck, value: &str) -> Option<(Violation, Option<&'a str>)> {
    match check {
        StringCheck::MinLength { min, message } => {
            let len = value.chars().count();
            if len < *min {
                Some((Violation::TooShort { min: *min, len }, message.as_deref()))
            } else {
                None
            }
        }
        StringCheck::MaxLength { max, message } => {
            let len = value.chars().count();
            if len > *max {
                Some((Violation::TooLong { max: *max, len }, message.as_deref()))
            } else {
                None
            }
        }
        StringCheck::ExactLength { len: expected, message } => {
            let len = value.chars().count();
            if len != *expected {
                Some((
                    Violation::WrongLength {
                        expected: *expected,
                        len,
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::Pattern {
            regex,
            pattern_str,
            message,
        } => {
            if !regex.is_match(value) {
                Some((
                    Violation::PatternMismatch {
                        pattern: pattern_str.clone(),
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::Email { message } => {
            if !EMAIL_REGEX.is_match(value) {
                Some((
                    Violation::InvalidFormat {
                        format: "email",
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::Url { message } => {
            if !URL_REGEX.is_match(value) {
                Some((
                    Violation::InvalidFormat {
                        format: "url",
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::Uuid { message } => {
            if !UUID_REGEX.is_match(value) {
                Some((
                    Violation::InvalidFormat {
                        format: "uuid",
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::StartsWith { prefix, message } => {
            if !value.starts_with(prefix.as_str()) {
                Some((
                    Violation::MissingPrefix {
                        prefix: prefix.clone(),
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::EndsWith { suffix, message } => {
            if !value.ends_with(suffix.as_str()) {
                Some((
                    Violation::MissingSuffix {
                        suffix: suffix.clone(),
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
        StringCheck::Contains { substring, message } => {
            if !value.contains(substring.as_str()) {
                Some((
                    Violation::MissingSubstring {
                        substring: substring.clone(),
                        got: value.to_string(),
                    },
                    message.as_deref(),
                ))
            } else {
                None
            }
        }
    }
}
