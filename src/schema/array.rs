//! Array and tuple schema validation.
//!
//! This module provides [`ArraySchema`] for validating homogeneous arrays
//! with length and uniqueness checks, and [`TupleSchema`] for fixed-length
//! arrays with a schema per position.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::traits::{SchemaLike, ValueValidator};
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A check applied to array values.
#[derive(Clone)]
enum ArrayCheck {
    ExactLength {
        len: usize,
        message: Option<String>,
    },
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Unique {
        message: Option<String>,
    },
    UniqueBy {
        key_fn: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
        message: Option<String>,
    },
}

/// A schema for validating array values.
///
/// `ArraySchema` checks that the value is an array, runs length checks, then
/// validates elements in order against the element schema. The first failing
/// element stops validation and reports at its index. Uniqueness checks run
/// last, over the validated elements.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::array(Schema::string().min_len(1))
///     .non_empty()
///     .max_len(10);
///
/// let tags = Value::Array(vec![Value::from("rust"), Value::from("parsing")]);
/// assert!(schema.safe_parse(&tags).is_success());
///
/// assert!(schema.safe_parse(&Value::Array(vec![])).is_failure());
/// ```
#[derive(Clone)]
pub struct ArraySchema<S> {
    element: S,
    checks: Vec<ArrayCheck>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates a new array schema with the given element schema.
    pub fn new(element: S) -> Self {
        Self {
            element,
            checks: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires the array to have exactly `len` items.
    pub fn length(mut self, len: usize) -> Self {
        self.checks
            .push(ArrayCheck::ExactLength { len, message: None });
        self
    }

    /// Requires the array to have at least `min` items.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::array(Schema::number()).min_len(2);
    ///
    /// let two = Value::Array(vec![Value::from(1.0), Value::from(2.0)]);
    /// assert!(schema.safe_parse(&two).is_success());
    ///
    /// let one = Value::Array(vec![Value::from(1.0)]);
    /// assert!(schema.safe_parse(&one).is_failure());
    /// ```
    pub fn min_len(mut self, min: usize) -> Self {
        self.checks
            .push(ArrayCheck::MinLength { min, message: None });
        self
    }

    /// Requires the array to have at most `max` items.
    pub fn max_len(mut self, max: usize) -> Self {
        self.checks
            .push(ArrayCheck::MaxLength { max, message: None });
        self
    }

    /// Requires the array to have at least one item.
    ///
    /// This is a convenience method equivalent to `.min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Requires all items to be distinct.
    ///
    /// Distinctness uses a stable serialized form of each validated item,
    /// so `NaN` equals `NaN` and `-0` equals `0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::array(Schema::string()).unique();
    ///
    /// let dupes = Value::Array(vec![Value::from("a"), Value::from("a")]);
    /// assert!(schema.safe_parse(&dupes).is_failure());
    /// ```
    pub fn unique(mut self) -> Self {
        self.checks.push(ArrayCheck::Unique { message: None });
        self
    }

    /// Requires all items to have distinct values for the given key function.
    ///
    /// Useful for arrays of objects where uniqueness applies to one field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::array(
    ///     Schema::object()
    ///         .field("id", Schema::number())
    ///         .field("name", Schema::string()),
    /// )
    /// .unique_by(|item| item.get("id").cloned().unwrap_or(Value::Null));
    /// ```
    pub fn unique_by<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.checks.push(ArrayCheck::UniqueBy {
            key_fn: Arc::new(key_fn),
            message: None,
        });
        self
    }

    /// Sets a custom error message for the most recent check.
    ///
    /// If no checks have been added yet, this sets the type error message
    /// (used when the value is not an array).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                ArrayCheck::ExactLength { message, .. } => message,
                ArrayCheck::MinLength { message, .. } => message,
                ArrayCheck::MaxLength { message, .. } => message,
                ArrayCheck::Unique { message } => message,
                ArrayCheck::UniqueBy { message, .. } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<Value>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Vec<Value>> {
        let items = match value.as_array() {
            Some(items) => items,
            None => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "array",
                        got: value.kind_name(),
                    },
                    self.type_error_message.as_deref(),
                ))
            }
        };

        // Length checks run before any element is visited.
        for check in &self.checks {
            let failed = match check {
                ArrayCheck::ExactLength { len, message } if items.len() != *len => Some((
                    Violation::WrongLength {
                        expected: *len,
                        len: items.len(),
                    },
                    message.as_deref(),
                )),
                ArrayCheck::MinLength { min, message } if items.len() < *min => Some((
                    Violation::TooFewItems {
                        min: *min,
                        len: items.len(),
                    },
                    message.as_deref(),
                )),
                ArrayCheck::MaxLength { max, message } if items.len() > *max => Some((
                    Violation::TooManyItems {
                        max: *max,
                        len: items.len(),
                    },
                    message.as_deref(),
                )),
                _ => None,
            };
            if let Some((violation, message)) = failed {
                return Validation::Failure(ValidationError::report(path, violation, message));
            }
        }

        // Elements validate in order; the first failure stops the walk.
        let mut validated = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = path.push_index(index);
            match self
                .element
                .validate_to_value_with_context(item, &item_path, context)
            {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(error) => return Validation::Failure(error),
            }
        }

        // Uniqueness checks run over the validated elements.
        for check in &self.checks {
            let failed = match check {
                ArrayCheck::Unique { message } => {
                    find_duplicate(&validated, |v| v.stable_key()).map(|d| (d, message.as_deref()))
                }
                ArrayCheck::UniqueBy { key_fn, message } => {
                    find_duplicate(&validated, |v| key_fn(v).stable_key())
                        .map(|d| (d, message.as_deref()))
                }
                _ => None,
            };
            if let Some(((index, first_index), message)) = failed {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::DuplicateItems { index, first_index },
                    message,
                ));
            }
        }

        Validation::Success(validated)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::Array)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.element.collect_refs(refs);
    }
}

/// Finds the first duplicated key, returning `(index, first_index)`.
fn find_duplicate<F>(items: &[Value], key_fn: F) -> Option<(usize, usize)>
where
    F: Fn(&Value) -> String,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        match seen.entry(key_fn(item)) {
            Entry::Occupied(first) => return Some((index, *first.get())),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }
    None
}

/// A schema for validating fixed-length arrays with one schema per position.
///
/// The input length must match the number of positions exactly; mismatches
/// report a tuple length issue rather than a range violation.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let point = Schema::tuple(vec![
///     Schema::erase(Schema::number()),
///     Schema::erase(Schema::number()),
/// ]);
///
/// let input = Value::Array(vec![Value::from(1.0), Value::from(2.0)]);
/// assert!(point.safe_parse(&input).is_success());
///
/// let short = Value::Array(vec![Value::from(1.0)]);
/// assert!(point.safe_parse(&short).is_failure());
/// ```
#[derive(Clone)]
pub struct TupleSchema {
    positions: Vec<Arc<dyn ValueValidator>>,
    type_error_message: Option<String>,
}

impl TupleSchema {
    /// Creates a new tuple schema from position schemas.
    pub fn new(positions: Vec<Arc<dyn ValueValidator>>) -> Self {
        Self {
            positions,
            type_error_message: None,
        }
    }

    /// Returns the number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the tuple has no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl SchemaLike for TupleSchema {
    type Output = Vec<Value>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Vec<Value>> {
        let items = match value.as_array() {
            Some(items) => items,
            None => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "array",
                        got: value.kind_name(),
                    },
                    self.type_error_message.as_deref(),
                ))
            }
        };

        if items.len() != self.positions.len() {
            return Validation::Failure(ValidationError::report(
                path,
                Violation::TupleLength {
                    expected: self.positions.len(),
                    received: items.len(),
                },
                self.type_error_message.as_deref(),
            ));
        }

        let mut validated = Vec::with_capacity(items.len());
        for (index, (schema, item)) in self.positions.iter().zip(items).enumerate() {
            let item_path = path.push_index(index);
            match schema.validate_value_with_context(item, &item_path, context) {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(error) => return Validation::Failure(error),
            }
        }

        Validation::Success(validated)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_with_context(value, path, context)
            .map(Value::Array)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for position in &self.positions {
            position.collect_refs(refs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use crate::schema::numeric::NumberSchema;
    use crate::schema::string::StringSchema;

    fn array_of(items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn unwrap_success<T>(v: ParseResult<T>) -> T {
        v.into_result().unwrap()
    }

    fn unwrap_failure<T: std::fmt::Debug>(v: ParseResult<T>) -> ValidationError {
        v.into_result().unwrap_err()
    }

    fn erase<S: SchemaLike + 'static>(schema: S) -> Arc<dyn ValueValidator> {
        Arc::new(schema)
    }

    #[test]
    fn test_accepts_arrays() {
        let schema = ArraySchema::new(StringSchema::new());

        let items = unwrap_success(schema.safe_parse(&array_of(vec![
            Value::from("hello"),
            Value::from("world"),
        ])));
        assert_eq!(items, vec![Value::from("hello"), Value::from("world")]);

        assert!(schema.safe_parse(&array_of(vec![])).is_success());
    }

    #[test]
    fn test_rejects_non_arrays() {
        let schema = ArraySchema::new(StringSchema::new());

        let error = unwrap_failure(schema.safe_parse(&Value::from("not an array")));
        assert_eq!(error.first().kind, IssueKind::InvalidKind);
        assert_eq!(error.first().message, "expected array, got string");

        assert!(schema.safe_parse(&Value::Null).is_failure());
        assert!(schema.safe_parse(&Value::from(42.0)).is_failure());
    }

    #[test]
    fn test_first_invalid_element_reported() {
        let schema = ArraySchema::new(NumberSchema::new().positive());

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![
            Value::from(1.0),
            Value::from(-2.0),
            Value::from(-3.0),
        ])));
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().path.to_string(), "[1]");
    }

    #[test]
    fn test_length_checks_run_before_elements() {
        // The element at index 0 is invalid, but the length check reports first.
        let schema = ArraySchema::new(NumberSchema::new().positive()).min_len(3);

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![Value::from(-1.0)])));
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().kind, IssueKind::RangeViolation);
        assert_eq!(error.first().message, "must have at least 3 items, got 1");
    }

    #[test]
    fn test_max_len_and_exact_length() {
        let schema = ArraySchema::new(StringSchema::new()).max_len(2);
        let error = unwrap_failure(schema.safe_parse(&array_of(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ])));
        assert_eq!(error.first().message, "must have at most 2 items, got 3");

        let schema = ArraySchema::new(StringSchema::new()).length(2);
        assert!(schema
            .safe_parse(&array_of(vec![Value::from("a"), Value::from("b")]))
            .is_success());
        let error = unwrap_failure(schema.safe_parse(&array_of(vec![Value::from("a")])));
        assert_eq!(error.first().message, "length must be exactly 2, got 1");
    }

    #[test]
    fn test_non_empty() {
        let schema = ArraySchema::new(StringSchema::new()).non_empty();

        assert!(schema
            .safe_parse(&array_of(vec![Value::from("a")]))
            .is_success());
        assert!(schema.safe_parse(&array_of(vec![])).is_failure());
    }

    #[test]
    fn test_unique() {
        let schema = ArraySchema::new(StringSchema::new()).unique();

        assert!(schema
            .safe_parse(&array_of(vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("c"),
            ]))
            .is_success());

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("a"),
        ])));
        assert_eq!(error.first().kind, IssueKind::DuplicateItems);
        assert_eq!(
            error.first().message,
            "duplicate item at index 2, first seen at index 0"
        );
    }

    #[test]
    fn test_unique_treats_nan_as_equal() {
        let schema = ArraySchema::new(crate::schema::primitives::NanSchema::new()).unique();

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![
            Value::Number(f64::NAN),
            Value::Number(f64::NAN),
        ])));
        assert_eq!(error.first().kind, IssueKind::DuplicateItems);
    }

    #[test]
    fn test_unique_runs_on_validated_output() {
        // Trimming makes " a " and "a" collide after validation.
        let schema = ArraySchema::new(StringSchema::new().trim()).unique();

        let error = unwrap_failure(
            schema.safe_parse(&array_of(vec![Value::from(" a "), Value::from("a")])),
        );
        assert_eq!(error.first().kind, IssueKind::DuplicateItems);
    }

    #[test]
    fn test_unique_by() {
        let schema = ArraySchema::new(
            crate::schema::object::ObjectSchema::new()
                .field("id", erase(NumberSchema::new()))
                .field("name", erase(StringSchema::new())),
        )
        .unique_by(|item| item.get("id").cloned().unwrap_or(Value::Null));

        let user = |id: f64, name: &str| {
            let mut fields = indexmap::IndexMap::new();
            fields.insert("id".to_string(), Value::from(id));
            fields.insert("name".to_string(), Value::from(name));
            Value::Object(fields)
        };

        assert!(schema
            .safe_parse(&array_of(vec![user(1.0, "Alice"), user(2.0, "Bob")]))
            .is_success());

        let error =
            unwrap_failure(schema.safe_parse(&array_of(vec![user(1.0, "Alice"), user(1.0, "Bob")])));
        assert_eq!(error.first().kind, IssueKind::DuplicateItems);
    }

    #[test]
    fn test_path_tracking_nested() {
        let inner = ArraySchema::new(NumberSchema::new().positive());
        let outer = ArraySchema::new(inner);

        let error = unwrap_failure(outer.safe_parse(&array_of(vec![array_of(vec![
            Value::from(1.0),
            Value::from(-2.0),
        ])])));
        assert_eq!(error.first().path.to_string(), "[0][1]");
    }

    #[test]
    fn test_custom_messages() {
        let schema = ArraySchema::new(StringSchema::new()).error("must be a list of tags");
        let error = unwrap_failure(schema.safe_parse(&Value::from("nope")));
        assert_eq!(error.first().message, "must be a list of tags");

        let schema = ArraySchema::new(StringSchema::new())
            .min_len(1)
            .error("at least one tag is required");
        let error = unwrap_failure(schema.safe_parse(&array_of(vec![])));
        assert_eq!(error.first().message, "at least one tag is required");

        let schema = ArraySchema::new(StringSchema::new())
            .unique()
            .error("tags must be unique");
        let error =
            unwrap_failure(schema.safe_parse(&array_of(vec![Value::from("a"), Value::from("a")])));
        assert_eq!(error.first().message, "tags must be unique");
    }

    #[test]
    fn test_tuple_accepts_matching_positions() {
        let schema = TupleSchema::new(vec![
            erase(StringSchema::new()),
            erase(NumberSchema::new()),
        ]);

        let items = unwrap_success(
            schema.safe_parse(&array_of(vec![Value::from("x"), Value::from(1.0)])),
        );
        assert_eq!(items, vec![Value::from("x"), Value::from(1.0)]);
    }

    #[test]
    fn test_tuple_length_mismatch() {
        let schema = TupleSchema::new(vec![
            erase(StringSchema::new()),
            erase(NumberSchema::new()),
        ]);

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![Value::from("x")])));
        assert_eq!(error.first().kind, IssueKind::TupleLength);
        assert_eq!(error.first().message, "expected 2 elements, got 1");

        let error = unwrap_failure(schema.safe_parse(&array_of(vec![
            Value::from("x"),
            Value::from(1.0),
            Value::from(2.0),
        ])));
        assert_eq!(error.first().kind, IssueKind::TupleLength);
    }

    #[test]
    fn test_tuple_position_errors() {
        let schema = TupleSchema::new(vec![
            erase(StringSchema::new()),
            erase(NumberSchema::new().positive()),
        ]);

        let error = unwrap_failure(
            schema.safe_parse(&array_of(vec![Value::from("x"), Value::from(-1.0)])),
        );
        assert_eq!(error.first().path.to_string(), "[1]");
    }

    #[test]
    fn test_tuple_rejects_non_array() {
        let schema = TupleSchema::new(vec![erase(StringSchema::new())]);
        let error = unwrap_failure(schema.safe_parse(&Value::from(1.0)));
        assert_eq!(error.first().kind, IssueKind::InvalidKind);
    }
}
