//! Record, map, and set schema validation.
//!
//! Records are open objects validated by key and value schemas rather than
//! a fixed shape. Maps and sets validate the dedicated map and set value
//! variants, which allow non-string keys and carry uniqueness semantics.

use std::sync::Arc;

use indexmap::IndexMap;
use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::traits::{SchemaLike, ValueValidator};
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A schema for validating open objects keyed by arbitrary strings.
///
/// Every entry's value validates against the value schema. An optional key
/// schema validates each key as a string value; failures report at the
/// offending key's path.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let scores = Schema::record(Schema::number().non_negative());
///
/// let input = Value::from_json(serde_json::json!({"alice": 10, "bob": 7}));
/// assert!(scores.safe_parse(&input).is_success());
///
/// let bad = Value::from_json(serde_json::json!({"alice": -1}));
/// let error = scores.parse(&bad).unwrap_err();
/// assert_eq!(error.first().path.to_string(), "alice");
/// ```
#[derive(Clone)]
pub struct RecordSchema {
    values: Arc<dyn ValueValidator>,
    keys: Option<Arc<dyn ValueValidator>>,
    type_error_message: Option<String>,
}

impl RecordSchema {
    /// Creates a record schema validating values only.
    pub fn new<V>(values: V) -> Self
    where
        V: SchemaLike + 'static,
    {
        Self {
            values: Arc::new(values),
            keys: None,
            type_error_message: None,
        }
    }

    /// Creates a record schema validating both keys and values.
    pub fn with_keys<K, V>(keys: K, values: V) -> Self
    where
        K: SchemaLike + 'static,
        V: SchemaLike + 'static,
    {
        Self {
            values: Arc::new(values),
            keys: Some(Arc::new(keys)),
            type_error_message: None,
        }
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl SchemaLike for RecordSchema {
    type Output = IndexMap<String, Value>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<IndexMap<String, Value>> {
        let fields = match value.as_object() {
            Some(fields) => fields,
            None => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "object",
                        got: value.kind_name(),
                    },
                    self.type_error_message.as_deref(),
                ))
            }
        };

        let mut validated = IndexMap::new();
        for (key, entry) in fields {
            let entry_path = path.push_field(key);

            let mut output_key = key.clone();
            if let Some(key_schema) = &self.keys {
                let key_value = Value::String(key.clone());
                match key_schema.validate_value_with_context(&key_value, &entry_path, context) {
                    // A string output from the key schema becomes the output key.
                    Validation::Success(Value::String(rewritten)) => output_key = rewritten,
                    Validation::Success(_) => {}
                    Validation::Failure(error) => return Validation::Failure(error),
                }
            }

            match self
                .values
                .validate_value_with_context(entry, &entry_path, context)
            {
                Validation::Success(v) => {
                    validated.insert(output_key, v);
                }
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
            .map(Value::Object)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.values.collect_refs(refs);
        if let Some(keys) = &self.keys {
            keys.collect_refs(refs);
        }
    }
}

/// A schema for validating map values entry by entry.
///
/// Keys may be any value kind. Both the key and the value of each entry
/// validate at the entry's index path.
#[derive(Clone)]
pub struct MapSchema {
    key_schema: Arc<dyn ValueValidator>,
    value_schema: Arc<dyn ValueValidator>,
    type_error_message: Option<String>,
}

impl MapSchema {
    /// Creates a map schema from key and value schemas.
    pub fn new<K, V>(keys: K, values: V) -> Self
    where
        K: SchemaLike + 'static,
        V: SchemaLike + 'static,
    {
        Self {
            key_schema: Arc::new(keys),
            value_schema: Arc::new(values),
            type_error_message: None,
        }
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl SchemaLike for MapSchema {
    type Output = Vec<(Value, Value)>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Vec<(Value, Value)>> {
        let entries = match value {
            Value::Map(entries) => entries,
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "map",
                        got: other.kind_name(),
                    },
                    self.type_error_message.as_deref(),
                ))
            }
        };

        let mut validated = Vec::with_capacity(entries.len());
        for (index, (key, entry)) in entries.iter().enumerate() {
            let entry_path = path.push_index(index);

            let validated_key =
                match self
                    .key_schema
                    .validate_value_with_context(key, &entry_path, context)
                {
                    Validation::Success(k) => k,
                    Validation::Failure(error) => return Validation::Failure(error),
                };

            let validated_value = match self.value_schema.validate_value_with_context(
                entry,
                &entry_path,
                context,
            ) {
                Validation::Success(v) => v,
                Validation::Failure(error) => return Validation::Failure(error),
            };

            validated.push((validated_key, validated_value));
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
            .map(Value::Map)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.key_schema.collect_refs(refs);
        self.value_schema.collect_refs(refs);
    }
}

/// A check applied to set values.
#[derive(Clone)]
enum SetCheck {
    MinSize { min: usize, message: Option<String> },
    MaxSize { max: usize, message: Option<String> },
}

/// A schema for validating set values.
///
/// Size checks run first, then elements validate in order, then the
/// validated elements must be distinct.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::set(Schema::string()).min_size(1);
///
/// let input = Value::Set(vec![Value::from("a"), Value::from("b")]);
/// assert!(schema.safe_parse(&input).is_success());
///
/// let dupes = Value::Set(vec![Value::from("a"), Value::from("a")]);
/// assert!(schema.safe_parse(&dupes).is_failure());
/// ```
#[derive(Clone)]
pub struct SetSchema<S> {
    element: S,
    checks: Vec<SetCheck>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> SetSchema<S> {
    /// Creates a new set schema with the given element schema.
    pub fn new(element: S) -> Self {
        Self {
            element,
            checks: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires the set to have at least `min` elements.
    pub fn min_size(mut self, min: usize) -> Self {
        self.checks.push(SetCheck::MinSize { min, message: None });
        self
    }

    /// Requires the set to have at most `max` elements.
    pub fn max_size(mut self, max: usize) -> Self {
        self.checks.push(SetCheck::MaxSize { max, message: None });
        self
    }

    /// Sets a custom error message for the most recent check, or the type
    /// error message if no checks have been added.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            let slot = match last {
                SetCheck::MinSize { message, .. } => message,
                SetCheck::MaxSize { message, .. } => message,
            };
            *slot = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl<S: SchemaLike> SchemaLike for SetSchema<S> {
    type Output = Vec<Value>;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Vec<Value>> {
        let items = match value {
            Value::Set(items) => items,
            other => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "set",
                        got: other.kind_name(),
                    },
                    self.type_error_message.as_deref(),
                ))
            }
        };

        for check in &self.checks {
            let failed = match check {
                SetCheck::MinSize { min, message } if items.len() < *min => Some((
                    Violation::TooFewItems {
                        min: *min,
                        len: items.len(),
                    },
                    message.as_deref(),
                )),
                SetCheck::MaxSize { max, message } if items.len() > *max => Some((
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

        // Set elements must remain distinct after validation.
        let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for (index, item) in validated.iter().enumerate() {
            if let Some(first_index) = seen.insert(item.stable_key(), index) {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::DuplicateItems { index, first_index },
                    None,
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
            .map(Value::Set)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.element.collect_refs(refs);
    }
}
