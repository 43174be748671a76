//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating objects with a
//! typed shape, unknown-key policies, and shape transforms like `partial`,
//! `pick`, `omit`, and `merge`.

use std::sync::Arc;

use indexmap::IndexMap;
use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::combinators::OptionalSchema;
use crate::schema::traits::{SchemaLike, ValueValidator};
use crate::schema::ShapeError;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// How keys outside the declared shape are handled.
#[derive(Clone)]
enum UnknownKeys {
    /// Drop unknown keys from the output (default).
    Strip,
    /// Reject the object when unknown keys are present.
    Strict,
    /// Copy unknown keys to the output unvalidated.
    Passthrough,
    /// Validate unknown keys against a schema.
    Catchall(Arc<dyn ValueValidator>),
}

/// A schema for validating object values.
///
/// Fields validate in declaration order. A key absent from the input is
/// presented to its field schema as the absent value, so plain fields
/// reject missing keys while fields wrapped in `.optional()` or
/// `.default(...)` accept them. The first failing field stops validation.
///
/// Unknown keys are stripped from the output by default; [`strict`],
/// [`passthrough`], and [`catchall`] change that policy.
///
/// [`strict`]: ObjectSchema::strict
/// [`passthrough`]: ObjectSchema::passthrough
/// [`catchall`]: ObjectSchema::catchall
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::number().int().non_negative())
///     .field("email", Schema::string().email().optional());
///
/// let user = Value::from_json(serde_json::json!({
///     "name": "Alice",
///     "age": 30
/// }));
/// assert!(schema.safe_parse(&user).is_success());
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    shape: IndexMap<String, Arc<dyn ValueValidator>>,
    unknown_keys: UnknownKeys,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a new object schema with an empty shape.
    pub fn new() -> Self {
        Self {
            shape: IndexMap::new(),
            unknown_keys: UnknownKeys::Strip,
            type_error_message: None,
        }
    }

    /// Adds a field to the shape.
    ///
    /// Re-adding a name replaces the schema but keeps the original position.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.shape.insert(name.into(), Arc::new(schema));
        self
    }

    /// Rejects objects that carry keys outside the shape.
    ///
    /// All unexpected keys are reported in one issue, in input order.
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    /// Drops unknown keys from the output. This is the default policy.
    pub fn strip(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strip;
        self
    }

    /// Copies unknown keys to the output without validating them.
    pub fn passthrough(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Passthrough;
        self
    }

    /// Validates unknown keys against the given schema.
    pub fn catchall<S>(mut self, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.unknown_keys = UnknownKeys::Catchall(Arc::new(schema));
        self
    }

    /// Makes every field optional.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::object()
    ///     .field("name", Schema::string())
    ///     .partial();
    ///
    /// let empty = Value::from_json(serde_json::json!({}));
    /// assert!(schema.safe_parse(&empty).is_success());
    /// ```
    pub fn partial(mut self) -> Self {
        for validator in self.shape.values_mut() {
            *validator = Arc::new(OptionalSchema::new(validator.clone()));
        }
        self
    }

    /// Makes the named fields optional. Names not in the shape are ignored.
    pub fn partial_for(mut self, keys: &[&str]) -> Self {
        for (name, validator) in self.shape.iter_mut() {
            if keys.contains(&name.as_str()) {
                *validator = Arc::new(OptionalSchema::new(validator.clone()));
            }
        }
        self
    }

    /// Keeps only the named fields, preserving declaration order.
    pub fn pick(mut self, keys: &[&str]) -> Self {
        self.shape.retain(|name, _| keys.contains(&name.as_str()));
        self
    }

    /// Removes the named fields.
    pub fn omit(mut self, keys: &[&str]) -> Self {
        self.shape.retain(|name, _| !keys.contains(&name.as_str()));
        self
    }

    /// Adds all of `other`'s fields, replacing schemas for shared names.
    ///
    /// The receiver's unknown-key policy is kept.
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        for (name, validator) in other.shape {
            self.shape.insert(name, validator);
        }
        self
    }

    /// Adds all of `other`'s fields, failing on any shared name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::Schema;
    ///
    /// let base = Schema::object().field("id", Schema::number());
    /// let extended = base.clone().safe_extend(
    ///     Schema::object().field("name", Schema::string()),
    /// );
    /// assert!(extended.is_ok());
    ///
    /// let collision = base.safe_extend(
    ///     Schema::object().field("id", Schema::string()),
    /// );
    /// assert!(collision.is_err());
    /// ```
    pub fn safe_extend(mut self, other: ObjectSchema) -> Result<Self, ShapeError> {
        for (name, validator) in other.shape {
            if self.shape.contains_key(&name) {
                return Err(ShapeError::DuplicateKey(name));
            }
            self.shape.insert(name, validator);
        }
        Ok(self)
    }

    /// Combines two object schemas, with `other` winning shared names.
    ///
    /// Unlike [`extend`](ObjectSchema::extend), the merged schema also takes
    /// `other`'s unknown-key policy.
    pub fn merge(mut self, other: ObjectSchema) -> Self {
        for (name, validator) in other.shape {
            self.shape.insert(name, validator);
        }
        self.unknown_keys = other.unknown_keys;
        self
    }

    /// Returns the declared field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.shape.keys().map(String::as_str)
    }

    /// Sets a custom error message for type failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("shape", &self.shape.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl SchemaLike for ObjectSchema {
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

        // Declared fields validate in shape order; absent keys validate as
        // the absent value so optional wrappers and defaults can engage.
        for (name, validator) in &self.shape {
            let field_path = path.push_field(name);
            let field_value = fields.get(name).unwrap_or(&Value::Undefined);
            match validator.validate_value_with_context(field_value, &field_path, context) {
                Validation::Success(Value::Undefined) => {}
                Validation::Success(v) => {
                    validated.insert(name.clone(), v);
                }
                Validation::Failure(error) => return Validation::Failure(error),
            }
        }

        match &self.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => {
                for (key, extra) in fields {
                    if !self.shape.contains_key(key) {
                        validated.insert(key.clone(), extra.clone());
                    }
                }
            }
            UnknownKeys::Strict => {
                let extras: Vec<String> = fields
                    .keys()
                    .filter(|key| !self.shape.contains_key(*key))
                    .cloned()
                    .collect();
                if !extras.is_empty() {
                    return Validation::Failure(ValidationError::report(
                        path,
                        Violation::UnexpectedKeys { keys: extras },
                        self.type_error_message.as_deref(),
                    ));
                }
            }
            UnknownKeys::Catchall(schema) => {
                for (key, extra) in fields {
                    if !self.shape.contains_key(key) {
                        let field_path = path.push_field(key);
                        match schema.validate_value_with_context(extra, &field_path, context) {
                            Validation::Success(v) => {
                                validated.insert(key.clone(), v);
                            }
                            Validation::Failure(error) => return Validation::Failure(error),
                        }
                    }
                }
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
        for validator in self.shape.values() {
            validator.collect_refs(refs);
        }
        if let UnknownKeys::Catchall(schema) = &self.unknown_keys {
            schema.collect_refs(refs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use crate::schema::modifiers::DefaultSchema;
    use crate::schema::numeric::NumberSchema;
    use crate::schema::string::StringSchema;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        let mut fields = IndexMap::new();
        for (key, value) in pairs {
            fields.insert(key.to_string(), value);
        }
        Value::Object(fields)
    }

    fn unwrap_success<T>(v: ParseResult<T>) -> T {
        v.into_result().unwrap()
    }

    fn unwrap_failure<T: std::fmt::Debug>(v: ParseResult<T>) -> ValidationError {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_empty_shape_accepts_objects() {
        let schema = ObjectSchema::new();
        assert!(schema.safe_parse(&obj(vec![])).is_success());
    }

    #[test]
    fn test_rejects_non_objects() {
        let schema = ObjectSchema::new();

        let error = unwrap_failure(schema.safe_parse(&Value::from("not an object")));
        assert_eq!(error.first().kind, IssueKind::InvalidKind);
        assert_eq!(error.first().message, "expected object, got string");

        assert!(schema.safe_parse(&Value::Null).is_failure());
        assert!(schema.safe_parse(&Value::Array(vec![])).is_failure());
    }

    #[test]
    fn test_missing_field_reports_undefined() {
        let schema = ObjectSchema::new().field("name", StringSchema::new());

        let error = unwrap_failure(schema.safe_parse(&obj(vec![])));
        assert_eq!(error.first().path.to_string(), "name");
        assert_eq!(error.first().message, "expected string, got undefined");
    }

    #[test]
    fn test_validates_fields() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new().min_len(1))
            .field("age", NumberSchema::new().non_negative());

        let output = unwrap_success(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("age", Value::from(30.0)),
        ])));
        assert_eq!(output.get("name"), Some(&Value::from("Alice")));
        assert_eq!(output.get("age"), Some(&Value::from(30.0)));
    }

    #[test]
    fn test_first_invalid_field_reported() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new().min_len(5))
            .field("age", NumberSchema::new().positive());

        // Both fields are invalid; only the first in shape order reports.
        let error = unwrap_failure(schema.safe_parse(&obj(vec![
            ("name", Value::from("AB")),
            ("age", Value::from(-5.0)),
        ])));
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().path.to_string(), "name");
    }

    #[test]
    fn test_shape_order_drives_reporting() {
        let schema = ObjectSchema::new()
            .field("z", StringSchema::new())
            .field("a", StringSchema::new())
            .field("m", StringSchema::new());

        let error = unwrap_failure(schema.safe_parse(&obj(vec![])));
        assert_eq!(error.first().path.to_string(), "z");
    }

    #[test]
    fn test_optional_fields() {
        let schema =
            ObjectSchema::new().field("nickname", OptionalSchema::new(StringSchema::new()));

        // Absent optional field stays absent in the output.
        let output = unwrap_success(schema.safe_parse(&obj(vec![])));
        assert!(output.get("nickname").is_none());

        let output =
            unwrap_success(schema.safe_parse(&obj(vec![("nickname", Value::from("Bob"))])));
        assert_eq!(output.get("nickname"), Some(&Value::from("Bob")));

        // Present but invalid still fails.
        let error =
            unwrap_failure(schema.safe_parse(&obj(vec![("nickname", Value::from(1.0))])));
        assert_eq!(error.first().path.to_string(), "nickname");
    }

    #[test]
    fn test_default_fields() {
        let schema = ObjectSchema::new().field(
            "role",
            DefaultSchema::new(StringSchema::new(), Value::from("user")),
        );

        let output = unwrap_success(schema.safe_parse(&obj(vec![])));
        assert_eq!(output.get("role"), Some(&Value::from("user")));

        let output = unwrap_success(schema.safe_parse(&obj(vec![("role", Value::from("admin"))])));
        assert_eq!(output.get("role"), Some(&Value::from("admin")));
    }

    #[test]
    fn test_strip_is_default() {
        let schema = ObjectSchema::new().field("name", StringSchema::new());

        let output = unwrap_success(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("extra", Value::from("dropped")),
        ])));
        assert!(output.get("extra").is_none());
    }

    #[test]
    fn test_strict_reports_all_unknown_keys() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .strict();

        let error = unwrap_failure(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("extra", Value::from(1.0)),
            ("more", Value::from(2.0)),
        ])));
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().kind, IssueKind::UnexpectedKeys);
        assert_eq!(error.first().message, "unexpected keys: 'extra', 'more'");
    }

    #[test]
    fn test_passthrough_keeps_unknown_keys() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .passthrough();

        let output = unwrap_success(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("extra", Value::from(7.0)),
        ])));
        assert_eq!(output.get("extra"), Some(&Value::from(7.0)));
    }

    #[test]
    fn test_catchall_validates_unknown_keys() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .catchall(NumberSchema::new());

        let output = unwrap_success(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("count", Value::from(3.0)),
        ])));
        assert_eq!(output.get("count"), Some(&Value::from(3.0)));

        let error = unwrap_failure(schema.safe_parse(&obj(vec![
            ("name", Value::from("Alice")),
            ("count", Value::from("three")),
        ])));
        assert_eq!(error.first().path.to_string(), "count");
    }

    #[test]
    fn test_partial_makes_fields_optional() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .field("age", NumberSchema::new())
            .partial();

        assert!(schema.safe_parse(&obj(vec![])).is_success());
        assert!(schema
            .safe_parse(&obj(vec![("name", Value::from("Alice"))]))
            .is_success());

        // Present values still validate.
        let error = unwrap_failure(schema.safe_parse(&obj(vec![("age", Value::from("old"))])));
        assert_eq!(error.first().path.to_string(), "age");
    }

    #[test]
    fn test_partial_for_subset() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .field("age", NumberSchema::new())
            .partial_for(&["age"]);

        let error = unwrap_failure(schema.safe_parse(&obj(vec![])));
        assert_eq!(error.first().path.to_string(), "name");

        assert!(schema
            .safe_parse(&obj(vec![("name", Value::from("Alice"))]))
            .is_success());
    }

    #[test]
    fn test_pick_and_omit() {
        let base = ObjectSchema::new()
            .field("id", NumberSchema::new())
            .field("name", StringSchema::new())
            .field("email", StringSchema::new());

        let picked = base.clone().pick(&["id", "email"]);
        let keys: Vec<_> = picked.keys().collect();
        assert_eq!(keys, vec!["id", "email"]);
        assert!(picked
            .safe_parse(&obj(vec![
                ("id", Value::from(1.0)),
                ("email", Value::from("a@b.co")),
            ]))
            .is_success());

        let omitted = base.omit(&["email"]);
        let keys: Vec<_> = omitted.keys().collect();
        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn test_extend_replaces_shared_names() {
        let base = ObjectSchema::new().field("id", NumberSchema::new());
        let extended = base.extend(
            ObjectSchema::new()
                .field("id", StringSchema::new())
                .field("name", StringSchema::new()),
        );

        assert!(extended
            .safe_parse(&obj(vec![
                ("id", Value::from("u-1")),
                ("name", Value::from("Alice")),
            ]))
            .is_success());
    }

    #[test]
    fn test_safe_extend_rejects_collisions() {
        let base = ObjectSchema::new().field("id", NumberSchema::new());

        let ok = base
            .clone()
            .safe_extend(ObjectSchema::new().field("name", StringSchema::new()));
        assert!(ok.is_ok());

        let collision = base.safe_extend(ObjectSchema::new().field("id", StringSchema::new()));
        assert_eq!(collision.unwrap_err(), ShapeError::DuplicateKey("id".into()));
    }

    #[test]
    fn test_merge_takes_right_policy() {
        let left = ObjectSchema::new()
            .field("id", NumberSchema::new())
            .strict();
        let right = ObjectSchema::new()
            .field("name", StringSchema::new())
            .passthrough();

        let merged = left.merge(right);
        let output = unwrap_success(merged.safe_parse(&obj(vec![
            ("id", Value::from(1.0)),
            ("name", Value::from("Alice")),
            ("extra", Value::from(true)),
        ])));
        assert_eq!(output.get("extra"), Some(&Value::from(true)));
    }

    #[test]
    fn test_nested_path_tracking() {
        let inner = ObjectSchema::new().field("value", NumberSchema::new().positive());
        let middle = ObjectSchema::new().field("inner", inner);
        let outer = ObjectSchema::new().field("middle", middle);

        let error = unwrap_failure(outer.safe_parse(&obj(vec![(
            "middle",
            obj(vec![("inner", obj(vec![("value", Value::from(-5.0))]))]),
        )])));
        assert_eq!(error.first().path.to_string(), "middle.inner.value");
    }

    #[test]
    fn test_unicode_field_names() {
        let schema = ObjectSchema::new()
            .field("名前", StringSchema::new())
            .field("年齢", NumberSchema::new());

        assert!(schema
            .safe_parse(&obj(vec![
                ("名前", Value::from("太郎")),
                ("年齢", Value::from(25.0)),
            ]))
            .is_success());
    }

    #[test]
    fn test_custom_type_error_message() {
        let schema = ObjectSchema::new().error("must be a user object");
        let error = unwrap_failure(schema.safe_parse(&Value::from("nope")));
        assert_eq!(error.first().message, "must be a user object");
    }
}
