//! Schema combinators for composing validation logic.
//!
//! This module provides the ways schemas combine:
//! - [`UnionSchema`]: the first matching member wins
//! - [`DiscriminatedUnionSchema`]: a tag field selects the member
//! - [`IntersectionSchema`]: both sides must match, outputs merge
//! - [`XorSchema`]: exactly one member must match
//! - [`OptionalSchema`], [`NullableSchema`], [`NullishSchema`]: absence
//!   wrappers that pass the sentinel through
//! - [`PipeSchema`]: one schema's output feeds the next
//!
//! # Example
//!
//! ```rust
//! use sluice::{Schema, SchemaLike, Value};
//!
//! let id = Schema::union(vec![
//!     Schema::erase(Schema::string().min_len(1)),
//!     Schema::erase(Schema::number().int().positive()),
//! ]);
//!
//! assert!(id.safe_parse(&Value::from("u-1")).is_success());
//! assert!(id.safe_parse(&Value::from(42.0)).is_success());
//! assert!(id.safe_parse(&Value::from(true)).is_failure());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use stillwater::prelude::Semigroup;
use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::traits::{SchemaLike, ValueValidator};
use crate::schema::ShapeError;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// Wraps a schema so the absent value passes through unchanged.
#[derive(Clone)]
pub struct OptionalSchema<S> {
    inner: S,
}

impl<S: SchemaLike> OptionalSchema<S> {
    /// Creates an optional wrapper around `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> SchemaLike for OptionalSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        if value.is_undefined() {
            Validation::Success(Value::Undefined)
        } else {
            self.inner.validate_to_value_with_context(value, path, context)
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs);
    }
}

/// Wraps a schema so `Null` passes through unchanged.
#[derive(Clone)]
pub struct NullableSchema<S> {
    inner: S,
}

impl<S: SchemaLike> NullableSchema<S> {
    /// Creates a nullable wrapper around `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> SchemaLike for NullableSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        if value.is_null() {
            Validation::Success(Value::Null)
        } else {
            self.inner.validate_to_value_with_context(value, path, context)
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs);
    }
}

/// Wraps a schema so both absence sentinels pass through unchanged.
#[derive(Clone)]
pub struct NullishSchema<S> {
    inner: S,
}

impl<S: SchemaLike> NullishSchema<S> {
    /// Creates a nullish wrapper around `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> SchemaLike for NullishSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        if value.is_undefined() || value.is_null() {
            Validation::Success(value.clone())
        } else {
            self.inner.validate_to_value_with_context(value, path, context)
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs);
    }
}

/// A schema that tries its members in order and keeps the first success.
///
/// On total failure the issue lists one reason per member, in member order.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::union(vec![
///     Schema::erase(Schema::string()),
///     Schema::erase(Schema::number()),
/// ]);
///
/// let error = schema.parse(&Value::from(true)).unwrap_err();
/// assert!(error.first().message.contains("no union member matched"));
/// ```
#[derive(Clone)]
pub struct UnionSchema {
    members: Vec<Arc<dyn ValueValidator>>,
    message: Option<String>,
}

impl UnionSchema {
    /// Creates a union over the given members.
    pub fn new(members: Vec<Arc<dyn ValueValidator>>) -> Self {
        Self {
            members,
            message: None,
        }
    }

    /// Sets a custom error message for the no-match failure.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for UnionSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        let mut reasons = Vec::with_capacity(self.members.len());
        for member in &self.members {
            match member.validate_value_with_context(value, path, context) {
                Validation::Success(v) => return Validation::Success(v),
                Validation::Failure(error) => reasons.push(error.first().message.clone()),
            }
        }
        Validation::Failure(ValidationError::report(
            path,
            Violation::UnionNoMatch { reasons },
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for member in &self.members {
            member.collect_refs(refs);
        }
    }
}

/// A union dispatched by a discriminator field.
///
/// The tag value selects the branch in constant time, and the selected
/// branch validates the whole object. Unknown and absent tags fail without
/// trying any branch.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let shape = Schema::discriminated_union(
///     "type",
///     vec![
///         (
///             Value::from("circle"),
///             Schema::erase(
///                 Schema::object()
///                     .field("type", Schema::literal("circle"))
///                     .field("radius", Schema::number().positive()),
///             ),
///         ),
///         (
///             Value::from("square"),
///             Schema::erase(
///                 Schema::object()
///                     .field("type", Schema::literal("square"))
///                     .field("side", Schema::number().positive()),
///             ),
///         ),
///     ],
/// )
/// .unwrap();
///
/// let circle = Value::from_json(serde_json::json!({"type": "circle", "radius": 2.0}));
/// assert!(shape.safe_parse(&circle).is_success());
/// ```
#[derive(Clone)]
pub struct DiscriminatedUnionSchema {
    key: String,
    branches: Vec<Arc<dyn ValueValidator>>,
    table: HashMap<String, usize>,
    tags: Vec<String>,
    message: Option<String>,
}

impl DiscriminatedUnionSchema {
    /// Creates a discriminated union keyed by `key`.
    ///
    /// Fails if two branches map the same tag value.
    pub fn new(
        key: impl Into<String>,
        branches: Vec<(Value, Arc<dyn ValueValidator>)>,
    ) -> Result<Self, ShapeError> {
        let key = key.into();
        let mut table = HashMap::with_capacity(branches.len());
        let mut tags = Vec::with_capacity(branches.len());
        let mut validators = Vec::with_capacity(branches.len());

        for (tag, validator) in branches {
            let display = tag.to_string();
            if table.insert(tag.stable_key(), validators.len()).is_some() {
                return Err(ShapeError::DuplicateTag(display));
            }
            tags.push(display);
            validators.push(validator);
        }

        Ok(Self {
            key,
            branches: validators,
            table,
            tags,
            message: None,
        })
    }

    /// Sets a custom error message for tag failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl std::fmt::Debug for DiscriminatedUnionSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscriminatedUnionSchema")
            .field("key", &self.key)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl SchemaLike for DiscriminatedUnionSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        let fields = match value.as_object() {
            Some(fields) => fields,
            None => {
                return Validation::Failure(ValidationError::report(
                    path,
                    Violation::InvalidKind {
                        expected: "object",
                        got: value.kind_name(),
                    },
                    self.message.as_deref(),
                ))
            }
        };

        let tag = fields.get(&self.key).unwrap_or(&Value::Undefined);
        match self.table.get(&tag.stable_key()) {
            Some(&index) => self.branches[index].validate_value_with_context(value, path, context),
            None => Validation::Failure(ValidationError::report(
                path,
                Violation::UnknownTag {
                    key: self.key.clone(),
                    tag: tag.to_string(),
                    known: self.tags.clone(),
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for branch in &self.branches {
            branch.collect_refs(refs);
        }
    }
}

/// A schema requiring both sides to accept the same input.
///
/// Both sides validate the raw input independently. When both succeed the
/// outputs merge: objects merge key by key recursively, equal values keep
/// the right side, and anything else is a conflict. When both fail, the
/// issues from both sides accumulate.
#[derive(Clone)]
pub struct IntersectionSchema {
    left: Arc<dyn ValueValidator>,
    right: Arc<dyn ValueValidator>,
    message: Option<String>,
}

impl IntersectionSchema {
    /// Creates an intersection of two schemas.
    pub fn new(left: Arc<dyn ValueValidator>, right: Arc<dyn ValueValidator>) -> Self {
        Self {
            left,
            right,
            message: None,
        }
    }

    /// Sets a custom error message for merge conflicts.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for IntersectionSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        let left = self.left.validate_value_with_context(value, path, context);
        let right = self.right.validate_value_with_context(value, path, context);

        match (left, right) {
            (Validation::Success(l), Validation::Success(r)) => match merge_outputs(l, r) {
                Ok(merged) => Validation::Success(merged),
                Err((left, right)) => Validation::Failure(ValidationError::report(
                    path,
                    Violation::IntersectionConflict { left, right },
                    self.message.as_deref(),
                )),
            },
            (Validation::Failure(e), Validation::Success(_))
            | (Validation::Success(_), Validation::Failure(e)) => Validation::Failure(e),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.left.collect_refs(refs);
        self.right.collect_refs(refs);
    }
}

/// Merges two intersection outputs, or reports the irreconcilable pair.
///
/// Object outputs deep-merge; any other pair must be structurally identical.
fn merge_outputs(left: Value, right: Value) -> Result<Value, (String, String)> {
    match (left, right) {
        (Value::Object(base), Value::Object(additions)) => {
            Ok(Value::Object(merge_objects(base, additions)))
        }
        (left, right) => {
            if left == right {
                Ok(right)
            } else {
                Err((left.stable_key(), right.stable_key()))
            }
        }
    }
}

/// Merges object outputs key by key. A key held by both sides recurses when
/// both values are nested objects; otherwise the right-hand value wins.
fn merge_objects(
    mut merged: IndexMap<String, Value>,
    additions: IndexMap<String, Value>,
) -> IndexMap<String, Value> {
    for (key, addition) in additions {
        if let Some(slot) = merged.get_mut(&key) {
            let existing = std::mem::replace(slot, Value::Undefined);
            *slot = match (existing, addition) {
                (Value::Object(base), Value::Object(incoming)) => {
                    Value::Object(merge_objects(base, incoming))
                }
                (_, incoming) => incoming,
            };
        } else {
            merged.insert(key, addition);
        }
    }
    merged
}

/// A schema requiring exactly one member to accept the input.
///
/// Every member is evaluated. Zero matches and multiple matches both fail,
/// the latter naming the matching branch positions.
#[derive(Clone)]
pub struct XorSchema {
    members: Vec<Arc<dyn ValueValidator>>,
    message: Option<String>,
}

impl XorSchema {
    /// Creates an exclusive union over the given members.
    pub fn new(members: Vec<Arc<dyn ValueValidator>>) -> Self {
        Self {
            members,
            message: None,
        }
    }

    /// Sets a custom error message for both failure modes.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaLike for XorSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        let mut matches: Vec<(usize, Value)> = Vec::new();
        for (index, member) in self.members.iter().enumerate() {
            if let Validation::Success(v) =
                member.validate_value_with_context(value, path, context)
            {
                matches.push((index, v));
            }
        }

        match matches.len() {
            1 => {
                let (_, v) = matches.remove(0);
                Validation::Success(v)
            }
            0 => Validation::Failure(ValidationError::report(
                path,
                Violation::XorNoMatch {
                    members: self.members.len(),
                },
                self.message.as_deref(),
            )),
            _ => Validation::Failure(ValidationError::report(
                path,
                Violation::XorAmbiguous {
                    indices: matches.iter().map(|(index, _)| *index).collect(),
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

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for member in &self.members {
            member.collect_refs(refs);
        }
    }
}

/// A schema that feeds one schema's output into another.
///
/// Both stages report at the same path; the second stage sees the first
/// stage's output rather than the raw input.
#[derive(Clone)]
pub struct PipeSchema<A, B> {
    first: A,
    second: B,
}

impl<A: SchemaLike, B: SchemaLike> PipeSchema<A, B> {
    /// Creates a pipeline from `first` into `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: SchemaLike, B: SchemaLike> SchemaLike for PipeSchema<A, B> {
    type Output = B::Output;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<B::Output> {
        match self.first.validate_to_value_with_context(value, path, context) {
            Validation::Success(mid) => self.second.validate_with_context(&mid, path, context),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        match self.first.validate_to_value_with_context(value, path, context) {
            Validation::Success(mid) => {
                self.second.validate_to_value_with_context(&mid, path, context)
            }
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.first.collect_refs(refs);
        self.second.collect_refs(refs);
    }
}
