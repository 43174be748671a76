//! Schema modifiers that wrap another schema's behavior.
//!
//! Modifiers come in two groups. The pipeline modifiers ([`RefineSchema`],
//! [`SuperRefineSchema`], [`TransformSchema`]) run custom logic on the inner
//! schema's output. The substitution modifiers ([`DefaultSchema`],
//! [`CatchSchema`]) replace inputs or failures with fixed values.
//! [`BrandSchema`] and [`ReadonlySchema`] tag a schema without changing
//! validation.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{ValidationError, ValidationIssue, Violation};
use crate::path::IssuePath;
use crate::schema::traits::SchemaLike;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// Issue collector handed to `super_refine` checks.
///
/// Issues default to the schema's own path; [`add_issue_at`] targets any
/// other path, typically a child field.
///
/// [`add_issue_at`]: RefineContext::add_issue_at
pub struct RefineContext {
    path: IssuePath,
    issues: Vec<ValidationIssue>,
}

impl RefineContext {
    pub(crate) fn new(path: IssuePath) -> Self {
        Self {
            path,
            issues: Vec::new(),
        }
    }

    /// Returns the path the refined schema is validating at.
    pub fn path(&self) -> &IssuePath {
        &self.path
    }

    /// Records an issue at the schema's own path.
    pub fn add_issue(&mut self, message: impl Into<String>) {
        let issue = ValidationIssue::custom(&self.path, message);
        self.issues.push(issue);
    }

    /// Records an issue at an explicit path.
    pub fn add_issue_at(&mut self, path: IssuePath, message: impl Into<String>) {
        self.issues.push(ValidationIssue::custom(&path, message));
    }

    /// Returns true if no issues have been recorded.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

/// Runs a predicate on the inner schema's output.
///
/// The predicate only sees values the inner schema accepted. A `false`
/// result reports a custom issue with the configured message.
#[derive(Clone)]
pub struct RefineSchema<S> {
    inner: S,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    message: String,
}

impl<S: SchemaLike> RefineSchema<S> {
    /// Creates a refinement over `inner`.
    pub fn new<F>(inner: S, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }
}

impl<S: SchemaLike> SchemaLike for RefineSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        match self
            .inner
            .validate_to_value_with_context(value, path, context)
        {
            Validation::Success(output) => {
                if (self.predicate)(&output) {
                    Validation::Success(output)
                } else {
                    Validation::Failure(ValidationError::single(ValidationIssue::custom(
                        path,
                        self.message.clone(),
                    )))
                }
            }
            Validation::Failure(error) => Validation::Failure(error),
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

/// Runs a multi-issue check on the inner schema's output.
///
/// The check receives a [`RefineContext`] and may record any number of
/// issues at any paths. Recording none passes the output through.
#[derive(Clone)]
pub struct SuperRefineSchema<S> {
    inner: S,
    check: Arc<dyn Fn(&Value, &mut RefineContext) + Send + Sync>,
}

impl<S: SchemaLike> SuperRefineSchema<S> {
    /// Creates a multi-issue refinement over `inner`.
    pub fn new<F>(inner: S, check: F) -> Self
    where
        F: Fn(&Value, &mut RefineContext) + Send + Sync + 'static,
    {
        Self {
            inner,
            check: Arc::new(check),
        }
    }
}

impl<S: SchemaLike> SchemaLike for SuperRefineSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        match self
            .inner
            .validate_to_value_with_context(value, path, context)
        {
            Validation::Success(output) => {
                let mut refine_context = RefineContext::new(path.clone());
                (self.check)(&output, &mut refine_context);
                if refine_context.is_clean() {
                    Validation::Success(output)
                } else {
                    Validation::Failure(ValidationError::from_vec(refine_context.into_issues()))
                }
            }
            Validation::Failure(error) => Validation::Failure(error),
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

/// Maps the inner schema's output through a fallible function.
#[derive(Clone)]
pub struct TransformSchema<S> {
    inner: S,
    transformer: Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>,
}

impl<S: SchemaLike> TransformSchema<S> {
    /// Creates a transform over `inner`.
    pub fn new<F>(inner: S, transformer: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            inner,
            transformer: Arc::new(transformer),
        }
    }
}

impl<S: SchemaLike> SchemaLike for TransformSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        match self
            .inner
            .validate_to_value_with_context(value, path, context)
        {
            Validation::Success(output) => match (self.transformer)(output) {
                Ok(transformed) => Validation::Success(transformed),
                Err(message) => Validation::Failure(ValidationError::of(
                    path,
                    Violation::TransformFailed { message },
                )),
            },
            Validation::Failure(error) => Validation::Failure(error),
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

/// Substitutes a fixed value when the input is exactly the absent value.
///
/// `Null` and every other input go to the inner schema untouched, and the
/// substitute itself is never validated.
#[derive(Clone)]
pub struct DefaultSchema<S> {
    inner: S,
    default: Value,
}

impl<S: SchemaLike> DefaultSchema<S> {
    /// Creates a defaulting wrapper around `inner`.
    pub fn new(inner: S, default: Value) -> Self {
        Self { inner, default }
    }
}

impl<S: SchemaLike> SchemaLike for DefaultSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        if value.is_undefined() {
            Validation::Success(self.default.clone())
        } else {
            self.inner
                .validate_to_value_with_context(value, path, context)
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

/// Replaces any inner failure with a fixed fallback value.
///
/// This absorbs failures at any depth, so a catch never fails.
#[derive(Clone)]
pub struct CatchSchema<S> {
    inner: S,
    fallback: Value,
}

impl<S: SchemaLike> CatchSchema<S> {
    /// Creates a catching wrapper around `inner`.
    pub fn new(inner: S, fallback: Value) -> Self {
        Self { inner, fallback }
    }
}

impl<S: SchemaLike> SchemaLike for CatchSchema<S> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        match self
            .inner
            .validate_to_value_with_context(value, path, context)
        {
            Validation::Success(output) => Validation::Success(output),
            Validation::Failure(_) => Validation::Success(self.fallback.clone()),
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

/// Tags a schema with a nominal brand. Validation delegates entirely.
#[derive(Clone)]
pub struct BrandSchema<S> {
    inner: S,
    tag: &'static str,
}

impl<S: SchemaLike> BrandSchema<S> {
    /// Creates a branded wrapper around `inner`.
    pub fn new(inner: S, tag: &'static str) -> Self {
        Self { inner, tag }
    }

    /// Returns the brand tag.
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

impl<S: SchemaLike> SchemaLike for BrandSchema<S> {
    type Output = S::Output;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<S::Output> {
        self.inner.validate_with_context(value, path, context)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.inner
            .validate_to_value_with_context(value, path, context)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs);
    }
}

/// Marks a schema's output as read-only. Validation delegates entirely.
#[derive(Clone)]
pub struct ReadonlySchema<S> {
    inner: S,
}

impl<S: SchemaLike> ReadonlySchema<S> {
    /// Creates a read-only wrapper around `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> SchemaLike for ReadonlySchema<S> {
    type Output = S::Output;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<S::Output> {
        self.inner.validate_with_context(value, path, context)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.inner
            .validate_to_value_with_context(value, path, context)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs);
    }
}
