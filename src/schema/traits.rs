//! Traits for schema polymorphism.
//!
//! This module provides the [`SchemaLike`] trait that enables different schema
//! types (string, number, object, etc.) to be composed together for nested
//! validation, and the type-erased [`ValueValidator`] trait used wherever
//! heterogeneous schemas are stored together.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::path::IssuePath;
use crate::schema::combinators::{NullableSchema, NullishSchema, OptionalSchema, PipeSchema};
use crate::schema::modifiers::{
    BrandSchema, CatchSchema, DefaultSchema, ReadonlySchema, RefineContext, RefineSchema,
    SuperRefineSchema, TransformSchema,
};
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A trait for schema types that can validate values.
///
/// `SchemaLike` enables schema polymorphism, allowing different schema types
/// to be composed together for validating nested structures. Any type that
/// implements this trait can be used as a field schema in an `ObjectSchema`,
/// a member of a union, or the target of a modifier.
///
/// Validation is pure: a schema is immutable once built, and validating never
/// changes it. The `Send + Sync` bounds allow schemas to be safely shared
/// across threads and used in trait objects like `Arc<dyn ValueValidator>`.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// // Both StringSchema and NumberSchema implement SchemaLike,
/// // so they can be used as field schemas in an object schema.
/// let object = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::number().positive());
///
/// let input = Value::from(serde_json::json!({"name": "Ada", "age": 36}));
/// assert!(object.safe_parse(&input).is_success());
/// ```
pub trait SchemaLike: Send + Sync {
    /// The output type produced by successful validation.
    type Output;

    /// Validates a value at the given path, with reference context.
    ///
    /// Returns `Validation::Success` with the (possibly transformed) output
    /// on success, or `Validation::Failure` with the issues on failure.
    /// Schemas that contain no references ignore the context.
    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Self::Output>;

    /// Validates a value and returns the result as a [`Value`].
    ///
    /// This method allows schema types with different output types to be
    /// used uniformly wherever results are stored as `Value`.
    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value>;

    /// Validates a value at the given path without reference context.
    fn validate(&self, value: &Value, path: &IssuePath) -> ParseResult<Self::Output> {
        self.validate_with_context(value, path, &ValidationContext::detached())
    }

    /// Validates a value to a [`Value`] without reference context.
    fn validate_to_value(&self, value: &Value, path: &IssuePath) -> ParseResult<Value> {
        self.validate_to_value_with_context(value, path, &ValidationContext::detached())
    }

    /// Validates an input from the root, returning the full result.
    ///
    /// This is the non-panicking entry point: both outcomes are ordinary
    /// values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().min_len(1);
    /// assert!(schema.safe_parse(&Value::from("hi")).is_success());
    /// assert!(schema.safe_parse(&Value::from(42.0)).is_failure());
    /// ```
    fn safe_parse(&self, value: &Value) -> ParseResult<Self::Output> {
        self.validate(value, &IssuePath::root())
    }

    /// Validates an input from the root, returning a `Result`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().min(0.0);
    /// assert_eq!(schema.parse(&Value::from(7.0)).unwrap(), 7.0);
    /// assert!(schema.parse(&Value::from(-1.0)).is_err());
    /// ```
    fn parse(&self, value: &Value) -> Result<Self::Output, ValidationError> {
        self.safe_parse(value).into_result()
    }

    /// Collects the names of all schema references reachable from this
    /// schema into `refs`.
    ///
    /// Leaf schemas contain no references, so the default is a no-op.
    /// Composite schemas delegate to their children.
    fn collect_refs(&self, _refs: &mut Vec<String>) {}

    /// Returns a schema that also accepts `Undefined`, passing it through.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().optional();
    /// assert_eq!(schema.parse(&Value::Undefined).unwrap(), Value::Undefined);
    /// assert!(schema.safe_parse(&Value::Null).is_failure());
    /// ```
    fn optional(self) -> OptionalSchema<Self>
    where
        Self: Sized,
    {
        OptionalSchema::new(self)
    }

    /// Returns a schema that also accepts `Null`, passing it through.
    fn nullable(self) -> NullableSchema<Self>
    where
        Self: Sized,
    {
        NullableSchema::new(self)
    }

    /// Returns a schema that also accepts `Undefined` and `Null`, passing
    /// either through.
    fn nullish(self) -> NullishSchema<Self>
    where
        Self: Sized,
    {
        NullishSchema::new(self)
    }

    /// Returns a schema that substitutes `value` when the input is exactly
    /// `Undefined`.
    ///
    /// The substitute is returned as-is; the inner schema only sees inputs
    /// that were present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().default("x");
    /// assert_eq!(schema.parse(&Value::Undefined).unwrap(), Value::from("x"));
    /// assert_eq!(schema.parse(&Value::from("y")).unwrap(), Value::from("y"));
    /// ```
    fn default(self, value: impl Into<Value>) -> DefaultSchema<Self>
    where
        Self: Sized,
    {
        DefaultSchema::new(self, value.into())
    }

    /// Returns a schema that replaces any failure with `fallback`.
    ///
    /// This is the only construct that absorbs failures: the result is
    /// always a success.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().catch(-1.0);
    /// assert_eq!(schema.parse(&Value::from("oops")).unwrap(), Value::from(-1.0));
    /// ```
    fn catch(self, fallback: impl Into<Value>) -> CatchSchema<Self>
    where
        Self: Sized,
    {
        CatchSchema::new(self, fallback.into())
    }

    /// Returns a schema that additionally requires `predicate` to hold on
    /// this schema's output.
    ///
    /// The predicate runs only after this schema succeeds; its failure is
    /// reported as a custom validation issue carrying `message`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let even = Schema::number().refine(
    ///     |v| v.as_number().map_or(false, |n| n % 2.0 == 0.0),
    ///     "must be even",
    /// );
    /// assert!(even.safe_parse(&Value::from(4.0)).is_success());
    /// assert!(even.safe_parse(&Value::from(3.0)).is_failure());
    /// ```
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> RefineSchema<Self>
    where
        Self: Sized,
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        RefineSchema::new(self, predicate, message)
    }

    /// Returns a schema that runs `check` on this schema's output with an
    /// issue collector, allowing several issues at custom paths.
    ///
    /// The check runs only after this schema succeeds. If it adds no issues
    /// the output passes through unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::object()
    ///     .field("password", Schema::string())
    ///     .field("confirm", Schema::string())
    ///     .super_refine(|value, ctx| {
    ///         let fields = value.as_object().unwrap();
    ///         if fields.get("password") != fields.get("confirm") {
    ///             ctx.add_issue_at(ctx.path().push_field("confirm"), "passwords do not match");
    ///         }
    ///     });
    ///
    /// let bad = Value::from(serde_json::json!({"password": "a", "confirm": "b"}));
    /// assert!(schema.safe_parse(&bad).is_failure());
    /// ```
    fn super_refine<F>(self, check: F) -> SuperRefineSchema<Self>
    where
        Self: Sized,
        F: Fn(&Value, &mut RefineContext) + Send + Sync + 'static,
    {
        SuperRefineSchema::new(self, check)
    }

    /// Returns a schema that maps this schema's output through `transformer`.
    ///
    /// A transformer error becomes a transform issue at the schema's path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let upper = Schema::string().transform(|v| match v {
    ///     Value::String(s) => Ok(Value::from(s.to_uppercase())),
    ///     other => Ok(other),
    /// });
    /// assert_eq!(upper.parse(&Value::from("hi")).unwrap(), Value::from("HI"));
    /// ```
    fn transform<F>(self, transformer: F) -> TransformSchema<Self>
    where
        Self: Sized,
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        TransformSchema::new(self, transformer)
    }

    /// Returns a schema that feeds this schema's output into `next`.
    ///
    /// Useful after a coercion or transform, to validate the produced value:
    /// `Schema::coerce().number().pipe(Schema::number().int())`.
    fn pipe<B>(self, next: B) -> PipeSchema<Self, B>
    where
        Self: Sized,
        B: SchemaLike,
    {
        PipeSchema::new(self, next)
    }

    /// Tags this schema with a brand name. Validation is unchanged.
    fn brand(self, tag: &'static str) -> BrandSchema<Self>
    where
        Self: Sized,
    {
        BrandSchema::new(self, tag)
    }

    /// Marks this schema's output as read-only. Validation is unchanged.
    fn readonly(self) -> ReadonlySchema<Self>
    where
        Self: Sized,
    {
        ReadonlySchema::new(self)
    }
}

/// A type-erased trait for schemas that validate to [`Value`]s.
///
/// `ValueValidator` provides type erasure for schemas with different output
/// types, allowing them to be stored together in shapes, unions, tuples, and
/// the registry. Any type that implements `SchemaLike` automatically
/// implements `ValueValidator`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sluice::{Schema, ValueValidator};
///
/// let validators: Vec<Arc<dyn ValueValidator>> = vec![
///     Arc::new(Schema::string().min_len(1)),
///     Arc::new(Schema::number().positive()),
/// ];
/// ```
pub trait ValueValidator: Send + Sync {
    /// Validates a value and returns the result as a [`Value`].
    fn validate_value(&self, value: &Value, path: &IssuePath) -> ParseResult<Value>;

    /// Validates a value with reference context.
    fn validate_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value>;

    /// Appends reachable schema reference names to `refs`.
    ///
    /// The name differs from [`SchemaLike::collect_refs`] so that method
    /// calls stay unambiguous when both traits are in scope.
    fn append_refs(&self, refs: &mut Vec<String>);
}

/// Blanket implementation of `ValueValidator` for all `SchemaLike` types.
///
/// This allows any schema to be used as a `ValueValidator` without
/// additional code.
impl<S: SchemaLike> ValueValidator for S {
    fn validate_value(&self, value: &Value, path: &IssuePath) -> ParseResult<Value> {
        self.validate_to_value(value, path)
    }

    fn validate_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        self.validate_to_value_with_context(value, path, context)
    }

    fn append_refs(&self, refs: &mut Vec<String>) {
        SchemaLike::collect_refs(self, refs)
    }
}

/// Shared, erased validators are themselves schemas.
///
/// This lets wrappers like `OptionalSchema` hold erased children, which the
/// object schema's `partial` transformation relies on.
impl SchemaLike for Arc<dyn ValueValidator> {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        (**self).validate_value_with_context(value, path, context)
    }

    fn validate_to_value_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        (**self).validate_value_with_context(value, path, context)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        (**self).append_refs(refs)
    }
}
