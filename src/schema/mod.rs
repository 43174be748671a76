//! Schema definitions for validation.
//!
//! This module provides the schema types behind [`Schema`]'s factory
//! methods. Each schema validates one shape of [`Value`] and reports the
//! first failure it encounters, located by path. Composite schemas nest
//! other schemas; modifier wrappers change how an inner schema's result is
//! interpreted.
//!
//! # Example
//!
//! ```rust
//! use sluice::{Schema, SchemaLike, Value};
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.safe_parse(&Value::from("hello")).is_success());
//! assert!(schema.safe_parse(&Value::from("")).is_failure());
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::value::Value;

mod array;
mod coerce;
mod combinators;
mod modifiers;
mod numeric;
mod object;
mod primitives;
mod record;
mod ref_schema;
mod string;
mod traits;

pub use array::{ArraySchema, TupleSchema};
pub use coerce::Coerce;
pub use combinators::{
    DiscriminatedUnionSchema, IntersectionSchema, NullableSchema, NullishSchema, OptionalSchema,
    PipeSchema, UnionSchema, XorSchema,
};
pub use modifiers::{
    BrandSchema, CatchSchema, DefaultSchema, ReadonlySchema, RefineContext, RefineSchema,
    SuperRefineSchema, TransformSchema,
};
pub use numeric::{BigIntSchema, NumberSchema};
pub use object::ObjectSchema;
pub use primitives::{
    AnySchema, BooleanSchema, DateSchema, EnumSchema, LiteralSchema, NanSchema, NeverSchema,
    SymbolSchema, VoidSchema,
};
pub use record::{MapSchema, RecordSchema, SetSchema};
pub use ref_schema::RefSchema;
pub use string::StringSchema;
pub use traits::{SchemaLike, ValueValidator};

/// Error returned when composing schemas would silently lose a branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A field name is already defined on the receiving object schema.
    #[error("key '{0}' is already defined")]
    DuplicateKey(String),
    /// A discriminator tag value is already mapped to another branch.
    #[error("discriminator tag '{0}' is already mapped")]
    DuplicateTag(String),
}

/// Entry point for creating validation schemas.
///
/// `Schema` provides factory methods for every schema type. Each factory
/// returns a builder: constraint methods consume the schema and return an
/// extended copy, so partially built schemas can be shared and extended
/// independently.
///
/// # Example
///
/// ```rust
/// use sluice::Schema;
///
/// let username = Schema::string().min_len(3).max_len(20);
///
/// let email = Schema::string()
///     .email()
///     .error("must be a valid email address");
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    ///
    /// The returned schema accepts strings only. Builder methods add
    /// length, pattern, format, and content checks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::string().min_len(5);
    ///
    /// assert!(schema.safe_parse(&Value::from("hello")).is_success());
    /// assert!(schema.safe_parse(&Value::from("hi")).is_failure());
    /// ```
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new number schema.
    ///
    /// The returned schema accepts finite numbers; `NaN` and the
    /// infinities fail the type check. Builder methods add bound, sign,
    /// integrality, and step checks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::number().min(0.0).max(100.0);
    ///
    /// assert!(schema.safe_parse(&Value::from(50.0)).is_success());
    /// assert!(schema.safe_parse(&Value::from(-5.0)).is_failure());
    /// ```
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a new boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a new big integer schema.
    pub fn bigint() -> BigIntSchema {
        BigIntSchema::new()
    }

    /// Creates a new date schema.
    pub fn date() -> DateSchema {
        DateSchema::new()
    }

    /// Creates a new symbol schema.
    pub fn symbol() -> SymbolSchema {
        SymbolSchema::new()
    }

    /// Creates a schema accepting exactly one value.
    ///
    /// Equality is structural, and `NaN` equals `NaN` so a `NaN` literal
    /// is usable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::literal("admin");
    ///
    /// assert!(schema.safe_parse(&Value::from("admin")).is_success());
    /// assert!(schema.safe_parse(&Value::from("user")).is_failure());
    /// ```
    pub fn literal(expected: impl Into<Value>) -> LiteralSchema {
        LiteralSchema::new(expected)
    }

    /// Creates a schema accepting one of a fixed set of strings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::enumeration(["red", "green", "blue"]);
    ///
    /// assert!(schema.safe_parse(&Value::from("red")).is_success());
    /// assert!(schema.safe_parse(&Value::from("purple")).is_failure());
    /// ```
    pub fn enumeration<I, S>(variants: I) -> EnumSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumSchema::new(variants)
    }

    /// Creates a schema accepting any value, including `Null` and the
    /// absent value.
    pub fn any() -> AnySchema {
        AnySchema::new()
    }

    /// Creates a schema accepting any value.
    ///
    /// Identical to [`Schema::any`]; the separate name signals intent at
    /// call sites where an unconstrained input is deliberate.
    pub fn unknown() -> AnySchema {
        AnySchema::new()
    }

    /// Creates a schema accepting no value at all.
    pub fn never() -> NeverSchema {
        NeverSchema::new()
    }

    /// Creates a schema accepting only the absent value.
    pub fn void() -> VoidSchema {
        VoidSchema::new()
    }

    /// Creates a schema accepting only `NaN`.
    pub fn nan() -> NanSchema {
        NanSchema::new()
    }

    /// Creates an array schema with one element schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array(Schema::number().positive()).non_empty();
    ///
    /// let input = Value::from_json(json!([1.0, 2.5, 3.0]));
    /// assert!(schema.safe_parse(&input).is_success());
    ///
    /// let empty = Value::from_json(json!([]));
    /// assert!(schema.safe_parse(&empty).is_failure());
    /// ```
    pub fn array<S: SchemaLike>(element: S) -> ArraySchema<S> {
        ArraySchema::new(element)
    }

    /// Creates a tuple schema with one schema per position.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    /// use serde_json::json;
    ///
    /// let point = Schema::tuple(vec![
    ///     Schema::erase(Schema::number()),
    ///     Schema::erase(Schema::number()),
    /// ]);
    ///
    /// let input = Value::from_json(json!([1.0, 2.0]));
    /// assert!(point.safe_parse(&input).is_success());
    /// ```
    pub fn tuple(positions: Vec<Arc<dyn ValueValidator>>) -> TupleSchema {
        TupleSchema::new(positions)
    }

    /// Creates a new object schema.
    ///
    /// The returned schema accepts objects. Declared fields validate in
    /// declaration order; unknown keys are stripped unless the policy is
    /// changed with `strict`, `passthrough`, or `catchall`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("name", Schema::string().min_len(1))
    ///     .field("age", Schema::number().int().non_negative());
    ///
    /// let input = Value::from_json(json!({"name": "Alice", "age": 30}));
    /// assert!(schema.safe_parse(&input).is_success());
    ///
    /// let missing = Value::from_json(json!({"name": "Bob"}));
    /// assert!(schema.safe_parse(&missing).is_failure());
    /// ```
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a record schema validating every value against one schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    /// use serde_json::json;
    ///
    /// let scores = Schema::record(Schema::number().non_negative());
    ///
    /// let input = Value::from_json(json!({"alice": 10.0, "bob": 3.5}));
    /// assert!(scores.safe_parse(&input).is_success());
    /// ```
    pub fn record<V>(values: V) -> RecordSchema
    where
        V: SchemaLike + 'static,
    {
        RecordSchema::new(values)
    }

    /// Creates a record schema validating keys as well as values.
    pub fn record_with_keys<K, V>(keys: K, values: V) -> RecordSchema
    where
        K: SchemaLike + 'static,
        V: SchemaLike + 'static,
    {
        RecordSchema::with_keys(keys, values)
    }

    /// Creates a map schema over explicit key/value entry pairs.
    pub fn map<K, V>(keys: K, values: V) -> MapSchema
    where
        K: SchemaLike + 'static,
        V: SchemaLike + 'static,
    {
        MapSchema::new(keys, values)
    }

    /// Creates a set schema with one element schema.
    pub fn set<S: SchemaLike>(element: S) -> SetSchema<S> {
        SetSchema::new(element)
    }

    /// Creates a union trying each member in order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let id = Schema::union(vec![
    ///     Schema::erase(Schema::string().min_len(1)),
    ///     Schema::erase(Schema::number().int().positive()),
    /// ]);
    ///
    /// assert!(id.safe_parse(&Value::from("abc")).is_success());
    /// assert!(id.safe_parse(&Value::from(42.0)).is_success());
    /// assert!(id.safe_parse(&Value::from(false)).is_failure());
    /// ```
    pub fn union(members: Vec<Arc<dyn ValueValidator>>) -> UnionSchema {
        UnionSchema::new(members)
    }

    /// Creates a discriminated union dispatching on a tag field.
    ///
    /// Fails if two branches declare the same tag value.
    pub fn discriminated_union(
        key: impl Into<String>,
        branches: Vec<(Value, Arc<dyn ValueValidator>)>,
    ) -> Result<DiscriminatedUnionSchema, ShapeError> {
        DiscriminatedUnionSchema::new(key, branches)
    }

    /// Creates an intersection requiring both schemas to accept the input.
    ///
    /// The two outputs are merged; outputs that cannot merge fail.
    pub fn intersection<L, R>(left: L, right: R) -> IntersectionSchema
    where
        L: SchemaLike + 'static,
        R: SchemaLike + 'static,
    {
        IntersectionSchema::new(Arc::new(left), Arc::new(right))
    }

    /// Creates an exclusive union requiring exactly one member to accept.
    pub fn xor(members: Vec<Arc<dyn ValueValidator>>) -> XorSchema {
        XorSchema::new(members)
    }

    /// Creates a reference to a schema registered under `name`.
    ///
    /// References resolve through a [`SchemaRegistry`](crate::SchemaRegistry)
    /// during validation, which makes recursive shapes possible.
    pub fn reference(name: impl Into<String>) -> RefSchema {
        RefSchema::new(name)
    }

    /// Returns the factory for coercing schema variants.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, Value};
    ///
    /// let schema = Schema::coerce().number().min(0.0);
    /// assert_eq!(schema.parse(&Value::from("42")).unwrap(), 42.0);
    /// ```
    pub fn coerce() -> Coerce {
        Coerce
    }

    /// Erases a schema's output type for heterogeneous composition.
    ///
    /// Unions, tuples, and discriminated unions hold members of different
    /// schema types; erasure narrows them all to their `Value` output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::Schema;
    ///
    /// let members = vec![
    ///     Schema::erase(Schema::string()),
    ///     Schema::erase(Schema::number()),
    /// ];
    /// let either = Schema::union(members);
    /// ```
    pub fn erase(schema: impl SchemaLike + 'static) -> Arc<dyn ValueValidator> {
        Arc::new(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_produce_working_schemas() {
        assert!(Schema::string().safe_parse(&Value::from("x")).is_success());
        assert!(Schema::number().safe_parse(&Value::from(1.0)).is_success());
        assert!(Schema::boolean().safe_parse(&Value::from(true)).is_success());
        assert!(Schema::bigint().safe_parse(&Value::BigInt(1)).is_success());
        assert!(Schema::any().safe_parse(&Value::Null).is_success());
        assert!(Schema::unknown().safe_parse(&Value::Undefined).is_success());
        assert!(Schema::never().safe_parse(&Value::Null).is_failure());
        assert!(Schema::void().safe_parse(&Value::Undefined).is_success());
        assert!(Schema::nan()
            .safe_parse(&Value::Number(f64::NAN))
            .is_success());
    }

    #[test]
    fn test_shape_error_display() {
        assert_eq!(
            ShapeError::DuplicateKey("id".into()).to_string(),
            "key 'id' is already defined"
        );
        assert_eq!(
            ShapeError::DuplicateTag("circle".into()).to_string(),
            "discriminator tag 'circle' is already mapped"
        );
    }

    #[test]
    fn test_erase_preserves_behavior() {
        let erased = Schema::erase(Schema::string().min_len(2));
        let path = crate::path::IssuePath::root();
        let context = crate::validation::ValidationContext::detached();

        assert!(erased
            .validate_value_with_context(&Value::from("ok"), &path, &context)
            .is_success());
        assert!(erased
            .validate_value_with_context(&Value::from("x"), &path, &context)
            .is_failure());
    }
}
