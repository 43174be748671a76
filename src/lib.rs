//! # Sluice
//!
//! A schema validation and transformation library. Schemas are built with
//! an immutable builder API, validate a dynamically typed [`Value`], and
//! report failures as path-aware issues with stable kinds and swappable
//! message text.
//!
//! ## Overview
//!
//! A schema describes one shape of data: a primitive with checks, a
//! composite over other schemas, or a wrapper that reinterprets an inner
//! schema's result. Validation walks the input top-down and stops at the
//! first failing check on each path, so an error always points at the
//! first thing wrong with its location spelled out (`users[0].email`).
//!
//! Schemas never mutate after construction: every builder method consumes
//! the schema and returns an extended copy, and a finished schema is
//! `Send + Sync`, shareable across threads without locks.
//!
//! ## Core Types
//!
//! - [`Value`]: the dynamically typed input and output of validation
//! - [`Schema`]: entry point for building schemas
//! - [`SchemaLike`]: the validation trait, with `parse`/`safe_parse` and
//!   the modifier methods
//! - [`ValidationError`]: a non-empty collection of located issues
//! - [`Codec`]: paired decode and encode validators
//! - [`SchemaRegistry`]: named schemas and reference resolution
//!
//! ## Example
//!
//! ```rust
//! use sluice::{Schema, SchemaLike, Value};
//! use serde_json::json;
//!
//! let user = Schema::object()
//!     .field("name", Schema::string().min_len(1))
//!     .field("age", Schema::number().int().non_negative())
//!     .field("email", Schema::string().email().optional());
//!
//! let input = Value::from_json(json!({"name": "Alice", "age": 30}));
//! assert!(user.safe_parse(&input).is_success());
//!
//! let bad = Value::from_json(json!({"name": "", "age": 30}));
//! let error = user.parse(&bad).unwrap_err();
//! assert_eq!(error.first().path.to_string(), "name");
//! assert_eq!(error.first().message, "length must be at least 1, got 0");
//! ```

pub mod codec;
pub mod error;
pub mod messages;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;
pub mod value;

pub use codec::Codec;
pub use error::{ErrorTree, FlattenedError, IssueKind, ValidationError, ValidationIssue, Violation};
pub use messages::{
    message_provider, set_message_provider, with_message_provider, DefaultMessages, MessageProvider,
};
pub use path::{IssuePath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    AnySchema, ArraySchema, BigIntSchema, BooleanSchema, BrandSchema, CatchSchema, Coerce,
    DateSchema, DefaultSchema, DiscriminatedUnionSchema, EnumSchema, IntersectionSchema,
    LiteralSchema, MapSchema, NanSchema, NeverSchema, NullableSchema, NullishSchema, NumberSchema,
    ObjectSchema, OptionalSchema, PipeSchema, ReadonlySchema, RecordSchema, RefSchema,
    RefineContext, RefineSchema, Schema, SchemaLike, SetSchema, ShapeError, StringSchema,
    SuperRefineSchema, SymbolSchema, TransformSchema, TupleSchema, UnionSchema, ValueValidator,
    VoidSchema, XorSchema,
};
pub use validation::{RegistryAccess, ValidationContext, DEFAULT_MAX_DEPTH};
pub use value::Value;

/// Result of a validation pass: the parsed output or a non-empty error.
pub type ParseResult<T> = stillwater::Validation<T, ValidationError>;
