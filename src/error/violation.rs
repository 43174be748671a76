//! The violation taxonomy.
//!
//! This module provides [`Violation`], which describes every way a value can
//! fail validation along with the parameters message rendering needs, and
//! [`IssueKind`], the flat machine-readable classification derived from it.

use std::fmt::{self, Display};

/// Machine-readable classification of a validation issue.
///
/// Every [`Violation`] maps to exactly one kind via [`Violation::kind`].
/// The set of kinds grows over time, so downstream matches need a wildcard
/// arm.
///
/// # Example
///
/// ```rust
/// use sluice::IssueKind;
///
/// assert_eq!(IssueKind::CoercionFailed.to_string(), "coercion_failed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IssueKind {
    /// The value's kind did not match (e.g. string where number expected)
    InvalidKind,
    /// The value did not equal the required literal
    InvalidLiteral,
    /// The value was not one of the allowed variants
    InvalidEnumValue,
    /// A bound on length, size, or magnitude was violated
    RangeViolation,
    /// A string did not match the required format or pattern
    FormatViolation,
    /// A number was not a multiple of the required step
    NotMultipleOf,
    /// A collection contained duplicate items
    DuplicateItems,
    /// A coercing validator could not convert the input
    CoercionFailed,
    /// An object contained keys outside its shape in strict mode
    UnexpectedKeys,
    /// A tuple had the wrong number of elements
    TupleLength,
    /// No union member accepted the value
    UnionNoMatch,
    /// No exclusive-or branch accepted the value
    XorNoMatch,
    /// More than one exclusive-or branch accepted the value
    XorAmbiguous,
    /// Intersection branches produced results that cannot be merged
    IntersectionError,
    /// A schema reference could not be resolved
    ReferenceError,
    /// A refinement predicate rejected the value
    CustomValidationError,
    /// A transformation step failed
    TransformError,
    /// A synchronous operation was invoked on an asynchronous codec
    CodecAsyncNotSupported,
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            IssueKind::InvalidKind => "invalid_kind",
            IssueKind::InvalidLiteral => "invalid_literal",
            IssueKind::InvalidEnumValue => "invalid_enum_value",
            IssueKind::RangeViolation => "range_violation",
            IssueKind::FormatViolation => "format_violation",
            IssueKind::NotMultipleOf => "not_multiple_of",
            IssueKind::DuplicateItems => "duplicate_items",
            IssueKind::CoercionFailed => "coercion_failed",
            IssueKind::UnexpectedKeys => "unexpected_keys",
            IssueKind::TupleLength => "tuple_length",
            IssueKind::UnionNoMatch => "union_no_match",
            IssueKind::XorNoMatch => "xor_no_match",
            IssueKind::XorAmbiguous => "xor_ambiguous",
            IssueKind::IntersectionError => "intersection_error",
            IssueKind::ReferenceError => "reference_error",
            IssueKind::CustomValidationError => "custom_validation_error",
            IssueKind::TransformError => "transform_error",
            IssueKind::CodecAsyncNotSupported => "codec_async_not_supported",
        };
        write!(f, "{}", code)
    }
}

/// A structured description of a single validation failure.
///
/// Violations carry the raw parameters of the failure (bounds, lengths,
/// offending values already rendered to strings). Message text is produced
/// from them by a [`MessageProvider`](crate::MessageProvider) at the moment
/// the issue is reported, so violations themselves contain no prose.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Violation {
    /// Value kind mismatch
    InvalidKind {
        expected: &'static str,
        got: &'static str,
    },
    /// Value does not equal the literal, both rendered for display
    InvalidLiteral { expected: String, got: String },
    /// Value is not one of the allowed variants
    InvalidEnumValue { variants: Vec<String>, got: String },
    /// String shorter than the minimum length
    TooShort { min: usize, len: usize },
    /// String longer than the maximum length
    TooLong { max: usize, len: usize },
    /// String length differs from the exact requirement
    WrongLength { expected: usize, len: usize },
    /// Collection has fewer items than required
    TooFewItems { min: usize, len: usize },
    /// Collection has more items than allowed
    TooManyItems { max: usize, len: usize },
    /// Magnitude below the bound, rendered for display
    TooSmall {
        min: String,
        actual: String,
        exclusive: bool,
    },
    /// Magnitude above the bound, rendered for display
    TooLarge {
        max: String,
        actual: String,
        exclusive: bool,
    },
    /// Number has a fractional part where an integer is required
    NotInteger { actual: f64 },
    /// Number has the wrong sign; `expected` is `positive`, `negative`,
    /// or `nonnegative`
    WrongSign {
        expected: &'static str,
        actual: String,
    },
    /// Number is not a multiple of the step
    NotMultipleOf { step: f64, actual: f64 },
    /// String fails a named format check (email, url, uuid)
    InvalidFormat { format: &'static str, got: String },
    /// String does not match the regular expression
    PatternMismatch { pattern: String, got: String },
    /// String does not start with the required prefix
    MissingPrefix { prefix: String, got: String },
    /// String does not end with the required suffix
    MissingSuffix { suffix: String, got: String },
    /// String does not contain the required substring
    MissingSubstring { substring: String, got: String },
    /// Item at `index` duplicates the item at `first_index`
    DuplicateItems { index: usize, first_index: usize },
    /// Coercion to `target` failed; `raw` is the rendered input
    CoercionFailed { target: &'static str, raw: String },
    /// Keys present on the input but absent from the shape, in input order
    UnexpectedKeys { keys: Vec<String> },
    /// Tuple arity mismatch
    TupleLength { expected: usize, received: usize },
    /// Every union member rejected the value; one reason per member
    UnionNoMatch { reasons: Vec<String> },
    /// Discriminator value does not select any branch
    UnknownTag {
        key: String,
        tag: String,
        known: Vec<String>,
    },
    /// No exclusive-or branch accepted the value
    XorNoMatch { members: usize },
    /// Multiple exclusive-or branches accepted the value
    XorAmbiguous { indices: Vec<usize> },
    /// Intersection results disagree and cannot be merged
    IntersectionConflict { left: String, right: String },
    /// A refinement rejected the value with this message
    Custom { message: String },
    /// A transformation step failed with this message
    TransformFailed { message: String },
    /// A synchronous `operation` was invoked on an asynchronous codec
    AsyncNotSupported { operation: &'static str },
    /// Reference resolution exceeded the depth limit
    MaxDepthExceeded { max: usize },
    /// The referenced schema is not registered
    UnresolvedReference { name: String },
    /// Reference validation was attempted without a registry
    MissingRegistry { name: String },
}

impl Violation {
    /// Returns the machine-readable kind of this violation.
    pub fn kind(&self) -> IssueKind {
        match self {
            Violation::InvalidKind { .. } => IssueKind::InvalidKind,
            Violation::InvalidLiteral { .. } => IssueKind::InvalidLiteral,
            Violation::InvalidEnumValue { .. } => IssueKind::InvalidEnumValue,
            Violation::TooShort { .. }
            | Violation::TooLong { .. }
            | Violation::WrongLength { .. }
            | Violation::TooFewItems { .. }
            | Violation::TooManyItems { .. }
            | Violation::TooSmall { .. }
            | Violation::TooLarge { .. }
            | Violation::WrongSign { .. } => IssueKind::RangeViolation,
            Violation::NotInteger { .. } => IssueKind::InvalidKind,
            Violation::NotMultipleOf { .. } => IssueKind::NotMultipleOf,
            Violation::InvalidFormat { .. }
            | Violation::PatternMismatch { .. }
            | Violation::MissingPrefix { .. }
            | Violation::MissingSuffix { .. }
            | Violation::MissingSubstring { .. } => IssueKind::FormatViolation,
            Violation::DuplicateItems { .. } => IssueKind::DuplicateItems,
            Violation::CoercionFailed { .. } => IssueKind::CoercionFailed,
            Violation::UnexpectedKeys { .. } => IssueKind::UnexpectedKeys,
            Violation::TupleLength { .. } => IssueKind::TupleLength,
            Violation::UnionNoMatch { .. } | Violation::UnknownTag { .. } => {
                IssueKind::UnionNoMatch
            }
            Violation::XorNoMatch { .. } => IssueKind::XorNoMatch,
            Violation::XorAmbiguous { .. } => IssueKind::XorAmbiguous,
            Violation::IntersectionConflict { .. } => IssueKind::IntersectionError,
            Violation::Custom { .. } => IssueKind::CustomValidationError,
            Violation::TransformFailed { .. } => IssueKind::TransformError,
            Violation::AsyncNotSupported { .. } => IssueKind::CodecAsyncNotSupported,
            Violation::MaxDepthExceeded { .. }
            | Violation::UnresolvedReference { .. }
            | Violation::MissingRegistry { .. } => IssueKind::ReferenceError,
        }
    }
}
