//! Validation issue and error collection types.
//!
//! This module provides [`ValidationIssue`] for single validation failures
//! and [`ValidationError`] for the non-empty, ordered collection a failed
//! parse returns.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::error::report::{ErrorTree, FlattenedError};
use crate::error::violation::{IssueKind, Violation};
use crate::messages;
use crate::path::IssuePath;

/// A single validation issue with full context.
///
/// `ValidationIssue` captures everything a caller needs about one failure:
/// - **kind**: Machine-readable classification for programmatic handling
/// - **path**: Where in the value the failure occurred, root-to-leaf
/// - **message**: Human-readable text, resolved when the issue was created
///
/// Messages are rendered eagerly through the active
/// [`MessageProvider`](crate::MessageProvider), so an issue's text never
/// changes after it is created.
///
/// # Example
///
/// ```rust
/// use sluice::{IssueKind, IssuePath, ValidationIssue, Violation};
///
/// let issue = ValidationIssue::new(
///     &IssuePath::root().push_field("email"),
///     Violation::InvalidFormat {
///         format: "email",
///         got: "not-an-email".to_string(),
///     },
/// );
///
/// assert_eq!(issue.kind, IssueKind::FormatViolation);
/// assert_eq!(issue.path.to_string(), "email");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Machine-readable classification of the failure.
    pub kind: IssueKind,
    /// The path to the value that failed validation.
    pub path: IssuePath,
    /// Human-readable message, resolved at creation time.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue for a violation at the given path.
    ///
    /// The message is rendered by the active message provider.
    pub fn new(path: &IssuePath, violation: Violation) -> Self {
        Self::report(path, violation, None)
    }

    /// Creates an issue for a violation, preferring a custom message.
    ///
    /// When `custom` is `Some`, that text is used verbatim and the provider
    /// is not consulted. The kind always comes from the violation.
    pub fn report(path: &IssuePath, violation: Violation, custom: Option<&str>) -> Self {
        let message = match custom {
            Some(text) => text.to_string(),
            None => messages::message_provider().message_for(&violation),
        };
        Self {
            kind: violation.kind(),
            path: path.clone(),
            message,
        }
    }

    /// Creates a custom-validation issue with the given message.
    pub fn custom(path: &IssuePath, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::CustomValidationError,
            path: path.clone(),
            message: message.into(),
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationIssue {}

// ValidationIssue is Send + Sync since all fields are owned types.
// These assertions ensure that remains true if the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationIssue>();
    assert_sync::<ValidationIssue>();
};

/// A non-empty, ordered collection of validation issues.
///
/// `ValidationError` wraps a `NonEmptyVec<ValidationIssue>` to guarantee that
/// at least one issue is present. This is essential for use with
/// `Validation<T, ValidationError>` since a failure must carry at least one
/// issue. Issues appear in the order they were discovered.
///
/// # Combining Errors
///
/// `ValidationError` implements `Semigroup`, allowing issues from multiple
/// validations to be combined:
///
/// ```rust
/// use sluice::{IssuePath, ValidationError, ValidationIssue};
/// use stillwater::prelude::*;
///
/// let errors1 = ValidationError::single(ValidationIssue::custom(
///     &IssuePath::from_field("name"),
///     "required",
/// ));
/// let errors2 = ValidationError::single(ValidationIssue::custom(
///     &IssuePath::from_field("email"),
///     "invalid format",
/// ));
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(NonEmptyVec<ValidationIssue>);

impl ValidationError {
    /// Creates a `ValidationError` containing a single issue.
    pub fn single(issue: ValidationIssue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates a `ValidationError` from a violation at the given path.
    ///
    /// Shorthand for wrapping [`ValidationIssue::new`] in a singleton.
    pub fn of(path: &IssuePath, violation: Violation) -> Self {
        Self::single(ValidationIssue::new(path, violation))
    }

    /// Creates a `ValidationError` from a violation, preferring a custom
    /// message over the provider's rendering.
    pub fn report(path: &IssuePath, violation: Violation, custom: Option<&str>) -> Self {
        Self::single(ValidationIssue::report(path, violation, custom))
    }

    /// Creates a `ValidationError` from a `NonEmptyVec` of issues.
    pub fn from_non_empty(issues: NonEmptyVec<ValidationIssue>) -> Self {
        Self(issues)
    }

    /// Creates a `ValidationError` from a `Vec<ValidationIssue>`.
    ///
    /// Use this when you're certain the vec contains at least one issue.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(issues: Vec<ValidationIssue>) -> Self {
        Self(NonEmptyVec::from_vec(issues).expect("ValidationError requires at least one issue"))
    }

    /// Returns the number of issues in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // NonEmptyVec is never empty
    }

    /// Returns an iterator over the contained issues.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.0.iter()
    }

    /// Returns the first issue in the collection.
    ///
    /// Discovery order is preserved, so this is the earliest failure.
    pub fn first(&self) -> &ValidationIssue {
        self.0.head()
    }

    /// Returns all issues at the specified path.
    pub fn at_path(&self, path: &IssuePath) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|issue| &issue.path == path).collect()
    }

    /// Returns all issues with the specified kind.
    pub fn of_kind(&self, kind: IssueKind) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|issue| issue.kind == kind).collect()
    }

    /// Builds the nested tree projection of these issues.
    ///
    /// The tree is computed fresh on every call; it is a view, not a cache.
    pub fn tree(&self) -> ErrorTree {
        ErrorTree::from_error(self)
    }

    /// Builds the one-level flattened projection of these issues.
    ///
    /// Issues are grouped under the first segment of their path; issues at
    /// the root land in `form_errors`. Computed fresh on every call.
    pub fn flatten(&self) -> FlattenedError {
        FlattenedError::from_error(self)
    }

    /// Renders a human-readable multi-line report of these issues.
    pub fn prettify(&self) -> String {
        let mut out = String::new();
        for issue in self.iter() {
            out.push_str("✖ ");
            out.push_str(&issue.message);
            out.push('\n');
            if !issue.path.is_root() {
                out.push_str("  → at ");
                out.push_str(&issue.path.to_string());
                out.push('\n');
            }
        }
        out
    }

    /// Converts this collection into a `Vec<ValidationIssue>`.
    pub fn into_vec(self) -> Vec<ValidationIssue> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<ValidationIssue> {
        &self.0
    }
}

impl Semigroup for ValidationError {
    fn combine(self, other: Self) -> Self {
        ValidationError(self.0.combine(other.0))
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl IntoIterator for ValidationError {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationError {
    type Item = &'a ValidationIssue;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationIssue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

// ValidationError is Send + Sync since it only contains ValidationIssue,
// which is Send + Sync.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};
