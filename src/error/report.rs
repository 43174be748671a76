//! Structured projections of validation errors.
//!
//! This module provides [`ErrorTree`], a nested view that mirrors the shape
//! of the validated value, and [`FlattenedError`], a one-level view grouping
//! messages by top-level field. Both are derived from a
//! [`ValidationError`](crate::ValidationError) on demand and hold only
//! message strings.

use indexmap::IndexMap;

use crate::error::issue::ValidationError;
use crate::path::PathSegment;

/// A nested error view mirroring the shape of the validated value.
///
/// Each node holds the messages reported at that location plus child nodes
/// for fields and sequence indices below it. Paths are walked root-to-leaf,
/// so an issue at `users[0].email` produces
/// `tree.field("users").item(0).field("email")`.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaLike, Value};
///
/// let schema = Schema::object().field("name", Schema::string().min_len(1));
/// let result = schema.safe_parse(&Value::from(serde_json::json!({"name": ""})));
///
/// let tree = result.into_result().unwrap_err().tree();
/// let name = tree.field("name").unwrap();
/// assert_eq!(name.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTree {
    /// Messages reported directly at this location.
    pub errors: Vec<String>,
    /// Child nodes keyed by field name, in first-reported order.
    pub fields: IndexMap<String, ErrorTree>,
    /// Child nodes keyed by sequence index, in first-reported order.
    pub items: IndexMap<usize, ErrorTree>,
}

impl ErrorTree {
    /// Builds the tree for all issues in the error.
    pub fn from_error(error: &ValidationError) -> Self {
        let mut root = ErrorTree::default();
        for issue in error.iter() {
            let mut node = &mut root;
            for segment in issue.path.segments() {
                node = match segment {
                    PathSegment::Field(name) => node.fields.entry(name.clone()).or_default(),
                    PathSegment::Index(idx) => node.items.entry(*idx).or_default(),
                };
            }
            node.errors.push(issue.message.clone());
        }
        root
    }

    /// Returns the child node for a field, if any issue was reported there.
    pub fn field(&self, name: &str) -> Option<&ErrorTree> {
        self.fields.get(name)
    }

    /// Returns the child node for an index, if any issue was reported there.
    pub fn item(&self, index: usize) -> Option<&ErrorTree> {
        self.items.get(&index)
    }

    /// Returns true if this node holds no messages and no children.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.fields.is_empty() && self.items.is_empty()
    }
}

/// A one-level error view grouping messages by top-level field.
///
/// Issues whose path is empty (reported at the root) land in `form_errors`;
/// all others are grouped under the string form of their first path segment.
/// This is the shape form libraries typically want: one message list per
/// input field plus a list for the form as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedError {
    /// Messages reported at the root of the value.
    pub form_errors: Vec<String>,
    /// Messages grouped by first path segment, in first-reported order.
    pub field_errors: IndexMap<String, Vec<String>>,
}

impl FlattenedError {
    /// Builds the flattened view for all issues in the error.
    pub fn from_error(error: &ValidationError) -> Self {
        let mut flat = FlattenedError::default();
        for issue in error.iter() {
            match issue.path.first() {
                None => flat.form_errors.push(issue.message.clone()),
                Some(segment) => flat
                    .field_errors
                    .entry(segment.to_key())
                    .or_default()
                    .push(issue.message.clone()),
            }
        }
        flat
    }
}
