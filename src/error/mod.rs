//! Error types for validation failures.
//!
//! This module provides the violation taxonomy, path-aware issues, the
//! non-empty error collection returned by failed parses, and structured
//! projections of that collection.

mod issue;
mod report;
mod violation;

pub use issue::{ValidationError, ValidationIssue};
pub use report::{ErrorTree, FlattenedError};
pub use violation::{IssueKind, Violation};
