//! Validation context for reference resolution.
//!
//! This module provides [`ValidationContext`], which carries optional
//! registry access and recursion-depth tracking through a validation pass.
//! Schemas that contain no references never consult it; reference schemas
//! use it to resolve names and to bound recursion through cyclic
//! definitions.

use std::sync::Arc;

use crate::schema::ValueValidator;

/// Default maximum depth for reference resolution.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Read-only access to registered schemas.
///
/// Implemented by [`SchemaRegistry`](crate::SchemaRegistry). The indirection
/// keeps schemas decoupled from the registry's storage.
pub trait RegistryAccess: Send + Sync {
    /// Returns the schema registered under `name`, if any.
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>>;
}

/// Context threaded through a validation pass.
///
/// A context is cheap to clone: it holds a shared registry handle and two
/// counters. Each reference resolution derives a child context with
/// [`increment_depth`](ValidationContext::increment_depth), so sibling
/// branches never observe each other's depth.
#[derive(Clone)]
pub struct ValidationContext {
    registry: Option<Arc<dyn RegistryAccess>>,
    depth: usize,
    max_depth: usize,
}

impl ValidationContext {
    /// Creates a context with registry access and the default depth limit.
    pub fn new(registry: Arc<dyn RegistryAccess>) -> Self {
        Self {
            registry: Some(registry),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates a context with no registry.
    ///
    /// This is what the plain `validate`/`safe_parse` entry points use.
    /// Reference schemas fail under a detached context since there is
    /// nothing to resolve names against.
    pub fn detached() -> Self {
        Self {
            registry: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum reference resolution depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the registry handle, if this context carries one.
    pub fn registry(&self) -> Option<&Arc<dyn RegistryAccess>> {
        self.registry.as_ref()
    }

    /// Returns the current resolution depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the maximum resolution depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if resolving one more reference would exceed the limit.
    pub fn at_max_depth(&self) -> bool {
        self.depth >= self.max_depth
    }

    /// Returns a child context one level deeper.
    pub fn increment_depth(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }
}
