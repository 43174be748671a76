//! Named schema storage and reference resolution.
//!
//! This module provides [`SchemaRegistry`], which stores schemas under
//! string names so that [`RefSchema`](crate::RefSchema) references can
//! resolve during validation. Recursive and mutually recursive shapes
//! register themselves by name and bottom out at the registry's depth
//! limit.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::path::IssuePath;
use crate::schema::ValueValidator;
use crate::validation::{RegistryAccess, ValidationContext, DEFAULT_MAX_DEPTH};
use crate::value::Value;
use crate::ParseResult;

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn ValueValidator>>>>;

/// A thread-safe registry of named schemas.
///
/// Registration takes the write lock briefly; validation only reads, so
/// any number of threads can validate concurrently. Cloning the registry
/// shares the underlying storage.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaRegistry, Value};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
///
/// // A category contains a list of categories.
/// registry.register(
///     "Category",
///     Schema::object()
///         .field("name", Schema::string().min_len(1))
///         .field("children", Schema::array(Schema::reference("Category"))),
/// ).unwrap();
///
/// let tree = Value::from_json(json!({
///     "name": "root",
///     "children": [
///         {"name": "leaf", "children": []}
///     ]
/// }));
/// assert!(registry.validate("Category", &tree).unwrap().is_success());
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    max_depth: usize,
}

impl SchemaRegistry {
    /// Creates an empty registry with the default depth limit.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum reference resolution depth.
    ///
    /// Validation of a reference chain longer than this fails with a
    /// depth issue instead of recursing further. The default is
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Registers a schema under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("Email", Schema::string().email()).unwrap();
    ///
    /// assert!(registry.register("Email", Schema::string()).is_err());
    /// ```
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: ValueValidator + 'static,
    {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Returns the schema registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns true if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Reports reference names that no registered schema satisfies.
    ///
    /// Call this after registration to check reference integrity up
    /// front rather than discovering dangling names during validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register(
    ///     "User",
    ///     Schema::object().field("id", Schema::reference("UserId")),
    /// ).unwrap();
    ///
    /// assert_eq!(registry.validate_refs(), vec!["UserId"]);
    /// ```
    pub fn validate_refs(&self) -> Vec<String> {
        let schemas = self.schemas.read();
        let mut all_refs = Vec::new();

        for schema in schemas.values() {
            schema.append_refs(&mut all_refs);
        }

        let mut unresolved: Vec<String> = all_refs
            .into_iter()
            .filter(|name| !schemas.contains_key(name))
            .collect();
        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Validates a value against the schema registered under `name`.
    ///
    /// This is the entry point for schemas containing references: the
    /// validation runs with this registry in context, so references
    /// resolve and recursion is depth-limited.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaNotFound`] if `name` is not
    /// registered. Validation failures come back inside the `Ok` result.
    pub fn validate(&self, name: &str, value: &Value) -> Result<ParseResult<Value>, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;

        let context =
            ValidationContext::new(Arc::new(self.clone())).with_max_depth(self.max_depth);
        Ok(schema.validate_value_with_context(value, &IssuePath::root(), &context))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            max_depth: self.max_depth,
        }
    }
}

impl RegistryAccess for SchemaRegistry {
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        self.get(name)
    }
}

// The registry crosses thread boundaries; these assertions keep that true
// if the storage types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaRegistry>();
    assert_sync::<SchemaRegistry>();
};

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let registry = SchemaRegistry::new();
        registry.register("Email", Schema::string().email()).unwrap();

        assert!(registry.get("Email").is_some());
        assert!(registry.get("Unknown").is_none());
        assert!(registry.contains("Email"));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = SchemaRegistry::new();
        registry.register("Email", Schema::string()).unwrap();

        let result = registry.register("Email", Schema::string());
        match result {
            Err(RegistryError::DuplicateName(name)) => assert_eq!(name, "Email"),
            other => panic!("expected duplicate name error, got {:?}", other),
        }
    }

    #[test]
    fn test_names_sorted() {
        let registry = SchemaRegistry::new();
        registry.register("Zeta", Schema::string()).unwrap();
        registry.register("Alpha", Schema::string()).unwrap();

        assert_eq!(registry.names(), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_validate_unknown_name() {
        let registry = SchemaRegistry::new();
        let result = registry.validate("Nope", &Value::Null);

        match result {
            Err(RegistryError::SchemaNotFound(name)) => assert_eq!(name, "Nope"),
            other => panic!("expected schema not found, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_validate_resolves_references() {
        let registry = SchemaRegistry::new();
        registry
            .register("UserId", Schema::number().int().positive())
            .unwrap();
        registry
            .register(
                "User",
                Schema::object()
                    .field("id", Schema::reference("UserId"))
                    .field("name", Schema::string()),
            )
            .unwrap();

        let good = Value::from_json(json!({"id": 42, "name": "Alice"}));
        assert!(registry.validate("User", &good).unwrap().is_success());

        let bad = Value::from_json(json!({"id": -1, "name": "Alice"}));
        let error = registry
            .validate("User", &bad)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(error.first().path.to_string(), "id");
        assert_eq!(error.first().message, "must be positive, got -1");
    }

    #[test]
    fn test_recursive_schema_terminates() {
        let registry = SchemaRegistry::new().with_max_depth(3);
        registry
            .register(
                "Node",
                Schema::object().field("next", Schema::reference("Node")),
            )
            .unwrap();

        // Deeper than the limit, so validation must stop with an issue.
        let input = Value::from_json(json!(
            {"next": {"next": {"next": {"next": {}}}}}
        ));
        let error = registry
            .validate("Node", &input)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(error.first().message, "maximum validation depth 3 exceeded");
    }

    #[test]
    fn test_validate_refs_reports_unresolved() {
        let registry = SchemaRegistry::new();
        registry
            .register(
                "Post",
                Schema::object()
                    .field("author", Schema::reference("User"))
                    .field("tags", Schema::array(Schema::reference("Tag"))),
            )
            .unwrap();
        registry.register("Tag", Schema::string()).unwrap();

        assert_eq!(registry.validate_refs(), vec!["User"]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let registry = SchemaRegistry::new();
        let clone = registry.clone();

        registry.register("Email", Schema::string()).unwrap();
        assert!(clone.contains("Email"));
    }
}
