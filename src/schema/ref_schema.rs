//! Named references into a schema registry.

use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::traits::SchemaLike;
use crate::validation::ValidationContext;
use crate::value::Value;
use crate::ParseResult;

/// A schema that delegates to another schema looked up by name.
///
/// References make recursive and mutually recursive shapes possible: a
/// schema can name itself (or a sibling) without owning it. Resolution
/// happens during validation, so a reference can be built before its
/// target is registered.
///
/// A reference only resolves through a registry. Calling `parse` or
/// `safe_parse` directly fails, since a detached validation carries no
/// registry to look the name up in.
///
/// # Example
///
/// ```rust
/// use sluice::{Schema, SchemaRegistry, Value};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
///
/// registry.register("UserId", Schema::number().int().positive()).unwrap();
/// registry.register(
///     "User",
///     Schema::object()
///         .field("id", Schema::reference("UserId"))
///         .field("name", Schema::string()),
/// ).unwrap();
///
/// let input = Value::from_json(json!({ "id": 42, "name": "Alice" }));
/// assert!(registry.validate("User", &input).unwrap().is_success());
/// ```
#[derive(Clone)]
pub struct RefSchema {
    name: String,
}

impl RefSchema {
    /// Creates a reference to the schema registered under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the referenced name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SchemaLike for RefSchema {
    type Output = Value;

    fn validate_with_context(
        &self,
        value: &Value,
        path: &IssuePath,
        context: &ValidationContext,
    ) -> ParseResult<Value> {
        let registry = match context.registry() {
            Some(registry) => registry,
            None => {
                return Validation::Failure(ValidationError::of(
                    path,
                    Violation::MissingRegistry {
                        name: self.name.clone(),
                    },
                ))
            }
        };

        // The depth gate runs before resolution so cyclic definitions
        // terminate instead of recursing forever.
        if context.at_max_depth() {
            return Validation::Failure(ValidationError::of(
                path,
                Violation::MaxDepthExceeded {
                    max: context.max_depth(),
                },
            ));
        }

        let target = match registry.get_schema(&self.name) {
            Some(target) => target,
            None => {
                return Validation::Failure(ValidationError::of(
                    path,
                    Violation::UnresolvedReference {
                        name: self.name.clone(),
                    },
                ))
            }
        };

        target.validate_value_with_context(value, path, &context.increment_depth())
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
        refs.push(self.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::error::IssueKind;
    use crate::schema::string::StringSchema;
    use crate::schema::ValueValidator;
    use crate::validation::RegistryAccess;

    struct MapRegistry {
        schemas: HashMap<String, Arc<dyn ValueValidator>>,
    }

    impl MapRegistry {
        fn with(name: &str, schema: impl SchemaLike + 'static) -> Self {
            let mut schemas: HashMap<String, Arc<dyn ValueValidator>> = HashMap::new();
            schemas.insert(name.to_string(), Arc::new(schema));
            Self { schemas }
        }
    }

    impl RegistryAccess for MapRegistry {
        fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
            self.schemas.get(name).cloned()
        }
    }

    fn unwrap_failure<T: std::fmt::Debug>(v: ParseResult<T>) -> ValidationError {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_detached_validation_fails() {
        let schema = RefSchema::new("User");
        let error = unwrap_failure(schema.safe_parse(&Value::Null));

        assert_eq!(error.first().kind, IssueKind::ReferenceError);
        assert_eq!(
            error.first().message,
            "reference 'User' cannot be resolved without a registry"
        );
    }

    #[test]
    fn test_resolves_through_registry() {
        let registry = Arc::new(MapRegistry::with("Name", StringSchema::new().min_len(2)));
        let context = ValidationContext::new(registry);
        let schema = RefSchema::new("Name");

        let result = schema.validate_with_context(&Value::from("bo"), &IssuePath::root(), &context);
        assert!(result.is_success());

        let error = unwrap_failure(schema.validate_with_context(
            &Value::from("b"),
            &IssuePath::root(),
            &context,
        ));
        assert_eq!(error.first().message, "length must be at least 2, got 1");
    }

    #[test]
    fn test_unresolved_name() {
        let registry = Arc::new(MapRegistry::with("Name", StringSchema::new()));
        let context = ValidationContext::new(registry);
        let schema = RefSchema::new("Missing");

        let error = unwrap_failure(schema.validate_with_context(
            &Value::Null,
            &IssuePath::root(),
            &context,
        ));
        assert_eq!(error.first().kind, IssueKind::ReferenceError);
        assert_eq!(
            error.first().message,
            "schema 'Missing' not found in registry"
        );
    }

    #[test]
    fn test_depth_limit() {
        // "Loop" resolves to a reference to itself, so resolution can only
        // end at the depth gate.
        let registry = Arc::new(MapRegistry::with("Loop", RefSchema::new("Loop")));
        let context = ValidationContext::new(registry).with_max_depth(5);
        let schema = RefSchema::new("Loop");

        let error = unwrap_failure(schema.validate_with_context(
            &Value::Null,
            &IssuePath::root(),
            &context,
        ));
        assert_eq!(error.first().message, "maximum validation depth 5 exceeded");
    }

    #[test]
    fn test_collect_refs() {
        let schema = RefSchema::new("User");
        let mut refs = Vec::new();
        schema.collect_refs(&mut refs);
        assert_eq!(refs, vec!["User".to_string()]);
    }
}
