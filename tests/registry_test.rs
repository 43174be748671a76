//! Tests for schema registry operations.

use serde_json::json;
use sluice::{RegistryError, Schema, SchemaRegistry, Value};

#[test]
fn test_register_and_get() {
    let registry = SchemaRegistry::new();

    registry
        .register("Email", Schema::string().min_len(1))
        .unwrap();

    let schema = registry.get("Email");
    assert!(schema.is_some());

    let missing = registry.get("Missing");
    assert!(missing.is_none());
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = SchemaRegistry::new();

    registry.register("Email", Schema::string()).unwrap();

    let result = registry.register("Email", Schema::number());
    let error = result.unwrap_err();
    assert!(matches!(error, RegistryError::DuplicateName(ref name) if name == "Email"));
    assert_eq!(error.to_string(), "schema 'Email' already registered");
}

#[test]
fn test_validate_with_registry() {
    let registry = SchemaRegistry::new();

    registry
        .register(
            "User",
            Schema::object()
                .field("name", Schema::string().min_len(1))
                .field("age", Schema::number().int().positive()),
        )
        .unwrap();

    let result = registry
        .validate(
            "User",
            &Value::from(json!({
                "name": "Alice",
                "age": 30
            })),
        )
        .unwrap();

    assert!(result.is_success());
}

#[test]
fn test_validate_missing_schema() {
    let registry = SchemaRegistry::new();

    let result = registry.validate("Missing", &Value::from(json!({})));
    assert_eq!(
        result.unwrap_err().to_string(),
        "schema 'Missing' not found"
    );
}

#[test]
fn test_max_depth_configuration() {
    let registry = SchemaRegistry::new().with_max_depth(50);

    registry.register("Simple", Schema::string()).unwrap();

    // Shallow validation is unaffected by the depth limit.
    let result = registry
        .validate("Simple", &Value::String("test".into()))
        .unwrap();
    assert!(result.is_success());
}

#[test]
fn test_validate_refs_with_valid_references() {
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

    let unresolved = registry.validate_refs();
    assert!(unresolved.is_empty());
}

#[test]
fn test_validate_refs_with_missing_references() {
    let registry = SchemaRegistry::new();

    registry
        .register(
            "User",
            Schema::object().field("id", Schema::reference("UserId")),
        )
        .unwrap();

    let unresolved = registry.validate_refs();
    assert_eq!(unresolved, vec!["UserId"]);
}

#[test]
fn test_validate_refs_with_multiple_missing() {
    let registry = SchemaRegistry::new();

    registry
        .register(
            "User",
            Schema::object()
                .field("id", Schema::reference("UserId"))
                .field("role", Schema::reference("Role")),
        )
        .unwrap();

    // The report comes back sorted and deduplicated.
    let unresolved = registry.validate_refs();
    assert_eq!(unresolved, vec!["Role", "UserId"]);
}

#[test]
fn test_registry_clone_shares_storage() {
    let registry = SchemaRegistry::new();

    registry.register("Email", Schema::string()).unwrap();

    let cloned = registry.clone();
    cloned.register("Phone", Schema::string()).unwrap();

    // Both handles see the same underlying table.
    assert!(registry.get("Phone").is_some());
    assert!(cloned.get("Email").is_some());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_validation_with_nested_refs() {
    let registry = SchemaRegistry::new();

    registry
        .register("UserId", Schema::number().int().positive())
        .unwrap();

    registry.register("Email", Schema::string().email()).unwrap();

    registry
        .register(
            "User",
            Schema::object()
                .field("id", Schema::reference("UserId"))
                .field("email", Schema::reference("Email")),
        )
        .unwrap();

    let result = registry
        .validate(
            "User",
            &Value::from(json!({
                "id": 42,
                "email": "test@example.com"
            })),
        )
        .unwrap();

    assert!(result.is_success());
}

#[test]
fn test_validation_with_invalid_nested_ref() {
    let registry = SchemaRegistry::new();

    registry
        .register("UserId", Schema::number().int().positive())
        .unwrap();

    registry
        .register(
            "User",
            Schema::object().field("id", Schema::reference("UserId")),
        )
        .unwrap();

    let result = registry
        .validate("User", &Value::from(json!({"id": -5})))
        .unwrap();

    let error = match result.into_result() {
        Ok(value) => panic!("expected failure, got success: {value:?}"),
        Err(error) => error,
    };
    assert_eq!(error.first().path.to_string(), "id");
    assert_eq!(error.first().message, "must be positive, got -5");
}

#[test]
fn test_default_registry() {
    let registry = SchemaRegistry::default();

    registry.register("Test", Schema::string()).unwrap();

    assert!(registry.get("Test").is_some());
}

#[test]
fn test_registry_with_array_of_refs() {
    let registry = SchemaRegistry::new();

    registry
        .register("UserId", Schema::number().int().positive())
        .unwrap();

    registry
        .register("UserList", Schema::array(Schema::reference("UserId")))
        .unwrap();

    let result = registry
        .validate("UserList", &Value::from(json!([1, 2, 3])))
        .unwrap();
    assert!(result.is_success());

    let result = registry
        .validate("UserList", &Value::from(json!([1, -2, 3])))
        .unwrap();
    assert!(result.is_failure());
}

#[test]
fn test_names_contains_and_len() {
    let registry = SchemaRegistry::new();
    assert!(registry.is_empty());

    registry.register("Zebra", Schema::string()).unwrap();
    registry.register("Apple", Schema::string()).unwrap();

    assert_eq!(registry.names(), vec!["Apple", "Zebra"]);
    assert!(registry.contains("Zebra"));
    assert!(!registry.contains("Mango"));
    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());
}
