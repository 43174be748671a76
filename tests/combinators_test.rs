//! Integration tests for unions, intersections, and wrapper combinators.

use sluice::{IssueKind, Schema, SchemaLike, ShapeError, Value};
use serde_json::json;

/// Helper to extract the success value from a Validation
fn unwrap_success<T, E: std::fmt::Debug>(v: stillwater::Validation<T, E>) -> T {
    v.into_result().unwrap()
}

/// Helper to extract the error value from a Validation
fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

// ====== optional / nullable / nullish ======

#[test]
fn test_optional_passes_undefined_through() {
    let schema = Schema::string().optional();

    assert_eq!(
        unwrap_success(schema.safe_parse(&Value::Undefined)),
        Value::Undefined
    );
    assert_eq!(
        unwrap_success(schema.safe_parse(&Value::from("x"))),
        Value::from("x")
    );
    assert!(schema.safe_parse(&Value::Null).is_failure());
}

#[test]
fn test_nullable_passes_null_through() {
    let schema = Schema::string().nullable();

    assert_eq!(unwrap_success(schema.safe_parse(&Value::Null)), Value::Null);
    assert!(schema.safe_parse(&Value::Undefined).is_failure());
}

#[test]
fn test_nullish_passes_both_through() {
    let schema = Schema::string().nullish();

    assert!(schema.safe_parse(&Value::Null).is_success());
    assert!(schema.safe_parse(&Value::Undefined).is_success());
    assert!(schema.safe_parse(&Value::from(1.0)).is_failure());
}

#[test]
fn test_wrappers_still_validate_present_values() {
    let schema = Schema::string().min_len(3).optional();

    let errors = unwrap_failure(schema.safe_parse(&Value::from("ab")));
    assert_eq!(errors.first().message, "length must be at least 3, got 2");
}

// ====== union ======

#[test]
fn test_union_first_match_wins() {
    let schema = Schema::union(vec![
        Schema::erase(Schema::string().min_len(5)),
        Schema::erase(Schema::string().min_len(1)),
    ]);

    // "abc" fails the first member and passes the second.
    assert_eq!(
        unwrap_success(schema.safe_parse(&Value::from("abc"))),
        Value::from("abc")
    );
}

#[test]
fn test_union_collects_member_reasons() {
    let schema = Schema::union(vec![
        Schema::erase(Schema::string()),
        Schema::erase(Schema::number()),
    ]);

    let errors = unwrap_failure(schema.safe_parse(&Value::from(true)));
    assert_eq!(errors.first().kind, IssueKind::UnionNoMatch);
    assert_eq!(
        errors.first().message,
        "no union member matched: expected string, got boolean; expected number, got boolean"
    );
}

#[test]
fn test_union_custom_message() {
    let schema = Schema::union(vec![
        Schema::erase(Schema::string()),
        Schema::erase(Schema::number()),
    ])
    .error("expected an id");

    let errors = unwrap_failure(schema.safe_parse(&Value::from(true)));
    assert_eq!(errors.first().message, "expected an id");
}

// ====== discriminated union ======

fn shape_schema() -> sluice::DiscriminatedUnionSchema {
    Schema::discriminated_union(
        "type",
        vec![
            (
                Value::from("circle"),
                Schema::erase(
                    Schema::object()
                        .field("type", Schema::literal("circle"))
                        .field("radius", Schema::number().positive()),
                ),
            ),
            (
                Value::from("square"),
                Schema::erase(
                    Schema::object()
                        .field("type", Schema::literal("square"))
                        .field("side", Schema::number().positive()),
                ),
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_discriminated_union_dispatches_on_tag() {
    let schema = shape_schema();

    assert!(schema
        .safe_parse(&Value::from_json(json!({"type": "circle", "radius": 2})))
        .is_success());
    assert!(schema
        .safe_parse(&Value::from_json(json!({"type": "square", "side": 3})))
        .is_success());
}

#[test]
fn test_discriminated_union_branch_errors_keep_paths() {
    let schema = shape_schema();

    let errors = unwrap_failure(
        schema.safe_parse(&Value::from_json(json!({"type": "circle", "radius": -1}))),
    );
    assert_eq!(errors.first().path.to_string(), "radius");
    assert_eq!(errors.first().message, "must be positive, got -1");
}

#[test]
fn test_discriminated_union_unknown_tag() {
    let schema = shape_schema();

    let errors = unwrap_failure(
        schema.safe_parse(&Value::from_json(json!({"type": "triangle", "side": 3}))),
    );
    assert_eq!(
        errors.first().message,
        "unknown value 'triangle' for discriminator 'type', expected one of 'circle', 'square'"
    );
}

#[test]
fn test_discriminated_union_missing_tag() {
    let schema = shape_schema();

    let errors = unwrap_failure(schema.safe_parse(&Value::from_json(json!({"radius": 2}))));
    assert_eq!(
        errors.first().message,
        "unknown value 'undefined' for discriminator 'type', expected one of 'circle', 'square'"
    );
}

#[test]
fn test_discriminated_union_duplicate_tags_rejected() {
    let result = Schema::discriminated_union(
        "kind",
        vec![
            (Value::from("a"), Schema::erase(Schema::object())),
            (Value::from("a"), Schema::erase(Schema::object())),
        ],
    );
    assert_eq!(result.unwrap_err(), ShapeError::DuplicateTag("a".into()));
}

// ====== intersection ======

#[test]
fn test_intersection_merges_object_outputs() {
    let schema = Schema::intersection(
        Schema::object().field("a", Schema::number()),
        Schema::object().field("b", Schema::string()),
    );

    let output = unwrap_success(schema.safe_parse(&Value::from_json(json!({
        "a": 1,
        "b": "x"
    }))));
    assert_eq!(output, Value::from_json(json!({"a": 1.0, "b": "x"})));
}

#[test]
fn test_intersection_nested_objects_merge_recursively() {
    // Each side strips the other's sub-field, then the merge reunites them.
    let schema = Schema::intersection(
        Schema::object().field("point", Schema::object().field("x", Schema::number())),
        Schema::object().field("point", Schema::object().field("y", Schema::number())),
    );

    let output = unwrap_success(schema.safe_parse(&Value::from_json(json!({
        "point": {"x": 1, "y": 2}
    }))));
    assert_eq!(
        output,
        Value::from_json(json!({"point": {"x": 1.0, "y": 2.0}}))
    );
}

#[test]
fn test_intersection_shared_scalar_key_keeps_right() {
    let schema = Schema::intersection(
        Schema::object().field("name", Schema::string()),
        Schema::object().field("name", Schema::string().trim()),
    );

    let output = unwrap_success(schema.safe_parse(&Value::from_json(json!({"name": " ada "}))));
    assert_eq!(output, Value::from_json(json!({"name": "ada"})));
}

#[test]
fn test_intersection_conflicting_outputs_fail() {
    // Both sides accept the string but produce different outputs.
    let schema = Schema::intersection(Schema::string(), Schema::string().trim());

    let errors = unwrap_failure(schema.safe_parse(&Value::from(" a ")));
    assert_eq!(errors.first().kind, IssueKind::IntersectionError);
}

#[test]
fn test_intersection_reports_both_failures() {
    let schema = Schema::intersection(Schema::string(), Schema::number());

    let errors = unwrap_failure(schema.safe_parse(&Value::from(true)));
    assert_eq!(errors.len(), 2);
}

// ====== xor ======

#[test]
fn test_xor_requires_exactly_one_match() {
    let schema = Schema::xor(vec![
        Schema::erase(Schema::number().max(5.0)),
        Schema::erase(Schema::number().min(10.0)),
    ]);

    assert!(schema.safe_parse(&Value::from(3.0)).is_success());
    assert!(schema.safe_parse(&Value::from(12.0)).is_success());

    let errors = unwrap_failure(schema.safe_parse(&Value::from(7.0)));
    assert_eq!(
        errors.first().message,
        "none of the 2 exclusive branches matched"
    );
}

#[test]
fn test_xor_ambiguous_match_fails() {
    let schema = Schema::xor(vec![
        Schema::erase(Schema::number()),
        Schema::erase(Schema::any()),
    ]);

    let errors = unwrap_failure(schema.safe_parse(&Value::from(5.0)));
    assert_eq!(
        errors.first().message,
        "matched branches 0, 1, expected exactly one"
    );
}

// ====== pipe ======

#[test]
fn test_pipe_feeds_first_output_to_second() {
    let schema = Schema::string().trim().pipe(Schema::string().min_len(3));

    assert_eq!(unwrap_success(schema.safe_parse(&Value::from("  abc  "))), "abc");

    // " a " trims to "a", which fails the second stage.
    let errors = unwrap_failure(schema.safe_parse(&Value::from(" a ")));
    assert_eq!(errors.first().message, "length must be at least 3, got 1");
}

#[test]
fn test_pipe_first_stage_failure_short_circuits() {
    let schema = Schema::coerce().number().pipe(Schema::number().int());

    assert_eq!(unwrap_success(schema.safe_parse(&Value::from("42"))), 42.0);

    let errors = unwrap_failure(schema.safe_parse(&Value::from("nope")));
    assert_eq!(errors.first().message, "cannot coerce 'nope' to number");

    let errors = unwrap_failure(schema.safe_parse(&Value::from("1.5")));
    assert_eq!(errors.first().message, "expected an integer, got 1.5");
}
