//! Array, tuple and object validation tests.

use json_shape::prelude::*;
use json_shape::schema::{Additional, Dependency};
use serde_json::json;
use std::collections::BTreeMap;

use crate::common::{fixtures, parse};

#[test]
fn test_array_of_strings() {
    let shape = array(string());
    assert_coerced!(shape.validate_sync(&json!([])), json!([]));
    assert_coerced!(shape.validate_sync(&json!(["abc", "def"])), json!(["abc", "def"]));
    assert_validation_error!(shape.validate_sync(&json!([1, 2, 3])), "[0] should be string");
    assert_validation_error!(shape.validate_sync(&json!([true, false])), "[0] should be string");
    for input in [json!(""), json!("abc"), json!(1)] {
        assert_validation_error!(shape.validate_sync(&input), "value should be array");
    }
}

#[test]
fn test_array_of_union_keeps_first_matching_branch() {
    let shape = array(any_of([number().into(), string().into()]));
    assert_coerced!(shape.validate_sync(&json!(["1", "2", "3"])), json!([1, 2, 3]));
    assert_coerced!(shape.validate_sync(&json!(["1", "a"])), json!([1, "a"]));
    assert_validation_error!(shape.validate_sync(&json!([true, false])), "[0] should be number");
}

#[test]
fn test_array_size_and_uniqueness() {
    let shape = array(integer()).min_size(1).max_size(3).unique(true);
    assert_validation_error!(
        shape.validate_sync(&json!([])),
        "value should have at least 1 item"
    );
    assert_validation_error!(
        shape.validate_sync(&json!([1, 2, 3, 4])),
        "value should have at most 3 items"
    );
    // Uniqueness is checked on coerced elements.
    assert_validation_error!(
        shape.validate_sync(&json!([1, "1"])),
        "value should have unique items"
    );
    assert_coerced!(shape.validate_sync(&json!(["1", "2"])), json!([1, 2]));
}

#[test]
fn test_array_item_defaults_do_not_fill_missing_elements() {
    let shape = array(string().default(json!("abc"))).min_size(1).max_size(1);
    assert_validation_error!(
        shape.validate_sync(&json!([])),
        "value should have at least 1 item"
    );
    assert_coerced!(shape.validate_sync(&json!(["x"])), json!(["x"]));
}

#[test]
fn test_tuple_positions() {
    let pair = tuple([string().into(), integer().into()]);
    assert_coerced!(pair.validate_sync(&json!(["a", "1"])), json!(["a", 1]));
    assert_validation_error!(pair.validate_sync(&json!([1, 1])), "[0] should be string");
    assert_validation_error!(pair.validate_sync(&json!(["a", "b"])), "[1] should be integer");
    assert_validation_error!(
        pair.validate_sync(&json!(["a"])),
        "value should have at least 2 items"
    );
    assert_validation_error!(
        pair.validate_sync(&json!(["a", 1, true])),
        "validation failed"
    );
}

#[test]
fn test_tuple_fills_missing_positions_from_defaults() {
    let shape = tuple([string().default(json!("abc")).into()]);
    assert_coerced!(shape.validate_sync(&json!([])), json!(["abc"]));
    assert_coerced!(shape.validate_sync(&json!(["x"])), json!(["x"]));

    let trailing = tuple([string().into(), integer().default(json!(0)).into()]);
    assert_coerced!(trailing.validate_sync(&json!(["a"])), json!(["a", 0]));

    let strict = tuple([string().into()]);
    assert_validation_error!(
        strict.validate_sync(&json!([])),
        "value should have at least 1 item"
    );
}

#[test]
fn test_object_removes_unknown_properties() {
    let shape = object([("a", number().into()), ("b", string().into())]);
    assert_coerced!(
        shape.validate_sync(&json!({"a": 1, "b": "a", "c": 2})),
        json!({"a": 1, "b": "a"})
    );
    assert_coerced!(
        shape.validate_sync(&json!({"a": "1", "b": "1"})),
        json!({"a": 1, "b": "1"})
    );
    assert_validation_error!(shape.validate_sync(&json!({})), "a is required");
    assert_validation_error!(
        shape.validate_sync(&json!({"a": 1, "b": 1})),
        "b should be string"
    );
    for input in [json!(""), json!("abc"), json!(1)] {
        assert_validation_error!(shape.validate_sync(&input), "value should be object");
    }
}

#[test]
fn test_object_keep_unknown() {
    let shape = object([("a", number().into()), ("b", string().into())]).keep_unknown(true);
    assert_coerced!(
        shape.validate_sync(&json!({"a": 1, "b": "a", "c": 2})),
        json!({"a": 1, "b": "a", "c": 2})
    );
    assert_validation_error!(shape.validate_sync(&json!({})), "a is required");

    let dropped = shape.keep_unknown(false);
    assert_coerced!(
        dropped.validate_sync(&json!({"a": 1, "b": "a", "c": 2})),
        json!({"a": 1, "b": "a"})
    );
}

#[test]
fn test_object_defaults_and_optional_properties() {
    let query = fixtures::pagination();
    assert_coerced!(query.validate_sync(&json!({})), json!({"page": 1, "pageSize": 20}));
    assert_coerced!(
        query.validate_sync(&fixtures::query_string()),
        json!({"page": 1, "pageSize": 15})
    );
    assert_validation_error!(
        query.validate_sync(&json!({"page": "0"})),
        "page should be at least 1"
    );

    let shape = object([("note", string().optional(true).into())]);
    assert_coerced!(shape.validate_sync(&json!({})), json!({}));
}

#[test]
fn test_nullable_properties_keep_absence() {
    let shape = object([
        ("a", string().nullable(true).optional(true).into()),
        ("b", integer().nullable(true).into()),
    ]);
    assert_coerced!(shape.validate_sync(&json!({"b": null})), json!({"b": null}));
    assert_coerced!(
        shape.validate_sync(&json!({"a": null, "b": "3"})),
        json!({"a": null, "b": 3})
    );
    assert_validation_error!(shape.validate_sync(&json!({"a": "x"})), "b is required");

    let root = string().nullable(true).optional(true);
    assert_coerced!(root.validate_sync_option(None), None);
    assert_coerced!(root.validate_sync_option(Some(json!(null))), Some(json!(null)));
}

#[test]
fn test_nested_paths() {
    let shape = object([(
        "a",
        object([("b", array(object([("c", integer().into())])).into())]).into(),
    )]);
    let input = parse(r#"{"a": {"b": [{"c": 1}, {"c": "x"}]}}"#);
    assert_validation_error!(shape.validate_sync(&input), "a.b[1].c should be integer");
    assert_validation_error!(
        shape.validate_sync(&parse(r#"{"a": {"b": [{}]}}"#)),
        "a.b[0].c is required"
    );
}

#[test]
fn test_merge_combines_properties() {
    let merged = merge(&fixtures::pagination(), &object([("keyword", string().into())]));
    let query = fixtures::query_string();
    assert_coerced!(
        merged.validate_sync(&query),
        json!({"page": 1, "pageSize": 15, "keyword": "foo"})
    );
    // The input is never modified by a cloning validation.
    assert_eq!(query, fixtures::query_string());

    assert_validation_error!(merged.validate_sync(&json!({})), "keyword is required");

    let relaxed = merge(
        &object([("a", integer().into())]),
        &object([("a", integer().optional(true).into())]),
    );
    assert_coerced!(relaxed.validate_sync(&json!({})), json!({}));
}

#[test]
fn test_extended_object_keywords() {
    let payment = object([
        ("card", string().optional(true).into()),
        ("billing", string().optional(true).into()),
    ])
    .extend(SchemaNode {
        dependencies: BTreeMap::from([(
            "card".to_string(),
            Dependency::Properties(vec!["billing".to_string()]),
        )]),
        max_properties: Some(2),
        ..SchemaNode::default()
    });
    assert_coerced!(payment.validate_sync(&json!({})), json!({}));
    assert_validation_error!(
        payment.validate_sync(&json!({"card": "4111"})),
        "value should have property billing when property card exists"
    );

    let labels = object(Vec::<(String, Shape)>::new()).extend(SchemaNode {
        additional_properties: Some(Additional::Schema(Box::new(
            integer().to_schema(),
        ))),
        ..SchemaNode::default()
    });
    // Additional properties that fail their schema are dropped.
    assert_coerced!(
        labels.validate_sync(&json!({"x": "1", "y": "no"})),
        json!({"x": 1})
    );
}
