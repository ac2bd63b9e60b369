//! Shape identity, compilation caching and data isolation tests.

use json_shape::prelude::*;
use json_shape::schema::simplify_node;
use proptest::prelude::*;
use serde_json::{Value, json};

use crate::common::fixtures;

#[test]
fn test_modifiers_leave_receiver_untouched() {
    let base = fixtures::pagination();
    let before = base.to_schema();

    let _refined = base
        .title("query")
        .keep_unknown(true)
        .messages([("_", "bad query")])
        .nullable(true)
        .default(json!({}));

    assert_eq!(base.to_schema(), before);
    assert_coerced!(
        base.validate_sync(&json!({"page": "2", "x": 1})),
        json!({"page": 2, "pageSize": 20})
    );
}

#[test]
fn test_validator_is_compiled_once_per_identity() {
    let shape = fixtures::profile().erase();
    let handle = shape.clone();
    assert!(shape.same_identity(&handle));
    assert!(!handle.is_compiled());

    assert_validation_success!(shape.validate_sync(&json!({"age": null, "name": "n"})));
    assert!(handle.is_compiled());
    assert_validation_success!(handle.validate_sync(&json!({"age": 30, "name": "m"})));

    let derived = shape.title("profile");
    assert!(!derived.same_identity(&shape));
    assert!(!derived.is_compiled());
}

#[test]
fn test_in_place_validation_rewrites_input() {
    let shape = object([
        ("n", integer().into()),
        ("tags", array(string()).default(json!([])).into()),
    ]);

    let mut data = Some(json!({"n": "1", "extra": true}));
    let copy = shape
        .validate_sync_with(&mut data, &ValidateOptions::new())
        .expect("valid input");
    assert_eq!(copy, Some(json!({"n": 1, "tags": []})));
    assert_eq!(data, Some(json!({"n": "1", "extra": true})));

    let returned = shape
        .validate_sync_with(&mut data, &ValidateOptions::new().with_clone(false))
        .expect("valid input");
    assert_eq!(data, returned);
    assert_eq!(data, Some(json!({"n": 1, "tags": []})));
}

#[test]
fn test_schema_export() {
    let shape = integer().min(1.0, false).title("page");
    let exported = shape.to_schema().to_json();
    assert_eq!(
        exported,
        json!({"type": "integer", "title": "page", "minimum": 1.0, "cast": "integer"})
    );
}

fn query_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (1i64..=1000).prop_map(|n| json!(n)),
        (1i64..=1000).prop_map(|n| json!(n.to_string())),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn prop_cloning_validation_never_mutates_input(
        page in query_value(),
        size in query_value(),
        extra in "[a-z]{1,8}",
    ) {
        let shape = fixtures::pagination();
        let input = Some(json!({"page": page, "pageSize": size, "extra": extra}));
        let mut data = input.clone();
        let _ = shape.validate_sync_with(&mut data, &ValidateOptions::default());
        prop_assert_eq!(data, input);
    }

    #[test]
    fn prop_validation_is_idempotent(page in query_value(), size in query_value()) {
        let shape = fixtures::pagination();
        if let Ok(first) = shape.validate_sync(&json!({"page": page, "pageSize": size})) {
            let second = shape.validate_sync(&first);
            prop_assert_eq!(second.ok(), Some(first));
        }
    }

    #[test]
    fn prop_simplification_is_idempotent(
        min in 0u32..100,
        steps in 0usize..3,
        optional in proptest::bool::ANY,
    ) {
        let mut shape = integer().min(f64::from(min), false);
        for _ in 0..steps {
            shape = shape.after_sync(|_: &Value| Ok::<_, HookError>(None), false);
        }
        let shape = object([("n", shape.optional(optional).into())]);
        let once = shape.to_schema();
        prop_assert_eq!(simplify_node(&once), once);
    }
}
