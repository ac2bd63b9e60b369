//! Logical combinator tests.

use json_shape::prelude::*;
use serde_json::json;

#[test]
fn test_any_of_reports_first_branch_error() {
    let shape = any_of([number().into(), string().into()]);
    assert_coerced!(shape.validate_sync(&json!("1")), json!(1));
    assert_coerced!(shape.validate_sync(&json!("a")), json!("a"));
    assert_validation_error!(shape.validate_sync(&json!(true)), "value should be number");
}

#[test]
fn test_one_of_requires_a_single_match() {
    let shape = one_of([integer().into(), boolean().into()]);
    assert_coerced!(shape.validate_sync(&json!(5)), json!(5));
    assert_coerced!(shape.validate_sync(&json!("true")), json!(true));
    // 1 is an integer and coerces to a boolean, so both branches match.
    assert_validation_error!(shape.validate_sync(&json!(1)), "validation failed");
    assert_validation_error!(shape.validate_sync(&json!([])), "value should be integer");
}

#[test]
fn test_all_of_threads_coercions() {
    let shape = all_of([number().into(), integer().max(10.0, false).into()]);
    assert_coerced!(shape.validate_sync(&json!("4")), json!(4));
    assert_validation_error!(shape.validate_sync(&json!("4.5")), "value should be integer");
    assert_validation_error!(shape.validate_sync(&json!("11")), "value should be at most 10");
}

#[test]
fn test_not() {
    let shape = not(string());
    assert_coerced!(shape.validate_sync(&json!(1)), json!(1));
    assert_validation_error!(shape.validate_sync(&json!("a")), "validation failed");
}

#[test]
fn test_conditionals() {
    let shape = if_then_else(string(), string().min_length(2), integer());
    assert_coerced!(shape.validate_sync(&json!("ab")), json!("ab"));
    assert_validation_error!(
        shape.validate_sync(&json!("a")),
        "value should have at least 2 characters"
    );
    assert_validation_error!(shape.validate_sync(&json!(true)), "value should be integer");

    let numeric = if_then(number(), integer());
    assert_coerced!(numeric.validate_sync(&json!("2")), json!(2));
    assert_coerced!(numeric.validate_sync(&json!("x")), json!("x"));

    let short = if_else(number(), string().max_length(1));
    assert_coerced!(short.validate_sync(&json!(12)), json!(12));
    assert_validation_error!(
        short.validate_sync(&json!("ab")),
        "value should have at most 1 character"
    );
}

#[test]
fn test_combinators_compose_with_modifiers() {
    let id = any_of([integer().into(), string().format(StringFormat::Uuid).into()])
        .optional(true)
        .title("id");
    let shape = object([("id", id)]);
    assert_coerced!(shape.validate_sync(&json!({})), json!({}));
    assert_coerced!(shape.validate_sync(&json!({"id": "7"})), json!({"id": 7}));
    assert_validation_error!(
        shape.validate_sync(&json!({"id": "seven"})),
        "id should be integer"
    );
}
