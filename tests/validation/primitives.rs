//! Scalar shape validation tests.
//!
//! Each kind is checked for values it passes through untouched, values it
//! coerces and values it rejects with the generated English message.

use json_shape::prelude::*;
use serde_json::{Value, json};

use crate::common::init_logging;

fn check_passes(shape: &impl BaseShape, inputs: &[Value]) {
    for input in inputs {
        assert_coerced!(shape.validate_sync(input), input.clone());
    }
}

#[test]
fn test_any_accepts_everything_present() {
    init_logging();
    check_passes(
        &any(),
        &[json!(null), json!("ABCdef"), json!(12.34), json!({"a": [1]})],
    );
    assert_validation_error!(any().validate_sync_option(None), "value is required");
}

#[test]
fn test_number() {
    let shape = number();
    check_passes(&shape, &[json!(1231), json!(1231.12)]);
    assert_coerced!(shape.validate_sync(&json!("1231")), json!(1231));
    assert_coerced!(shape.validate_sync(&json!("1231.12")), json!(1231.12));
    assert_validation_error!(shape.validate_sync(&json!("string")), "value should be number");
    assert_validation_error!(shape.validate_sync_option(None), "value is required");
}

#[test]
fn test_number_lower_bound() {
    let shape = number().min(10.0, false);
    check_passes(&shape, &[json!(10e6), json!(10), json!(10.0001)]);
    for input in [json!(9), json!(9.9999), json!(-10)] {
        assert_validation_error!(shape.validate_sync(&input), "value should be at least 10");
    }

    let exclusive = number().min(10.0, true);
    assert_validation_error!(
        exclusive.validate_sync(&json!(10)),
        "value should be greater than 10"
    );
}

#[test]
fn test_number_range_and_multiple() {
    let shape = number().range(0.0, 1.0, true).multiple_of(0.25);
    assert_coerced!(shape.validate_sync(&json!("0.5")), json!(0.5));
    assert_validation_error!(shape.validate_sync(&json!(1)), "value should be less than 1");
    assert_validation_error!(
        shape.validate_sync(&json!(0.3)),
        "value should be multiple of 0.25"
    );
}

#[test]
fn test_integer() {
    let shape = integer();
    check_passes(&shape, &[json!(1231)]);
    assert_coerced!(shape.validate_sync(&json!("1231")), json!(1231));
    for input in [
        json!(true),
        json!(false),
        json!("123.12"),
        json!("string"),
        json!(123.12),
    ] {
        assert_validation_error!(shape.validate_sync(&input), "value should be integer");
    }
    assert_validation_error!(shape.validate_sync_option(None), "value is required");
}

#[test]
fn test_string() {
    let shape = string();
    check_passes(&shape, &[json!("1231"), json!("123.12"), json!("string")]);
    for input in [json!(1231), json!(123.12), json!(true), json!(false), json!(null)] {
        assert_validation_error!(shape.validate_sync(&input), "value should be string");
    }
    assert_validation_error!(shape.validate_sync_option(None), "value is required");
}

#[test]
fn test_nullable_string() {
    let shape = string().nullable(true);
    check_passes(&shape, &[json!("string"), json!(null)]);
    assert_validation_error!(shape.validate_sync(&json!(1231)), "value should be string");
    assert_validation_error!(shape.validate_sync_option(None), "value is required");
    assert_coerced!(shape.optional(true).validate_sync_option(None), None);
    assert_coerced!(
        shape.default(json!("fallback")).validate_sync(&json!(null)),
        json!("fallback")
    );

    let strict = shape.nullable(false);
    assert_validation_error!(strict.validate_sync(&json!(null)), "value should be string");
    assert_validation_error!(strict.validate_sync_option(None), "value is required");
}

#[test]
fn test_string_constraints() {
    let shape = string().min_length(2).max_length(4);
    assert_validation_error!(
        shape.validate_sync(&json!("a")),
        "value should have at least 2 characters"
    );
    assert_validation_error!(
        shape.validate_sync(&json!("abcde")),
        "value should have at most 4 characters"
    );
    check_passes(&shape, &[json!("ab"), json!("äöüß")]);

    let code = string().pattern("^[A-Z]{3}$");
    assert_validation_error!(
        code.validate_sync(&json!("abc")),
        "value should match pattern /^[A-Z]{3}$/"
    );
    assert_coerced!(code.uppercase().validate_sync(&json!("abc")), json!("ABC"));
}

#[test]
fn test_string_formats() {
    let email = string().format(StringFormat::Email);
    check_passes(&email, &[json!("someone@example.com")]);
    assert_validation_error!(
        email.validate_sync(&json!("someone")),
        "value should be email string"
    );

    let uuid = string().format(StringFormat::Uuid);
    check_passes(&uuid, &[json!("a0c1d6a8-0d5e-4b79-9c8a-7c5f0d3f8e2b")]);
    assert_validation_error!(
        uuid.validate_sync(&json!("not-a-uuid")),
        "value should be uuid string"
    );
}

#[test]
fn test_trim_then_length() {
    let shape = string().min_length(1).trim();
    assert_coerced!(shape.validate_sync(&json!("  a  ")), json!("a"));
    assert_validation_error!(
        shape.validate_sync(&json!("   ")),
        "value should have at least 1 character"
    );
}

#[test]
fn test_boolean() {
    let shape = boolean();
    check_passes(&shape, &[json!(true), json!(false)]);
    for (input, output) in [
        (json!("true"), true),
        (json!("false"), false),
        (json!(1), true),
        (json!(0), false),
        (json!("1"), true),
        (json!("0"), false),
    ] {
        assert_coerced!(shape.validate_sync(&input), json!(output));
    }
    for input in [json!("t"), json!("f"), json!("string"), json!(null)] {
        assert_validation_error!(shape.validate_sync(&input), "value should be boolean");
    }
    check_passes(&boolean().nullable(true), &[json!(null), json!(true)]);
}

#[test]
fn test_date() {
    let shape = date();
    assert_coerced!(
        shape.validate_sync(&json!("2020-09-09T09:09:09.099Z")),
        json!("2020-09-09T09:09:09.099Z")
    );
    assert_coerced!(
        shape.validate_sync(&json!("2020-09-09T17:09:09.099+08:00")),
        json!("2020-09-09T09:09:09.099Z")
    );
    for input in [
        json!(1599642549099i64),
        json!("1599642549099"),
        json!("Fri Sep 11 2020 15:50:25 GMT+0800 (GMT+08:00)"),
        json!("string"),
        json!(null),
    ] {
        assert_validation_error!(shape.validate_sync(&input), "value should be date");
    }
    check_passes(&date().nullable(true), &[json!(null)]);
}

#[test]
fn test_enumerate_and_constant() {
    let colour = enumerate([json!("red"), json!("green"), json!("blue"), json!("black")]);
    check_passes(&colour, &[json!("green")]);
    assert_validation_error!(
        colour.validate_sync(&json!("pink")),
        "value should be one of red, green, blue..."
    );

    let answer = constant(json!(42));
    check_passes(&answer, &[json!(42)]);
    assert_coerced!(answer.validate_sync(&json!(42.0)), json!(42.0));
    assert_validation_error!(answer.validate_sync(&json!(41)), "value should equal to 42");

    let optional_colour = enumerate([json!("red")]).nullable(true);
    check_passes(&optional_colour, &[json!(null), json!("red")]);
}

#[test]
fn test_optional_root() {
    let shape = integer().optional(true);
    assert_coerced!(shape.validate_sync_option(None), None);
    assert_coerced!(shape.validate_sync_option(Some(json!("7"))), Some(json!(7)));

    let defaulted = integer().default(json!(5));
    assert_coerced!(defaulted.validate_sync_option(None), Some(json!(5)));
}
