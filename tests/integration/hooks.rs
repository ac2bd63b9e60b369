//! Pre- and post-processing hook tests.

use json_shape::prelude::*;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use crate::common::init_logging;

type Trace = Arc<Mutex<Vec<String>>>;

fn recorder(
    trace: &Trace,
    label: &'static str,
) -> impl Fn(&Value) -> Result<Option<Value>, HookError> + Send + Sync + 'static {
    let trace = Arc::clone(trace);
    move |value: &Value| {
        trace.lock().push(format!("{label}:{value}"));
        Ok(None)
    }
}

#[test]
fn test_steps_run_in_declared_order() {
    init_logging();
    let trace: Trace = Arc::default();
    let shape = integer()
        .before_sync(recorder(&trace, "outer-before"), false)
        .before_sync(recorder(&trace, "inner-before"), true)
        .after_sync(recorder(&trace, "inner-after"), true)
        .after_sync(recorder(&trace, "outer-after"), false);

    assert_coerced!(shape.validate_sync(&json!("5")), json!(5));
    assert_eq!(
        *trace.lock(),
        vec![
            "outer-before:\"5\"",
            "inner-before:\"5\"",
            "inner-after:5",
            "outer-after:5",
        ]
    );
}

#[test]
fn test_steps_added_later_wrap_earlier_ones() {
    let trace: Trace = Arc::default();
    let shape = string()
        .before_sync(recorder(&trace, "first"), false)
        .before_sync(recorder(&trace, "second"), false)
        .after_sync(recorder(&trace, "third"), false)
        .after_sync(recorder(&trace, "fourth"), true);

    assert_validation_success!(shape.validate_sync(&json!("x")));
    let labels: Vec<String> = trace
        .lock()
        .iter()
        .map(|entry| entry.split(':').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, vec!["second", "first", "fourth", "third"]);
}

#[test]
fn test_hooks_replace_values() {
    let shape = string()
        .before_sync(
            |value: &Value| Ok::<_, HookError>(value.as_i64().map(|n| json!(n.to_string()))),
            true,
        )
        .after_sync(
            |value: &Value| {
                Ok::<_, HookError>(value.as_str().map(|text| json!(format!("<{text}>"))))
            },
            true,
        );
    assert_coerced!(shape.validate_sync(&json!(42)), json!("<42>"));
    assert_coerced!(shape.validate_sync(&json!("a")), json!("<a>"));
}

#[test]
fn test_failed_main_check_skips_after_steps() {
    let trace: Trace = Arc::default();
    let shape = integer().after_sync(recorder(&trace, "after"), true);
    assert_validation_error!(shape.validate_sync(&json!("x")), "value should be integer");
    assert!(trace.lock().is_empty());
}

#[test]
fn test_hooks_skip_absent_values() {
    let trace: Trace = Arc::default();
    let shape = object([(
        "note",
        string()
            .before_sync(recorder(&trace, "note"), true)
            .optional(true)
            .into(),
    )]);
    assert_coerced!(shape.validate_sync(&json!({})), json!({}));
    assert!(trace.lock().is_empty());
}

fn row_id(known: &'static [i64]) -> NumberShape {
    integer().after_async(
        move |id: Value| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            if id.as_i64().is_some_and(|id| known.contains(&id)) {
                Ok(None)
            } else {
                Err(HookError::new("Cannot find valid data by ${name}"))
            }
        },
        true,
    )
}

#[tokio::test]
async fn test_async_hooks_validate_asynchronously() {
    init_logging();
    let params = object([
        ("id", row_id(&[1, 4]).into()),
        ("currId", row_id(&[1, 4]).optional(true).into()),
    ]);

    let value = params
        .validate_async(&json!({"id": "4"}))
        .await
        .expect("known id");
    assert_eq!(value, json!({"id": 4}));

    assert_validation_error!(
        params.validate_async(&json!({"id": 30000})).await,
        "Cannot find valid data by id"
    );
    assert_validation_error!(
        params.validate_async(&json!({"id": 4, "currId": 2})).await,
        "Cannot find valid data by currId"
    );

    let failure = params
        .validate_async(&json!({"id": 30000}))
        .await
        .expect_err("unknown id");
    assert_eq!(
        failure.as_validation().and_then(|err| err.keyword()),
        Some("customAsync")
    );
}

#[tokio::test]
async fn test_async_shapes_reject_sync_validation() {
    let shape = row_id(&[1]);
    let err = shape.validate_sync(&json!(1)).expect_err("needs async");
    assert!(matches!(err, ShapeError::AsyncRequired));
    assert!(!err.is_validation());

    // Nested async hooks are found too.
    let nested = array(object([("id", shape.clone().into())]));
    assert!(matches!(
        nested.validate_sync(&json!([])),
        Err(ShapeError::AsyncRequired)
    ));
    assert_coerced!(nested.validate_async(&json!([{"id": 1}])).await, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_async_path_runs_sync_shapes() {
    let shape = object([("n", integer().into())]);
    assert_coerced!(shape.validate_async(&json!({"n": "3"})).await, json!({"n": 3}));

    let mut data = Some(json!({"n": "3", "x": 1}));
    let result = shape
        .validate_async_with(&mut data, &ValidateOptions::in_place())
        .await;
    assert_coerced!(result, Some(json!({"n": 3})));
    assert_eq!(data, Some(json!({"n": 3})));
}

#[tokio::test]
async fn test_async_before_step_feeds_main_check() {
    let shape = integer().before_async(
        |value: Value| async move {
            Ok::<_, HookError>(value.as_str().map(|text| json!(text.len().to_string())))
        },
        true,
    );
    assert_coerced!(shape.validate_async(&json!("abcd")).await, json!(4));
}
