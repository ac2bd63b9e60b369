//! The implicit `cast` keyword.
//!
//! Runs immediately before the structural checks of any node declaring a
//! `number`, `integer` or `boolean` type or the `date` kind. Values that look
//! like the target are rewritten; everything else is left for the type check
//! to reject with its ordinary message.

use super::{Keyword, KeywordContext, KeywordOutcome};
use crate::schema::CastKind;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::{self, BoxFuture, FutureExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?(e-?\d+)?$").expect("number regex"));
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer regex"));

impl Keyword for CastKind {
    fn name(&self) -> &'static str {
        "cast"
    }

    fn run<'a>(
        &'a self,
        value: &'a Value,
        ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome> {
        let outcome = match cast(*self, value) {
            Some(next) => {
                log::trace!("cast {} at '{}': {} -> {}", self.as_str(), ctx.path, value, next);
                KeywordOutcome::Replace(next)
            }
            None => KeywordOutcome::Unchanged,
        };
        future::ready(outcome).boxed()
    }
}

/// Coerce `value` towards `kind`. `None` means "leave unchanged".
pub fn cast(kind: CastKind, value: &Value) -> Option<Value> {
    match kind {
        CastKind::Number => value.as_str().and_then(parse_number),
        CastKind::Integer => value
            .as_str()
            .filter(|text| INTEGER_RE.is_match(text))
            .and_then(parse_number),
        CastKind::Boolean => cast_boolean(value),
        CastKind::Date => value.as_str().and_then(normalize_date).map(Value::String),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if !NUMBER_RE.is_match(text) {
        return None;
    }
    if INTEGER_RE.is_match(text) {
        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
    }
    let float = text.parse::<f64>().ok()?;
    // Integral values such as `1e5` compare equal to their integer form.
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        return Some(Value::Number((float as i64).into()));
    }
    Number::from_f64(float).map(Value::Number)
}

fn cast_boolean(value: &Value) -> Option<Value> {
    let flag = match value {
        Value::Bool(_) => return None,
        Value::String(text) => match text.as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return None,
        },
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => true,
            Some(n) if n == 0.0 => false,
            _ => return None,
        },
        _ => return None,
    };
    Some(Value::Bool(flag))
}

/// Parse an RFC 3339 date-time and render it as UTC with millisecond precision.
pub fn normalize_date(text: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Whether `text` is a date-time the `date` kind accepts.
pub fn is_date(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
}
