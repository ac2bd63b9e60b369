//! Compiled validators and the evaluation walk.
//!
//! Evaluation works on *slots* (`Option<Value>`): an absent value is `None`,
//! which lets null stripping and default injection change presence the same
//! way at every level. Every node is evaluated in a fixed order:
//!
//! 1. `stripNull`, then default injection if the slot is empty
//! 2. modifying keywords (`cast`, `transform`, `customSync`, `customAsync`)
//! 3. type-level checks (`type`, `kind`, `enum`, `const`)
//! 4. numeric, string, array and object checks, recursing into children
//! 5. `allOf`, `anyOf`, `oneOf`, `not`, `if`/`then`/`else`
//!
//! The walk is a single future. Nothing in it suspends unless a
//! `customAsync` keyword does, so synchronous callers can poll it once.

use super::format;
use super::record::{DataPath, ErrorParams, ErrorRecord};
use crate::error::{ShapeError, ShapeResult};
use crate::keyword::{self, Keyword, KeywordContext, KeywordOutcome, StripNull};
use crate::keyword::cast::is_date;
use crate::schema::transform::requires_async;
use crate::schema::{Additional, Dependency, Items, Kind, SchemaNode, SchemaType};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Outcome of evaluating a slot: the first failure, if any.
pub type EvalResult = Result<(), Box<ErrorRecord>>;

/// A schema graph prepared for repeated evaluation.
#[derive(Debug)]
pub struct Validator {
    schema: SchemaNode,
    patterns: HashMap<String, Regex>,
    is_async: bool,
}

impl Validator {
    /// Compile a simplified schema graph.
    ///
    /// Every `pattern` and `patternProperties` expression is compiled up
    /// front; an invalid one is a usage error.
    pub fn compile(schema: SchemaNode) -> ShapeResult<Self> {
        let mut patterns = HashMap::new();
        collect_patterns(&schema, &mut patterns)?;
        let is_async = requires_async(&schema);
        log::debug!(
            "Compiled validator with {} pattern(s), async: {}",
            patterns.len(),
            is_async
        );
        Ok(Self {
            schema,
            patterns,
            is_async,
        })
    }

    /// Whether evaluation may suspend on an asynchronous hook.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// The compiled schema graph.
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Evaluate `data` in place.
    pub fn evaluate<'a>(&'a self, data: &'a mut Option<Value>) -> BoxFuture<'a, EvalResult> {
        async move {
            let path = DataPath::root();
            self.eval_slot(&self.schema, data, &path).await
        }
        .boxed()
    }

    fn eval_slot<'a>(
        &'a self,
        node: &'a SchemaNode,
        slot: &'a mut Option<Value>,
        path: &'a DataPath,
    ) -> BoxFuture<'a, EvalResult> {
        async move {
            let mut stripped = false;
            if node.strip_null {
                stripped = slot.as_ref().is_some_and(Value::is_null);
                self.apply_keyword(&StripNull, node, slot, path).await?;
            }
            if slot.is_none() {
                match &node.default {
                    Some(default) => *slot = Some(default.clone()),
                    // An explicit null with nothing to replace it stays null.
                    None if stripped => *slot = Some(Value::Null),
                    None => return Ok(()),
                }
            }
            for keyword in keyword::modifiers(node) {
                self.apply_keyword(keyword, node, slot, path).await?;
            }
            if let Some(value) = slot.as_mut() {
                self.check_value(node, value, path).await?;
            }
            self.check_compound(node, slot, path).await
        }
        .boxed()
    }

    async fn apply_keyword(
        &self,
        keyword: &dyn Keyword,
        node: &SchemaNode,
        slot: &mut Option<Value>,
        path: &DataPath,
    ) -> EvalResult {
        let Some(value) = slot.as_ref() else {
            return Ok(());
        };
        let outcome = keyword.run(value, KeywordContext { path }).await;
        match outcome {
            KeywordOutcome::Unchanged => {}
            KeywordOutcome::Replace(next) => *slot = Some(next),
            KeywordOutcome::Remove => *slot = None,
            KeywordOutcome::Invalid(params) => {
                return Err(fail(keyword.name(), path, params, node, slot.as_ref()));
            }
        }
        Ok(())
    }

    async fn check_value(
        &self,
        node: &SchemaNode,
        value: &mut Value,
        path: &DataPath,
    ) -> EvalResult {
        let null_allowed = value.is_null() && node.is_nullable();

        if let Some(expected) = node.schema_type {
            if !null_allowed && !type_matches(expected, value) {
                let params = ErrorParams::Type {
                    expected: expected.as_str().to_string(),
                };
                return Err(fail("type", path, params, node, Some(&*value)));
            }
        }
        if let Some(kind) = node.kind {
            if !null_allowed && !kind_matches(kind, value) {
                return Err(fail("kind", path, ErrorParams::Kind { kind }, node, Some(&*value)));
            }
        }
        if null_allowed {
            return Ok(());
        }
        if let Some(allowed) = &node.enum_values {
            if !allowed.iter().any(|candidate| json_equal(candidate, value)) {
                let params = ErrorParams::Enum {
                    allowed: allowed.clone(),
                };
                return Err(fail("enum", path, params, node, Some(&*value)));
            }
        }
        if let Some(allowed) = &node.const_value {
            if !json_equal(allowed, value) {
                let params = ErrorParams::Const {
                    allowed: allowed.clone(),
                };
                return Err(fail("const", path, params, node, Some(&*value)));
            }
        }

        if let Some(number) = value.as_f64() {
            return self.check_number(node, number, path, value);
        }
        match value {
            Value::String(text) => self.check_string(node, text, path),
            Value::Array(items) => self.check_array(node, items, path).await,
            Value::Object(map) => self.check_object(node, map, path).await,
            _ => Ok(()),
        }
    }

    fn check_number(
        &self,
        node: &SchemaNode,
        number: f64,
        path: &DataPath,
        value: &Value,
    ) -> EvalResult {
        let bounds = [
            ("minimum", node.minimum, number < node.minimum.unwrap_or(f64::NEG_INFINITY)),
            ("maximum", node.maximum, number > node.maximum.unwrap_or(f64::INFINITY)),
            (
                "exclusiveMinimum",
                node.exclusive_minimum,
                node.exclusive_minimum.is_some_and(|limit| number <= limit),
            ),
            (
                "exclusiveMaximum",
                node.exclusive_maximum,
                node.exclusive_maximum.is_some_and(|limit| number >= limit),
            ),
        ];
        for (keyword, limit, violated) in bounds {
            if let (Some(limit), true) = (limit, violated) {
                return Err(fail(keyword, path, ErrorParams::Limit { limit }, node, Some(value)));
            }
        }
        if let Some(multiple_of) = node.multiple_of {
            let quotient = number / multiple_of;
            if !quotient.is_finite() || quotient != quotient.trunc() {
                let params = ErrorParams::MultipleOf { multiple_of };
                return Err(fail("multipleOf", path, params, node, Some(value)));
            }
        }
        Ok(())
    }

    fn check_string(&self, node: &SchemaNode, text: &str, path: &DataPath) -> EvalResult {
        let reject = |keyword: &str, params: ErrorParams| -> EvalResult {
            let data = Value::String(text.to_string());
            Err(fail(keyword, path, params, node, Some(&data)))
        };
        let length = text.chars().count();
        if let Some(limit) = node.max_length.filter(|limit| length > *limit) {
            return reject("maxLength", ErrorParams::Count { limit });
        }
        if let Some(limit) = node.min_length.filter(|limit| length < *limit) {
            return reject("minLength", ErrorParams::Count { limit });
        }
        if let Some(pattern) = &node.pattern {
            if !self.pattern_matches(pattern, text) {
                let params = ErrorParams::Pattern {
                    pattern: pattern.clone(),
                };
                return reject("pattern", params);
            }
        }
        if let Some(string_format) = node.format {
            if !format::check(string_format, text) {
                let params = ErrorParams::Format {
                    format: string_format,
                };
                return reject("format", params);
            }
        }
        Ok(())
    }

    async fn check_array(
        &self,
        node: &SchemaNode,
        items: &mut Vec<Value>,
        path: &DataPath,
    ) -> EvalResult {
        match &node.items {
            Some(Items::Single(item)) => {
                for index in 0..items.len() {
                    self.eval_element(item, items, index, path).await?;
                }
            }
            Some(Items::Tuple(positions)) => {
                for (index, item) in positions.iter().enumerate() {
                    if index < items.len() {
                        self.eval_element(item, items, index, path).await?;
                        continue;
                    }
                    // Missing positions may be filled from defaults, in order.
                    let mut slot = None;
                    self.eval_slot(item, &mut slot, &path.index(index)).await?;
                    match slot {
                        Some(filled) if index == items.len() => items.push(filled),
                        _ => break,
                    }
                }
                match &node.additional_items {
                    Some(Additional::Allowed(false)) if items.len() > positions.len() => {
                        let params = ErrorParams::Count {
                            limit: positions.len(),
                        };
                        let data = Value::Array(items.clone());
                        return Err(fail("additionalItems", path, params, node, Some(&data)));
                    }
                    Some(Additional::Schema(extra)) => {
                        for index in positions.len()..items.len() {
                            self.eval_element(extra, items, index, path).await?;
                        }
                    }
                    _ => {}
                }
            }
            None => {}
        }

        if let Some(limit) = node.max_items.filter(|limit| items.len() > *limit) {
            let data = Value::Array(items.clone());
            return Err(fail("maxItems", path, ErrorParams::Count { limit }, node, Some(&data)));
        }
        if let Some(limit) = node.min_items.filter(|limit| items.len() < *limit) {
            let data = Value::Array(items.clone());
            return Err(fail("minItems", path, ErrorParams::Count { limit }, node, Some(&data)));
        }
        if let Some(contains) = &node.contains {
            let mut found = false;
            for (index, item) in items.iter().enumerate() {
                let mut trial = Some(item.clone());
                if self.eval_slot(contains, &mut trial, &path.index(index)).await.is_ok() {
                    found = true;
                    break;
                }
            }
            if !found {
                let data = Value::Array(items.clone());
                return Err(fail("contains", path, ErrorParams::None, node, Some(&data)));
            }
        }
        if node.unique_items == Some(true) {
            for second in 1..items.len() {
                let duplicate =
                    (0..second).find(|first| json_equal(&items[*first], &items[second]));
                if let Some(first) = duplicate {
                    let params = ErrorParams::UniqueItems { first, second };
                    let data = Value::Array(items.clone());
                    return Err(fail("uniqueItems", path, params, node, Some(&data)));
                }
            }
        }
        Ok(())
    }

    async fn eval_element(
        &self,
        node: &SchemaNode,
        items: &mut [Value],
        index: usize,
        path: &DataPath,
    ) -> EvalResult {
        let mut slot = Some(std::mem::take(&mut items[index]));
        let result = self.eval_slot(node, &mut slot, &path.index(index)).await;
        items[index] = slot.unwrap_or(Value::Null);
        result
    }

    async fn check_object(
        &self,
        node: &SchemaNode,
        map: &mut Map<String, Value>,
        path: &DataPath,
    ) -> EvalResult {
        if let Some(properties) = &node.properties {
            for (key, child) in properties.iter() {
                let mut slot = map.remove(key);
                let result = self.eval_slot(child, &mut slot, &path.key(key)).await;
                if let Some(value) = slot {
                    map.insert(key.to_string(), value);
                }
                result?;
            }
        }

        let keys: Vec<String> = map.keys().cloned().collect();
        for key in &keys {
            let mut matched = false;
            for (pattern, child) in &node.pattern_properties {
                if !self.pattern_matches(pattern, key) {
                    continue;
                }
                matched = true;
                let mut slot = map.remove(key);
                let result = self.eval_slot(child, &mut slot, &path.key(key.as_str())).await;
                if let Some(value) = slot {
                    map.insert(key.clone(), value);
                }
                result?;
            }
            let declared = node
                .properties
                .as_ref()
                .is_some_and(|properties| properties.contains_key(key));
            if matched || declared {
                continue;
            }
            match &node.additional_properties {
                Some(Additional::Allowed(false)) => {
                    log::trace!("Removing unknown property '{}' at '{}'", key, path);
                    map.remove(key);
                }
                Some(Additional::Schema(extra)) => {
                    let mut trial = map.get(key).cloned();
                    match self.eval_slot(extra, &mut trial, &path.key(key.as_str())).await {
                        Ok(()) => match trial {
                            Some(value) => {
                                map.insert(key.clone(), value);
                            }
                            None => {
                                map.remove(key);
                            }
                        },
                        Err(_) => {
                            map.remove(key);
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(names) = &node.property_names {
            let keys: Vec<String> = map.keys().cloned().collect();
            for key in keys {
                let mut trial = Some(Value::String(key.clone()));
                if self.eval_slot(names, &mut trial, path).await.is_err() {
                    let params = ErrorParams::PropertyName { name: key };
                    let data = Value::Object(map.clone());
                    return Err(fail("propertyNames", path, params, node, Some(&data)));
                }
            }
        }

        if let Some(missing) = node.required.iter().find(|key| !map.contains_key(*key)) {
            let params = ErrorParams::Required {
                missing: missing.clone(),
            };
            let data = Value::Object(map.clone());
            return Err(fail("required", path, params, node, Some(&data)));
        }

        for (property, dependency) in &node.dependencies {
            if !map.contains_key(property) {
                continue;
            }
            match dependency {
                Dependency::Properties(deps) => {
                    let missing: Vec<String> = deps
                        .iter()
                        .filter(|dep| !map.contains_key(*dep))
                        .cloned()
                        .collect();
                    if !missing.is_empty() {
                        let params = ErrorParams::Dependencies {
                            property: property.clone(),
                            deps: missing,
                        };
                        let data = Value::Object(map.clone());
                        return Err(fail("dependencies", path, params, node, Some(&data)));
                    }
                }
                Dependency::Schema(schema) => {
                    let mut slot = Some(Value::Object(std::mem::take(map)));
                    let result = self.eval_slot(schema, &mut slot, path).await;
                    if let Some(Value::Object(next)) = slot {
                        *map = next;
                    }
                    result?;
                }
            }
        }

        if let Some(limit) = node.max_properties.filter(|limit| map.len() > *limit) {
            let data = Value::Object(map.clone());
            let params = ErrorParams::Count { limit };
            return Err(fail("maxProperties", path, params, node, Some(&data)));
        }
        if let Some(limit) = node.min_properties.filter(|limit| map.len() < *limit) {
            let data = Value::Object(map.clone());
            let params = ErrorParams::Count { limit };
            return Err(fail("minProperties", path, params, node, Some(&data)));
        }
        Ok(())
    }

    async fn check_compound(
        &self,
        node: &SchemaNode,
        slot: &mut Option<Value>,
        path: &DataPath,
    ) -> EvalResult {
        if let Some(members) = &node.all_of {
            for member in members {
                self.eval_slot(member, slot, path).await?;
            }
        }

        if let Some(members) = &node.any_of {
            let mut first_error = None;
            let mut passed = false;
            for member in members {
                let mut trial = slot.clone();
                match self.eval_slot(member, &mut trial, path).await {
                    Ok(()) => {
                        *slot = trial;
                        passed = true;
                        break;
                    }
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }
            if !passed {
                return Err(first_error.unwrap_or_else(|| {
                    fail("anyOf", path, ErrorParams::None, node, slot.as_ref())
                }));
            }
        }

        if let Some(members) = &node.one_of {
            let mut first_error = None;
            let mut winner = None;
            let mut passing = 0usize;
            for member in members {
                let mut trial = slot.clone();
                match self.eval_slot(member, &mut trial, path).await {
                    Ok(()) => {
                        passing += 1;
                        winner.get_or_insert(trial);
                    }
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }
            match (passing, winner) {
                (1, Some(trial)) => *slot = trial,
                (0, _) => {
                    return Err(first_error.unwrap_or_else(|| {
                        fail("oneOf", path, ErrorParams::None, node, slot.as_ref())
                    }));
                }
                _ => return Err(fail("oneOf", path, ErrorParams::None, node, slot.as_ref())),
            }
        }

        if let Some(negated) = &node.not {
            let mut trial = slot.clone();
            if self.eval_slot(negated, &mut trial, path).await.is_ok() {
                return Err(fail("not", path, ErrorParams::None, node, slot.as_ref()));
            }
        }

        if let Some(condition) = &node.if_schema {
            let mut trial = slot.clone();
            if self.eval_slot(condition, &mut trial, path).await.is_ok() {
                *slot = trial;
                if let Some(then_schema) = &node.then_schema {
                    self.eval_slot(then_schema, slot, path).await?;
                }
            } else if let Some(else_schema) = &node.else_schema {
                self.eval_slot(else_schema, slot, path).await?;
            }
        }
        Ok(())
    }

    fn pattern_matches(&self, pattern: &str, text: &str) -> bool {
        match self.patterns.get(pattern) {
            Some(regex) => regex.is_match(text),
            None => {
                log::warn!("Pattern '{}' was not compiled, treating as match", pattern);
                true
            }
        }
    }
}

fn fail(
    keyword: &str,
    path: &DataPath,
    params: ErrorParams,
    node: &SchemaNode,
    data: Option<&Value>,
) -> Box<ErrorRecord> {
    Box::new(ErrorRecord::new(keyword, path, params, node, data))
}

fn collect_patterns(node: &SchemaNode, patterns: &mut HashMap<String, Regex>) -> ShapeResult<()> {
    let sources = node.pattern.iter().chain(node.pattern_properties.keys());
    for source in sources {
        if patterns.contains_key(source) {
            continue;
        }
        let regex = Regex::new(source).map_err(|err| ShapeError::invalid_pattern(source, err))?;
        patterns.insert(source.clone(), regex);
    }
    for child in node.children() {
        collect_patterns(child, patterns)?;
    }
    Ok(())
}

fn type_matches(expected: SchemaType, value: &Value) -> bool {
    match expected {
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::Number => value.is_number(),
        SchemaType::Integer => match value {
            Value::Number(number) => {
                number.is_i64()
                    || number.is_u64()
                    || number.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
            }
            _ => false,
        },
        SchemaType::String => value.is_string(),
        SchemaType::Boolean => value.is_boolean(),
    }
}

fn kind_matches(kind: Kind, value: &Value) -> bool {
    match kind {
        Kind::Date => value.as_str().is_some_and(is_date),
    }
}

/// Structural JSON equality; numbers compare by value (`1 == 1.0`).
pub fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => left == right,
    }
}
