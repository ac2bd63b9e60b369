//! Validation dispatch.
//!
//! The value under validation is never evaluated directly: it is placed in a
//! `{ "value": ... }` container and the container is checked against an
//! object schema whose only property is the shape's simplified graph. The
//! root value can then be absent and still go through the ordinary
//! `required` mechanism, and coercions at the root have a parent to write
//! into like everywhere else.

use crate::engine::ErrorRecord;
use crate::error::{ShapeError, ShapeResult, ValidationError};
use crate::messages::{self, MessageCatalog};
use crate::schema::{Properties, SchemaNode, SchemaType};
use crate::shape::Shape;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::sync::Arc;

const VALUE_KEY: &str = "value";

/// Per-call validation settings.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Validate a copy and leave the caller's data untouched
    pub clone: bool,
    /// Message catalog to use instead of the process-wide default
    pub messages: Option<Arc<MessageCatalog>>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            clone: true,
            messages: None,
        }
    }
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that rewrite the caller's data in place.
    pub fn in_place() -> Self {
        Self {
            clone: false,
            ..Self::default()
        }
    }

    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    pub fn with_messages(mut self, messages: Arc<MessageCatalog>) -> Self {
        self.messages = Some(messages);
        self
    }

    fn catalog(&self) -> Arc<MessageCatalog> {
        match &self.messages {
            Some(catalog) => Arc::clone(catalog),
            None => messages::default_catalog(),
        }
    }
}

/// The container schema a shape is compiled into.
pub(crate) fn wrap(shape: &Shape) -> SchemaNode {
    let mut properties = Properties::new();
    properties.insert(VALUE_KEY, shape.simplified());
    let required = if shape.is_optional() {
        Vec::new()
    } else {
        vec![VALUE_KEY.to_string()]
    };
    SchemaNode {
        properties: Some(properties),
        required,
        ..SchemaNode::typed(SchemaType::Object)
    }
}

fn container(data: Option<Value>) -> Option<Value> {
    let mut map = Map::new();
    if let Some(value) = data {
        map.insert(VALUE_KEY.to_string(), value);
    }
    Some(Value::Object(map))
}

fn unwrap_container(container: Option<Value>) -> Option<Value> {
    match container {
        Some(Value::Object(mut map)) => map.remove(VALUE_KEY),
        _ => None,
    }
}

fn failure(options: &ValidateOptions, record: Box<ErrorRecord>) -> ShapeError {
    let message = options.catalog().format(Some(&record));
    log::debug!("Validation failed on '{}' at '{}': {}", record.keyword, record.path, message);
    ValidationError::new(message, Some(*record)).into()
}

/// Validate `data` against `shape` without suspending.
///
/// Shapes containing asynchronous hooks are rejected with
/// [`ShapeError::AsyncRequired`] before anything runs.
pub fn validate_sync(
    shape: &Shape,
    data: &mut Option<Value>,
    options: &ValidateOptions,
) -> ShapeResult<Option<Value>> {
    let validator = shape.validator()?;
    if validator.is_async() {
        return Err(ShapeError::AsyncRequired);
    }

    let target = if options.clone { data.clone() } else { data.take() };
    let mut wrapped = container(target);
    let outcome = validator.evaluate(&mut wrapped).now_or_never();
    let value = unwrap_container(wrapped);

    let result = match outcome {
        Some(Ok(())) => Ok(value.clone()),
        Some(Err(record)) => Err(failure(options, record)),
        None => Err(ShapeError::Incomplete),
    };
    if !options.clone {
        *data = value;
    }
    result
}

/// Validate `data` against `shape`, awaiting asynchronous hooks in order.
pub async fn validate_async(
    shape: &Shape,
    data: &mut Option<Value>,
    options: &ValidateOptions,
) -> ShapeResult<Option<Value>> {
    let validator = shape.validator()?;

    let target = if options.clone { data.clone() } else { data.take() };
    let mut wrapped = container(target);
    let outcome = validator.evaluate(&mut wrapped).await;
    let value = unwrap_container(wrapped);

    let result = match outcome {
        Ok(()) => Ok(value.clone()),
        Err(record) => Err(failure(options, record)),
    };
    if !options.clone {
        *data = value;
    }
    result
}
