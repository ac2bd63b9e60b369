//! Immutable, fluent shape builders.
//!
//! A [`Shape`] pairs a [`ThreePhaseSchema`] with optionality metadata behind
//! a shared allocation. Every modifier copies the schema, applies its change
//! to the copy and returns a new shape, so a shape can be refined along many
//! branches without the branches affecting each other.
//!
//! Kind-specific modifiers live on thin wrappers ([`StringShape`],
//! [`NumberShape`], [`ArrayShape`], [`TupleShape`], [`ObjectShape`]) that
//! all hold a [`Shape`]. The modifiers every kind shares, and the validation
//! entry points, are provided by the [`BaseShape`] trait.
//!
//! # Examples
//!
//! ```rust
//! use json_shape::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let query = object([
//!     ("page", integer().min(1.0, false).default(json!(1)).into()),
//!     ("keyword", string().trim().min_length(1).into()),
//! ]);
//!
//! let value = query.validate_sync(&json!({"page": "3", "keyword": "  rust "}))?;
//! assert_eq!(value, json!({"page": 3, "keyword": "rust"}));
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod compound;
pub mod number;
pub mod object;
pub mod other;
pub mod string;

pub use array::{ArrayShape, TupleShape, array, tuple};
pub use compound::{all_of, any_of, if_else, if_then, if_then_else, not, one_of};
pub use number::{NumberShape, integer, number};
pub use object::{ObjectShape, merge, object};
pub use other::{any, boolean, constant, custom, date, enumerate};
pub use string::{StringShape, string};

use crate::engine::Validator;
use crate::error::ShapeResult;
use crate::schema::transform::{overwrite_children_error_message, simplify_schema};
use crate::schema::{
    AsyncHook, ErrorMessage, Example, SchemaNode, ShapeOptions, SyncHook, ThreePhaseSchema,
};
use crate::validate::{self, ValidateOptions};
use futures::future::{BoxFuture, FutureExt};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The core of every shape.
///
/// Cloning a `Shape` shares its identity, and with it the compiled validator.
/// Every modifier produces a new identity.
#[derive(Clone)]
pub struct Shape {
    inner: Arc<ShapeInner>,
}

struct ShapeInner {
    schema: ThreePhaseSchema,
    options: ShapeOptions,
    compiled: OnceCell<Arc<Validator>>,
}

impl Shape {
    pub fn new(schema: ThreePhaseSchema, options: ShapeOptions) -> Self {
        Self {
            inner: Arc::new(ShapeInner {
                schema,
                options,
                compiled: OnceCell::new(),
            }),
        }
    }

    pub(crate) fn from_node(main: SchemaNode) -> Self {
        Self::new(ThreePhaseSchema::new(main), ShapeOptions::default())
    }

    /// The three-phase schema this shape was built from.
    pub fn schema(&self) -> &ThreePhaseSchema {
        &self.inner.schema
    }

    pub fn options(&self) -> ShapeOptions {
        self.inner.options
    }

    pub fn is_optional(&self) -> bool {
        self.inner.options.optional
    }

    /// The single evaluable graph for this shape.
    pub fn simplified(&self) -> SchemaNode {
        simplify_schema(&self.inner.schema)
    }

    /// Whether both handles refer to the same shape identity.
    pub fn same_identity(&self, other: &Shape) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the validator for this identity has been compiled already.
    pub fn is_compiled(&self) -> bool {
        self.inner.compiled.get().is_some()
    }

    pub(crate) fn with_schema(&self, recipe: impl FnOnce(&mut ThreePhaseSchema)) -> Self {
        let mut schema = self.inner.schema.clone();
        recipe(&mut schema);
        Self::new(schema, self.inner.options)
    }

    pub(crate) fn with_options(&self, recipe: impl FnOnce(&mut ShapeOptions)) -> Self {
        let mut options = self.inner.options;
        recipe(&mut options);
        Self::new(self.inner.schema.clone(), options)
    }

    /// The compiled validator, compiling it on first use.
    pub(crate) fn validator(&self) -> ShapeResult<Arc<Validator>> {
        self.inner
            .compiled
            .get_or_try_init(|| {
                log::debug!("Compiling validator for shape {:p}", Arc::as_ptr(&self.inner));
                Validator::compile(validate::wrap(self)).map(Arc::new)
            })
            .map(Arc::clone)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("schema", &self.inner.schema)
            .field("options", &self.inner.options)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

/// Modifiers and validation shared by every shape kind.
///
/// Modifiers never change `self`; each returns a new shape of the same kind.
pub trait BaseShape: Sized {
    /// The underlying shape.
    fn shape(&self) -> &Shape;

    /// Rewrap a shape produced by a modifier.
    fn from_shape(shape: Shape) -> Self;

    /// Forget the kind, keeping the shape.
    fn erase(&self) -> Shape {
        self.shape().clone()
    }

    /// A copy of this shape with `recipe` applied to its schema.
    fn produce(&self, recipe: impl FnOnce(&mut ThreePhaseSchema)) -> Self {
        Self::from_shape(self.shape().with_schema(recipe))
    }

    /// Allow the value to be absent.
    fn optional(&self, optional: bool) -> Self {
        Self::from_shape(self.shape().with_options(|options| options.optional = optional))
    }

    /// Accept `null`.
    ///
    /// An explicit `null` is stripped before any other check runs, so a
    /// default replaces it. Without a default the `null` is kept. An absent
    /// value is still governed by [`optional`](BaseShape::optional).
    fn nullable(&self, nullable: bool) -> Self {
        self.produce(|schema| {
            schema.main.nullable = nullable.then_some(true);
            schema.strip_null = nullable;
        })
    }

    /// Add a pre-processing step. `closest` places it right before the main
    /// schema, otherwise it runs before every existing step.
    fn before(&self, step: SchemaNode, closest: bool) -> Self {
        self.produce(|schema| {
            if closest {
                schema.before.push(step);
            } else {
                schema.before.insert(0, step);
            }
        })
    }

    /// Add a post-processing step. `closest` places it right after the main
    /// schema, otherwise it runs after every existing step.
    fn after(&self, step: SchemaNode, closest: bool) -> Self {
        self.produce(|schema| {
            if closest {
                schema.after.insert(0, step);
            } else {
                schema.after.push(step);
            }
        })
    }

    fn before_sync<F, E>(&self, hook: F, closest: bool) -> Self
    where
        F: Fn(&Value) -> Result<Option<Value>, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.before(SchemaNode::sync_step(SyncHook::new(hook)), closest)
    }

    fn after_sync<F, E>(&self, hook: F, closest: bool) -> Self
    where
        F: Fn(&Value) -> Result<Option<Value>, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.after(SchemaNode::sync_step(SyncHook::new(hook)), closest)
    }

    fn before_async<F, Fut, E>(&self, hook: F, closest: bool) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
        E: fmt::Display,
    {
        self.before(SchemaNode::async_step(AsyncHook::new(hook)), closest)
    }

    fn after_async<F, Fut, E>(&self, hook: F, closest: bool) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
        E: fmt::Display,
    {
        self.after(SchemaNode::async_step(AsyncHook::new(hook)), closest)
    }

    /// Merge every keyword set on `node` into the main schema.
    fn extend(&self, node: SchemaNode) -> Self {
        self.produce(|schema| schema.main.extend(node))
    }

    fn title(&self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.produce(|schema| schema.main.title = Some(title))
    }

    fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.produce(|schema| schema.main.description = Some(description))
    }

    /// Value used when the input is absent. `null` is ignored.
    fn default(&self, value: Value) -> Self {
        self.produce(|schema| {
            if !value.is_null() {
                schema.default = Some(value);
            }
        })
    }

    fn example(&self, value: Value) -> Self {
        self.produce(|schema| schema.main.example = Some(value))
    }

    fn examples<I, K>(&self, examples: I) -> Self
    where
        I: IntoIterator<Item = (K, Example)>,
        K: Into<String>,
    {
        let examples: Vec<(String, Example)> = examples
            .into_iter()
            .map(|(name, example)| (name.into(), example))
            .collect();
        self.produce(|schema| schema.main.examples.extend(examples))
    }

    /// Replace every generated message of this shape, including failures of
    /// nested schemas without a message of their own.
    fn message(&self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.produce(|schema| {
            let main = &mut schema.main;
            match &mut main.error_message {
                Some(ErrorMessage::Keywords(map)) => {
                    map.insert(ErrorMessage::FALLBACK_KEY.to_string(), message.clone());
                }
                slot => *slot = Some(ErrorMessage::Text(message.clone())),
            }
            overwrite_children_error_message(main, &message);
        })
    }

    /// Per-keyword messages. The `_` entry applies to every other keyword and
    /// to nested schemas without a message of their own.
    fn messages<I, K, V>(&self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages: BTreeMap<String, String> = messages
            .into_iter()
            .map(|(keyword, message)| (keyword.into(), message.into()))
            .collect();
        self.produce(|schema| {
            let main = &mut schema.main;
            let mut merged = match main.error_message.take() {
                Some(ErrorMessage::Text(text)) => {
                    BTreeMap::from([(ErrorMessage::FALLBACK_KEY.to_string(), text)])
                }
                Some(ErrorMessage::Keywords(map)) => map,
                None => BTreeMap::new(),
            };
            let fallback = messages.get(ErrorMessage::FALLBACK_KEY).cloned();
            merged.extend(messages);
            main.error_message = Some(ErrorMessage::Keywords(merged));
            if let Some(fallback) = fallback {
                overwrite_children_error_message(main, &fallback);
            }
        })
    }

    /// The simplified graph this shape validates against.
    fn to_schema(&self) -> SchemaNode {
        self.shape().simplified()
    }

    /// Validate synchronously.
    ///
    /// With `options.clone` (the default) `data` is left untouched and the
    /// coerced copy is returned. Otherwise `data` is rewritten in place, also
    /// when validation fails part way.
    fn validate_sync_with(
        &self,
        data: &mut Option<Value>,
        options: &ValidateOptions,
    ) -> ShapeResult<Option<Value>> {
        validate::validate_sync(self.shape(), data, options)
    }

    /// Validate a copy of `value` synchronously.
    fn validate_sync(&self, value: &Value) -> ShapeResult<Value> {
        self.validate_sync_owned(value.clone())
    }

    /// Validate `value` synchronously, coercing it in place.
    fn validate_sync_owned(&self, value: Value) -> ShapeResult<Value> {
        self.validate_sync_option(Some(value))
            .map(|value| value.unwrap_or(Value::Null))
    }

    /// Validate a possibly absent value synchronously.
    fn validate_sync_option(&self, value: Option<Value>) -> ShapeResult<Option<Value>> {
        let mut data = value;
        validate::validate_sync(self.shape(), &mut data, &ValidateOptions::in_place())?;
        Ok(data)
    }

    /// Validate asynchronously; the counterpart of
    /// [`validate_sync_with`](BaseShape::validate_sync_with).
    fn validate_async_with<'a>(
        &'a self,
        data: &'a mut Option<Value>,
        options: &'a ValidateOptions,
    ) -> BoxFuture<'a, ShapeResult<Option<Value>>> {
        validate::validate_async(self.shape(), data, options).boxed()
    }

    /// Validate a copy of `value` asynchronously.
    fn validate_async(&self, value: &Value) -> BoxFuture<'static, ShapeResult<Value>> {
        self.validate_async_owned(value.clone())
    }

    /// Validate `value` asynchronously, coercing it in place.
    fn validate_async_owned(&self, value: Value) -> BoxFuture<'static, ShapeResult<Value>> {
        self.validate_async_option(Some(value))
            .map(|result| result.map(|value| value.unwrap_or(Value::Null)))
            .boxed()
    }

    /// Validate a possibly absent value asynchronously.
    fn validate_async_option(
        &self,
        value: Option<Value>,
    ) -> BoxFuture<'static, ShapeResult<Option<Value>>> {
        let shape = self.shape().clone();
        async move {
            let mut data = value;
            validate::validate_async(&shape, &mut data, &ValidateOptions::in_place()).await?;
            Ok(data)
        }
        .boxed()
    }
}

impl BaseShape for Shape {
    fn shape(&self) -> &Shape {
        self
    }

    fn from_shape(shape: Shape) -> Self {
        shape
    }
}

/// Declares a kind wrapper around [`Shape`].
macro_rules! shape_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Shape);

        impl BaseShape for $name {
            fn shape(&self) -> &Shape {
                &self.0
            }

            fn from_shape(shape: Shape) -> Self {
                Self(shape)
            }
        }

        impl From<$name> for Shape {
            fn from(kind: $name) -> Shape {
                kind.0
            }
        }

        impl From<&$name> for Shape {
            fn from(kind: &$name) -> Shape {
                kind.0.clone()
            }
        }
    };
}

pub(crate) use shape_kind;

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Shape {
        shape.clone()
    }
}

