//! Core schema type definitions.
//!
//! A [`SchemaNode`] is one node of a JSON-Schema-like constraint graph. Every
//! keyword is an optional field; an unset field places no constraint. Child
//! nodes nest at every structural position (items, properties, members of
//! `anyOf`, ...), which is the hierarchy the transform and the evaluator walk.
//!
//! A [`ThreePhaseSchema`] wraps a main node with ordered pre- and
//! post-processing steps. Builders produce three-phase schemas; the engine
//! only ever sees simplified [`SchemaNode`] graphs.

use crate::error::{HookError, HookResult};
use futures::future::{BoxFuture, FutureExt};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// JSON types understood by the `type` keyword.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    Number,
    Integer,
    String,
    Boolean,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic kinds layered on top of JSON types.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// An RFC 3339 date-time string
    Date,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
        }
    }
}

/// Targets of the implicit `cast` keyword.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CastKind {
    Number,
    Integer,
    Boolean,
    Date,
}

impl CastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

/// Built-in string formats.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum StringFormat {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "uri")]
    Uri,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "hostname")]
    Hostname,
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "uuid")]
    Uuid,
    #[serde(rename = "regex")]
    Regex,
}

impl StringFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Uri => "uri",
            Self::Email => "email",
            Self::Hostname => "hostname",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Uuid => "uuid",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String rewrites applied by the `transform` keyword.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum StringTransform {
    #[serde(rename = "trim")]
    Trim,
    #[serde(rename = "toLowerCase")]
    ToLowerCase,
    #[serde(rename = "toUpperCase")]
    ToUpperCase,
}

/// Custom error wording attached to a node.
///
/// `Text` applies to every failure of the node. `Keywords` maps keyword names
/// to messages; the `_` entry is the fallback for unlisted keywords.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Keywords(BTreeMap<String, String>),
}

impl ErrorMessage {
    pub const FALLBACK_KEY: &'static str = "_";

    /// Resolve the message for a failing keyword.
    pub fn resolve(&self, keyword: &str) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Keywords(map) => map
                .get(keyword)
                .or_else(|| map.get(Self::FALLBACK_KEY))
                .map(String::as_str),
        }
    }

    /// Whether a fallback applies to keywords without their own entry.
    pub fn has_fallback(&self) -> bool {
        match self {
            Self::Text(_) => true,
            Self::Keywords(map) => map.contains_key(Self::FALLBACK_KEY),
        }
    }
}

/// The `items` keyword: one schema for every element, or one per position.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Items {
    Single(Box<SchemaNode>),
    Tuple(Vec<SchemaNode>),
}

/// `additionalProperties` / `additionalItems`: a flag or a schema.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Additional {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

/// One entry of the `dependencies` keyword.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Dependency {
    Properties(Vec<String>),
    Schema(Box<SchemaNode>),
}

/// A named example value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Example {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Object properties in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, SchemaNode)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.0.iter().find(|(name, _)| name == key).map(|(_, node)| node)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a property; a replaced property keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: SchemaNode) {
        let key = key.into();
        match self.0.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = node,
            None => self.0.push((key, node)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut SchemaNode> {
        self.0.iter_mut().map(|(_, node)| node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SchemaNode)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, SchemaNode)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, node) in iter {
            properties.insert(key, node);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

type SyncHookFn = dyn Fn(&Value) -> HookResult<Option<Value>> + Send + Sync;
type AsyncHookFn = dyn Fn(Value) -> BoxFuture<'static, HookResult<Option<Value>>> + Send + Sync;

/// A synchronous user transformation embedded in a schema.
///
/// Returning `Ok(Some(v))` replaces the value, `Ok(None)` keeps it, and an
/// error rejects it.
#[derive(Clone)]
pub struct SyncHook(Arc<SyncHookFn>);

impl SyncHook {
    pub fn new<F, E>(hook: F) -> Self
    where
        F: Fn(&Value) -> Result<Option<Value>, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self(Arc::new(move |value: &Value| {
            hook(value).map_err(|err| HookError::new(err.to_string()))
        }))
    }

    pub fn call(&self, value: &Value) -> HookResult<Option<Value>> {
        (self.0)(value)
    }
}

/// An asynchronous user transformation embedded in a schema.
#[derive(Clone)]
pub struct AsyncHook(Arc<AsyncHookFn>);

impl AsyncHook {
    pub fn new<F, Fut, E>(hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
        E: fmt::Display,
    {
        Self(Arc::new(move |value: Value| {
            hook(value)
                .map(|result| result.map_err(|err| HookError::new(err.to_string())))
                .boxed()
        }))
    }

    pub fn call(&self, value: Value) -> BoxFuture<'static, HookResult<Option<Value>>> {
        (self.0)(value)
    }
}

impl fmt::Debug for SyncHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SyncHook")
    }
}

impl fmt::Debug for AsyncHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AsyncHook")
    }
}

// Hooks compare by identity.
impl PartialEq for SyncHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for AsyncHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One node of the constraint graph.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    // type markers
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,

    // annotations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, Example>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    // object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties: BTreeMap<String, SchemaNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Additional>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Dependency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<SchemaNode>>,

    // array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Additional>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Box<SchemaNode>>,

    // number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    // string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,

    // literal
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    // compound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_schema: Option<Box<SchemaNode>>,
    #[serde(rename = "then", skip_serializing_if = "Option::is_none")]
    pub then_schema: Option<Box<SchemaNode>>,
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_schema: Option<Box<SchemaNode>>,

    // extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<ErrorMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<CastKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<StringTransform>,
    #[serde(skip)]
    pub custom_sync: Option<SyncHook>,
    #[serde(skip)]
    pub custom_async: Option<AsyncHook>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub strip_null: bool,
}

macro_rules! take_if_set {
    ($target:ident, $source:ident; $($field:ident),* $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field;
            }
        )*
    };
}

macro_rules! take_if_nonempty {
    ($target:ident, $source:ident; $($field:ident),* $(,)?) => {
        $(
            if !$source.$field.is_empty() {
                $target.$field = $source.$field;
            }
        )*
    };
}

impl SchemaNode {
    /// A node constraining the JSON type.
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// A single step wrapping a synchronous hook.
    pub fn sync_step(hook: SyncHook) -> Self {
        Self {
            custom_sync: Some(hook),
            ..Self::default()
        }
    }

    /// A single step wrapping an asynchronous hook.
    pub fn async_step(hook: AsyncHook) -> Self {
        Self {
            custom_async: Some(hook),
            ..Self::default()
        }
    }

    /// A single step applying a string transform.
    pub fn transform_step(transform: StringTransform) -> Self {
        Self {
            transform: vec![transform],
            ..Self::default()
        }
    }

    /// Shallow merge: every keyword set on `other` replaces the one on `self`.
    pub fn extend(&mut self, other: SchemaNode) {
        take_if_set!(self, other;
            schema_type, nullable, kind, title, description, default, example,
            read_only, write_only, properties, additional_properties, min_properties,
            max_properties, property_names, items, additional_items, min_items,
            max_items, unique_items, contains, minimum, maximum, exclusive_minimum,
            exclusive_maximum, multiple_of, min_length, max_length, pattern, format,
            enum_values, const_value, not, any_of, one_of, all_of, if_schema,
            then_schema, else_schema, error_message, cast, custom_sync, custom_async,
        );
        take_if_nonempty!(self, other;
            examples, pattern_properties, required, dependencies, transform,
        );
        if other.strip_null {
            self.strip_null = true;
        }
    }

    /// This node's own keywords without its subschemas.
    ///
    /// Properties survive as title-only nodes so messages can still name
    /// them. Error records carry this instead of the full subtree.
    pub fn outline(&self) -> SchemaNode {
        let properties = self.properties.as_ref().map(|properties| {
            properties
                .iter()
                .map(|(key, node)| {
                    let titled = SchemaNode {
                        title: node.title.clone(),
                        ..SchemaNode::default()
                    };
                    (key, titled)
                })
                .collect()
        });
        SchemaNode {
            schema_type: self.schema_type,
            nullable: self.nullable,
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            properties,
            min_properties: self.min_properties,
            max_properties: self.max_properties,
            required: self.required.clone(),
            min_items: self.min_items,
            max_items: self.max_items,
            unique_items: self.unique_items,
            minimum: self.minimum,
            maximum: self.maximum,
            exclusive_minimum: self.exclusive_minimum,
            exclusive_maximum: self.exclusive_maximum,
            multiple_of: self.multiple_of,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: self.pattern.clone(),
            format: self.format,
            enum_values: self.enum_values.clone(),
            const_value: self.const_value.clone(),
            error_message: self.error_message.clone(),
            cast: self.cast,
            ..SchemaNode::default()
        }
    }

    /// Whether `null` passes the type check of this node.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Directly nested child schemas, in evaluation-independent order.
    pub fn children(&self) -> Vec<&SchemaNode> {
        let mut children = Vec::new();
        match &self.items {
            Some(Items::Single(item)) => children.push(item.as_ref()),
            Some(Items::Tuple(items)) => children.extend(items.iter()),
            None => {}
        }
        if let Some(Additional::Schema(node)) = &self.additional_items {
            children.push(node.as_ref());
        }
        if let Some(Additional::Schema(node)) = &self.additional_properties {
            children.push(node.as_ref());
        }
        let boxed = [
            &self.contains,
            &self.property_names,
            &self.not,
            &self.if_schema,
            &self.then_schema,
            &self.else_schema,
        ];
        children.extend(boxed.into_iter().flatten().map(Box::as_ref));
        for list in [&self.one_of, &self.any_of, &self.all_of].into_iter().flatten() {
            children.extend(list.iter());
        }
        if let Some(properties) = &self.properties {
            children.extend(properties.iter().map(|(_, node)| node));
        }
        children.extend(self.pattern_properties.values());
        for dependency in self.dependencies.values() {
            if let Dependency::Schema(node) = dependency {
                children.push(node.as_ref());
            }
        }
        children
    }

    /// Mutable access to the same children as [`SchemaNode::children`].
    pub fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        let SchemaNode {
            items,
            additional_items,
            additional_properties,
            contains,
            property_names,
            not,
            if_schema,
            then_schema,
            else_schema,
            one_of,
            any_of,
            all_of,
            properties,
            pattern_properties,
            dependencies,
            ..
        } = self;

        let mut children: Vec<&mut SchemaNode> = Vec::new();
        match items {
            Some(Items::Single(item)) => children.push(item.as_mut()),
            Some(Items::Tuple(items)) => children.extend(items.iter_mut()),
            None => {}
        }
        if let Some(Additional::Schema(node)) = additional_items {
            children.push(node.as_mut());
        }
        if let Some(Additional::Schema(node)) = additional_properties {
            children.push(node.as_mut());
        }
        let boxed = [contains, property_names, not, if_schema, then_schema, else_schema];
        children.extend(boxed.into_iter().flatten().map(Box::as_mut));
        for list in [one_of, any_of, all_of].into_iter().flatten() {
            children.extend(list.iter_mut());
        }
        if let Some(properties) = properties {
            children.extend(properties.values_mut());
        }
        children.extend(pattern_properties.values_mut());
        for dependency in dependencies.values_mut() {
            if let Dependency::Schema(node) = dependency {
                children.push(node.as_mut());
            }
        }
        children
    }

    /// Export the node as a JSON document. Hooks are omitted.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            log::warn!("Failed to export schema node: {}", err);
            Value::Null
        })
    }
}

/// A main schema surrounded by ordered pre- and post-processing steps.
///
/// `before` runs first to last and then `main`; `after` runs first to last
/// once `main` has passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreePhaseSchema {
    pub before: Vec<SchemaNode>,
    pub main: SchemaNode,
    pub after: Vec<SchemaNode>,
    pub default: Option<Value>,
    pub strip_null: bool,
}

impl ThreePhaseSchema {
    pub fn new(main: SchemaNode) -> Self {
        Self {
            main,
            ..Self::default()
        }
    }
}

/// Optionality metadata carried next to a shape's schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Whether the value may be absent
    pub optional: bool,
}
