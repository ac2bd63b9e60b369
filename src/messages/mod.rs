//! Human-readable messages for validation failures.
//!
//! A [`MessageCatalog`] turns the first [`ErrorRecord`] of a failed
//! validation into one string. Catalogs hold two static messages (the
//! generic fallback and the message for a missing root value) plus one
//! factory per keyword. Built-in catalogs exist for English and Simplified
//! Chinese.
//!
//! The process-wide default catalog is what validation uses unless
//! [`ValidateOptions`](crate::ValidateOptions) carries its own. It is
//! changed with [`set_locale`], [`set_static_message`] and
//! [`set_keyword_message`]; the last writer wins.

mod en;
mod zh_cn;

use crate::engine::{ErrorParams, ErrorRecord};
use crate::error::{ShapeError, ShapeResult};
use crate::schema::SchemaNode;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces the message for one keyword from the failure path (relative to
/// the validated value, empty at its root), the keyword parameters and the
/// node owning the keyword. An empty string selects the fallback.
pub type MessageFactory = Arc<dyn Fn(&str, &ErrorParams, &SchemaNode) -> String + Send + Sync>;

/// Keys accepted by [`set_static_message`].
pub const STATIC_MESSAGE_KEYS: [&str; 2] = ["fallback", "rootRequired"];

/// Built-in locale codes accepted by [`set_locale`].
pub const LOCALES: [&str; 2] = ["en", "zh-CN"];

const ROOT_KEY: &str = "value";

/// Static messages and per-keyword message factories.
#[derive(Clone)]
pub struct MessageCatalog {
    fallback: String,
    root_required: String,
    keywords: HashMap<String, MessageFactory>,
}

impl MessageCatalog {
    /// English messages, the default.
    pub fn english() -> Self {
        en::catalog()
    }

    /// Simplified Chinese messages.
    pub fn chinese() -> Self {
        zh_cn::catalog()
    }

    /// The built-in catalog for `code` (`"en"` or `"zh-CN"`).
    pub fn for_locale(code: &str) -> ShapeResult<Self> {
        match code {
            "en" => Ok(Self::english()),
            "zh-CN" => Ok(Self::chinese()),
            _ => Err(ShapeError::invalid_locale(code)),
        }
    }

    pub(crate) fn new(fallback: &str, root_required: &str) -> Self {
        Self {
            fallback: fallback.to_string(),
            root_required: root_required.to_string(),
            keywords: HashMap::new(),
        }
    }

    /// The generic fallback message.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// The message for a missing root value.
    pub fn root_required(&self) -> &str {
        &self.root_required
    }

    /// Replace one of the static messages.
    pub fn set_static(&mut self, key: &str, message: impl Into<String>) -> ShapeResult<()> {
        match key {
            "fallback" => self.fallback = message.into(),
            "rootRequired" => self.root_required = message.into(),
            _ => return Err(ShapeError::invalid_static_key(key)),
        }
        Ok(())
    }

    /// Install (or replace) the factory for `keyword`.
    pub fn set_keyword<F>(&mut self, keyword: impl Into<String>, factory: F)
    where
        F: Fn(&str, &ErrorParams, &SchemaNode) -> String + Send + Sync + 'static,
    {
        self.keywords.insert(keyword.into(), Arc::new(factory));
    }

    /// Overlay another catalog: its static messages and keyword factories
    /// replace ours, keyword factories it lacks are kept.
    pub fn overlay(&mut self, other: MessageCatalog) {
        self.fallback = other.fallback;
        self.root_required = other.root_required;
        self.keywords.extend(other.keywords);
    }

    /// Render the message for the first failure of a validation.
    ///
    /// Records outside the wrapped value (the root itself missing) map to the
    /// static messages. Otherwise a custom `errorMessage` on the failing node
    /// wins, then the keyword factory, then the fallback.
    pub fn format(&self, record: Option<&ErrorRecord>) -> String {
        let Some(record) = record else {
            return self.fallback.clone();
        };
        let Some(path) = record.path.strip_prefix(ROOT_KEY) else {
            if record.keyword == "required" {
                return self.root_required.clone();
            }
            return self.fallback.clone();
        };

        if let Some(message) = record
            .schema
            .error_message
            .as_ref()
            .and_then(|message| message.resolve(&record.keyword))
        {
            return message.to_string();
        }

        match self.keywords.get(&record.keyword) {
            Some(factory) => {
                let generated = factory(&path.to_string(), &record.params, &record.schema);
                if generated.is_empty() {
                    self.fallback.clone()
                } else {
                    generated
                }
            }
            None => self.fallback.clone(),
        }
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for MessageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keywords: Vec<&str> = self.keywords.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        f.debug_struct("MessageCatalog")
            .field("fallback", &self.fallback)
            .field("root_required", &self.root_required)
            .field("keywords", &keywords)
            .finish()
    }
}

static DEFAULT_CATALOG: Lazy<RwLock<Arc<MessageCatalog>>> =
    Lazy::new(|| RwLock::new(Arc::new(MessageCatalog::english())));

/// A snapshot of the process-wide catalog.
pub fn default_catalog() -> Arc<MessageCatalog> {
    DEFAULT_CATALOG.read().clone()
}

/// Switch the process-wide catalog to a built-in locale.
///
/// Keyword factories installed with [`set_keyword_message`] for keywords the
/// locale does not cover survive the switch.
pub fn set_locale(code: &str) -> ShapeResult<()> {
    let locale = MessageCatalog::for_locale(code)?;
    let mut guard = DEFAULT_CATALOG.write();
    Arc::make_mut(&mut guard).overlay(locale);
    log::debug!("Switched message locale to {}", code);
    Ok(())
}

/// Override `fallback` or `rootRequired` in the process-wide catalog.
pub fn set_static_message(key: &str, message: impl Into<String>) -> ShapeResult<()> {
    let mut guard = DEFAULT_CATALOG.write();
    Arc::make_mut(&mut guard).set_static(key, message)
}

/// Override the factory for `keyword` in the process-wide catalog.
pub fn set_keyword_message<F>(keyword: impl Into<String>, factory: F)
where
    F: Fn(&str, &ErrorParams, &SchemaNode) -> String + Send + Sync + 'static,
{
    let mut guard = DEFAULT_CATALOG.write();
    Arc::make_mut(&mut guard).set_keyword(keyword, factory);
}

/// The name a message uses for the failing value: its title, its path, or
/// `value` at the root.
pub fn subject(path: &str, schema: &SchemaNode) -> String {
    match &schema.title {
        Some(title) => title.clone(),
        None if path.is_empty() => ROOT_KEY.to_string(),
        None => path.to_string(),
    }
}

/// The name of the property `key` of the object at `path`: the property's
/// title when it has one, else its full path.
pub fn property_name(path: &str, key: &str, schema: &SchemaNode) -> String {
    let titled = schema
        .properties
        .as_ref()
        .and_then(|properties| properties.get(key))
        .and_then(|property| property.title.clone());
    titled.unwrap_or_else(|| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    })
}

/// Render a literal the way messages quote it: strings bare, everything
/// else as JSON.
pub fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replace `${name}` in a hook message.
pub fn substitute_name(message: &str, name: &str) -> String {
    message.replace("${name}", name)
}
