//! Custom keywords executed by the evaluator.
//!
//! Coercion, string transforms, user hooks and null stripping all speak the
//! same narrow protocol: given the current value, produce an outcome the
//! evaluator applies to the slot the value lives in. Keeping the protocol
//! this small keeps the keyword semantics independent of how the evaluator
//! walks the schema graph.
//!
//! # Key Types
//!
//! - [`Keyword`] - the protocol every custom keyword implements
//! - [`KeywordOutcome`] - what a keyword asks the evaluator to do
//! - [`StripNull`] - turns an explicit `null` into an absent value

pub mod cast;
pub mod hooks;

use crate::engine::{DataPath, ErrorParams};
use crate::schema::{SchemaNode, StringTransform};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

/// Result of running a keyword against a present value.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOutcome {
    /// Keep the value as it is
    Unchanged,
    /// Write this value back into the parent container
    Replace(Value),
    /// Remove the value from the parent container
    Remove,
    /// Reject the value
    Invalid(ErrorParams),
}

/// Where a keyword is running.
#[derive(Debug, Clone, Copy)]
pub struct KeywordContext<'a> {
    pub path: &'a DataPath,
}

/// A keyword the evaluator runs before the structural checks of a node.
pub trait Keyword: Send + Sync {
    /// Keyword name reported in error records
    fn name(&self) -> &'static str;

    /// Whether running the keyword may suspend
    fn is_async(&self) -> bool {
        false
    }

    /// Run the keyword. Synchronous keywords return an already completed future.
    fn run<'a>(
        &'a self,
        value: &'a Value,
        ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome>;
}

/// Converts an explicit `null` into absence. Always satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripNull;

impl Keyword for StripNull {
    fn name(&self) -> &'static str {
        "stripNull"
    }

    fn run<'a>(
        &'a self,
        value: &'a Value,
        _ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome> {
        let outcome = if value.is_null() {
            KeywordOutcome::Remove
        } else {
            KeywordOutcome::Unchanged
        };
        future::ready(outcome).boxed()
    }
}

impl StringTransform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Trim => text.trim().to_string(),
            Self::ToLowerCase => text.to_lowercase(),
            Self::ToUpperCase => text.to_uppercase(),
        }
    }
}

impl Keyword for StringTransform {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn run<'a>(
        &'a self,
        value: &'a Value,
        _ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome> {
        let outcome = match value {
            Value::String(text) => {
                let next = self.apply(text);
                if next == *text {
                    KeywordOutcome::Unchanged
                } else {
                    KeywordOutcome::Replace(Value::String(next))
                }
            }
            _ => KeywordOutcome::Unchanged,
        };
        future::ready(outcome).boxed()
    }
}

/// The modifying keywords of a node, in execution order: `cast`, `transform`,
/// `customSync`, `customAsync`.
pub fn modifiers(node: &SchemaNode) -> Vec<&dyn Keyword> {
    let mut keywords: Vec<&dyn Keyword> = Vec::new();
    if let Some(cast) = &node.cast {
        keywords.push(cast);
    }
    keywords.extend(node.transform.iter().map(|t| t as &dyn Keyword));
    if let Some(hook) = &node.custom_sync {
        keywords.push(hook);
    }
    if let Some(hook) = &node.custom_async {
        keywords.push(hook);
    }
    keywords
}
