//! Structured failure records and the data paths they point at.

use crate::schema::{Kind, SchemaNode, StringFormat};
use serde_json::Value;
use std::fmt;

/// One step of a data path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the validated document.
///
/// Renders as `a.b[0].c`; the root renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPath(Vec<PathSegment>);

impl DataPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The remainder of the path below a leading `key`, if the path starts there.
    pub fn strip_prefix(&self, key: &str) -> Option<DataPath> {
        match self.0.first() {
            Some(PathSegment::Key(first)) if first == key => Some(Self(self.0[1..].to_vec())),
            _ => None,
        }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Keyword-specific details of a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorParams {
    None,
    Type { expected: String },
    Kind { kind: Kind },
    /// Numeric bound of `minimum`, `maximum` and their exclusive forms
    Limit { limit: f64 },
    /// Count bound of length, item and property limits
    Count { limit: usize },
    MultipleOf { multiple_of: f64 },
    Required { missing: String },
    Dependencies { property: String, deps: Vec<String> },
    Enum { allowed: Vec<Value> },
    Const { allowed: Value },
    Format { format: StringFormat },
    Pattern { pattern: String },
    UniqueItems { first: usize, second: usize },
    PropertyName { name: String },
    /// Message raised by a user hook
    Custom { message: String },
}

/// A single structured validation failure.
///
/// Carries everything a message formatter needs: the failing keyword, where
/// in the data it failed, an outline of the node that owns the keyword (see
/// [`SchemaNode::outline`]) and the value.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub keyword: String,
    pub path: DataPath,
    pub params: ErrorParams,
    pub schema: SchemaNode,
    pub data: Option<Value>,
}

impl ErrorRecord {
    pub fn new(
        keyword: impl Into<String>,
        path: &DataPath,
        params: ErrorParams,
        schema: &SchemaNode,
        data: Option<&Value>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            path: path.clone(),
            params,
            schema: schema.outline(),
            data: data.cloned(),
        }
    }
}
