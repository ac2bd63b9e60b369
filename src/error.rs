//! Error types for shape construction and validation.
//!
//! Two families of failure exist and they never mix:
//!
//! - [`ValidationError`] - the input does not fit the shape. Carries one
//!   human-readable, localized message built from the first failing record.
//! - Usage errors ([`ShapeError`] variants other than `Validation`) - the
//!   program asked for something impossible, such as running an
//!   asynchronous shape synchronously. These are never localized.

use crate::engine::ErrorRecord;
use std::fmt;

/// Main error type for shape operations.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// The validated value does not conform to the shape
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A shape containing asynchronous hooks was validated synchronously
    #[error("Async validation is not supported, use validate_async instead")]
    AsyncRequired,

    /// Evaluation suspended although no asynchronous hook was expected
    #[error("Validation did not complete synchronously")]
    Incomplete,

    /// Unknown locale code passed to `set_locale`
    #[error("Invalid locale: {code}")]
    InvalidLocale { code: String },

    /// Unknown key passed to `set_static_message`
    #[error("Invalid static message key: {key}")]
    InvalidStaticMessageKey { key: String },

    /// A `pattern` or `patternProperties` expression failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// The input value failed validation.
///
/// Only the first failure is surfaced; its message has already been resolved
/// against the active message catalog when the error is constructed.
#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
    record: Option<Box<ErrorRecord>>,
}

impl ValidationError {
    pub(crate) fn new(message: impl Into<String>, record: Option<ErrorRecord>) -> Self {
        Self {
            message: message.into(),
            record: record.map(Box::new),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The structured record the message was produced from, if any.
    pub fn record(&self) -> Option<&ErrorRecord> {
        self.record.as_deref()
    }

    /// Name of the keyword that failed, if known.
    pub fn keyword(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.keyword.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failure raised by a user hook (`before_sync`, `after_async`, ...).
///
/// The message may contain `${name}`, which is replaced with the title of the
/// failing shape or, lacking one, its data path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
}

impl HookError {
    /// Create a hook failure with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

// Convenience methods for creating common errors
impl ShapeError {
    /// Create an invalid locale error
    pub fn invalid_locale(code: impl Into<String>) -> Self {
        Self::InvalidLocale { code: code.into() }
    }

    /// Create an invalid static message key error
    pub fn invalid_static_key(key: impl Into<String>) -> Self {
        Self::InvalidStaticMessageKey { key: key.into() }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is a data validation failure rather than a usage error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

// Result type aliases for convenience
pub type ShapeResult<T> = Result<T, ShapeError>;
pub type HookResult<T> = Result<T, HookError>;
