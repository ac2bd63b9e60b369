//! Immutable, composable data shapes for JSON values.
//!
//! Shapes are built with fluent constructors and modifiers, compiled once on
//! first use, and validate values while coercing them: numeric strings become
//! numbers, defaults are injected, unknown object properties are dropped and
//! user hooks may rewrite values before or after the main check.
//!
//! # Core Components
//!
//! - [`Shape`] and the kind wrappers in [`shape`] - immutable shape builders
//! - [`BaseShape`] - modifiers and validation entry points shared by all kinds
//! - [`MessageCatalog`] - localized, overridable error messages
//! - [`engine::Validator`] - the compiled evaluator behind every shape
//!
//! # Quick Start
//!
//! ```rust
//! use json_shape::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let user = object([
//!     ("name", string().min_length(1).into()),
//!     ("age", integer().min(0.0, false).optional(true).into()),
//!     ("tags", array(string()).default(json!([])).into()),
//! ]);
//!
//! let value = user.validate_sync(&json!({"name": "ann", "age": "31"}))?;
//! assert_eq!(value, json!({"name": "ann", "age": 31, "tags": []}));
//!
//! let err = user.validate_sync(&json!({"name": ""})).unwrap_err();
//! assert_eq!(err.to_string(), "name should have at least 1 character");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod keyword;
pub mod messages;
pub mod schema;
pub mod shape;
pub mod validate;

// Re-export commonly used types for convenience
pub use error::{HookError, HookResult, ShapeError, ShapeResult, ValidationError};
pub use messages::{MessageCatalog, set_keyword_message, set_locale, set_static_message};
pub use schema::{SchemaNode, ThreePhaseSchema};
pub use shape::{
    ArrayShape, BaseShape, NumberShape, ObjectShape, Shape, StringShape, TupleShape,
};
pub use validate::ValidateOptions;

/// Everything needed to build and validate shapes.
pub mod prelude {
    pub use crate::error::{HookError, ShapeError, ShapeResult};
    pub use crate::schema::{Example, SchemaNode, StringFormat};
    pub use crate::shape::{
        ArrayShape, BaseShape, NumberShape, ObjectShape, Shape, StringShape, TupleShape, all_of,
        any, any_of, array, boolean, constant, custom, date, enumerate, if_else, if_then,
        if_then_else, integer, merge, not, number, object, one_of, string, tuple,
    };
    pub use crate::validate::ValidateOptions;
}
