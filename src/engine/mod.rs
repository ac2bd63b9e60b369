//! Schema evaluation engine.
//!
//! Compiles simplified schema graphs into [`Validator`]s and evaluates data
//! against them, rewriting the data in place as modifying keywords run.
//!
//! # Key Types
//!
//! - [`Validator`] - a compiled schema graph
//! - [`ErrorRecord`] - the structured description of the first failure
//! - [`DataPath`] - location of a value inside the validated document

pub mod format;
pub mod record;
mod validator;

pub use record::{DataPath, ErrorParams, ErrorRecord, PathSegment};
pub use validator::{EvalResult, Validator, json_equal};
