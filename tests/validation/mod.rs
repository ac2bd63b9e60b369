//! Validation tests module.
//!
//! Behaviour of each shape kind against accepted, coerced and rejected
//! inputs, grouped by category.

pub mod combinators;
pub mod primitives;
pub mod structures;
