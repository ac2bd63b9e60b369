//! Schema graphs and their simplification.
//!
//! This module defines the constraint vocabulary shared by the builder, the
//! transform and the evaluator, plus the transform that turns a builder's
//! three-phase representation into a single evaluable graph.
//!
//! # Key Types
//!
//! - [`SchemaNode`] - one node of the constraint graph
//! - [`ThreePhaseSchema`] - a main node with ordered pre- and post-processing steps
//! - [`Simplified`] - the collapsed form of a three-phase schema
//!
//! # Examples
//!
//! ```rust
//! use json_shape::schema::{SchemaNode, SchemaType, ThreePhaseSchema, transform};
//!
//! let schema = ThreePhaseSchema::new(SchemaNode::typed(SchemaType::Integer));
//! let node = transform::simplify_schema(&schema);
//! assert!(node.cast.is_some());
//! assert!(node.all_of.is_none());
//! ```

pub mod transform;
pub mod types;


pub use transform::{Simplified, requires_async, simplify, simplify_node, simplify_schema};
pub use types::{
    Additional, AsyncHook, CastKind, Dependency, ErrorMessage, Example, Items, Kind, Properties,
    SchemaNode, SchemaType, ShapeOptions, StringFormat, StringTransform, SyncHook,
    ThreePhaseSchema,
};
