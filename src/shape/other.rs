//! Leaf shapes without kind-specific modifiers.

use super::Shape;
use crate::schema::{Kind, SchemaNode, SchemaType};
use serde_json::Value;

/// A shape validating against a hand-written schema node.
pub fn custom(node: SchemaNode) -> Shape {
    Shape::from_node(node)
}

/// Booleans. `"true"`, `"false"`, `"1"`, `"0"`, `1` and `0` are coerced.
pub fn boolean() -> Shape {
    Shape::from_node(SchemaNode::typed(SchemaType::Boolean))
}

/// RFC 3339 date-times, normalized to UTC with millisecond precision.
pub fn date() -> Shape {
    Shape::from_node(SchemaNode {
        kind: Some(Kind::Date),
        ..SchemaNode::default()
    })
}

/// Any present value.
pub fn any() -> Shape {
    Shape::from_node(SchemaNode::default())
}

/// One of a fixed set of values.
pub fn enumerate(values: impl IntoIterator<Item = Value>) -> Shape {
    Shape::from_node(SchemaNode {
        enum_values: Some(values.into_iter().collect()),
        ..SchemaNode::default()
    })
}

/// Exactly `value`.
pub fn constant(value: Value) -> Shape {
    Shape::from_node(SchemaNode {
        const_value: Some(value),
        ..SchemaNode::default()
    })
}
