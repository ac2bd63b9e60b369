//! Logical combinators over shapes.

use super::Shape;
use crate::schema::SchemaNode;

fn members(shapes: impl IntoIterator<Item = Shape>) -> Vec<SchemaNode> {
    shapes.into_iter().map(|shape| shape.simplified()).collect()
}

fn boxed(shape: impl Into<Shape>) -> Option<Box<SchemaNode>> {
    Some(Box::new(shape.into().simplified()))
}

/// Values that do not match `shape`.
pub fn not(shape: impl Into<Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        not: boxed(shape),
        ..SchemaNode::default()
    })
}

/// Values matching exactly one of `shapes`. The matching branch's coercions
/// are kept.
pub fn one_of(shapes: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        one_of: Some(members(shapes)),
        ..SchemaNode::default()
    })
}

/// Values matching at least one of `shapes`. The first matching branch's
/// coercions are kept.
pub fn any_of(shapes: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        any_of: Some(members(shapes)),
        ..SchemaNode::default()
    })
}

/// Values matching every one of `shapes`, applied in order.
pub fn all_of(shapes: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        all_of: Some(members(shapes)),
        ..SchemaNode::default()
    })
}

/// Values matching `condition` must also match `pass`.
pub fn if_then(condition: impl Into<Shape>, pass: impl Into<Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        if_schema: boxed(condition),
        then_schema: boxed(pass),
        ..SchemaNode::default()
    })
}

/// Values not matching `condition` must match `fail`.
pub fn if_else(condition: impl Into<Shape>, fail: impl Into<Shape>) -> Shape {
    Shape::from_node(SchemaNode {
        if_schema: boxed(condition),
        else_schema: boxed(fail),
        ..SchemaNode::default()
    })
}

pub fn if_then_else(
    condition: impl Into<Shape>,
    pass: impl Into<Shape>,
    fail: impl Into<Shape>,
) -> Shape {
    Shape::from_node(SchemaNode {
        if_schema: boxed(condition),
        then_schema: boxed(pass),
        else_schema: boxed(fail),
        ..SchemaNode::default()
    })
}
