use super::{BaseShape, Shape, shape_kind};
use crate::schema::{Additional, Items, SchemaNode, SchemaType};

shape_kind!(
    /// A shape for arrays whose elements share one shape.
    ArrayShape
);

shape_kind!(
    /// A shape for fixed-length arrays with one shape per position.
    TupleShape
);

impl ArrayShape {
    pub fn min_size(&self, size: usize) -> Self {
        self.produce(|schema| schema.main.min_items = Some(size))
    }

    pub fn max_size(&self, size: usize) -> Self {
        self.produce(|schema| schema.main.max_items = Some(size))
    }

    pub fn unique(&self, unique: bool) -> Self {
        self.produce(|schema| schema.main.unique_items = Some(unique))
    }
}

/// Arrays whose every element matches `item`.
pub fn array(item: impl Into<Shape>) -> ArrayShape {
    let item = item.into().simplified();
    ArrayShape(Shape::from_node(SchemaNode {
        items: Some(Items::Single(Box::new(item))),
        ..SchemaNode::typed(SchemaType::Array)
    }))
}

/// Arrays of exactly one element per shape, in order.
pub fn tuple(items: impl IntoIterator<Item = Shape>) -> TupleShape {
    let items: Vec<SchemaNode> = items.into_iter().map(|item| item.simplified()).collect();
    let count = items.len();
    TupleShape(Shape::from_node(SchemaNode {
        items: Some(Items::Tuple(items)),
        min_items: Some(count),
        max_items: Some(count),
        additional_items: Some(Additional::Allowed(false)),
        ..SchemaNode::typed(SchemaType::Array)
    }))
}
