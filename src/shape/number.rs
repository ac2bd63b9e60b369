use super::{BaseShape, Shape, shape_kind};
use crate::schema::{SchemaNode, SchemaType};

shape_kind!(
    /// A shape for numbers or integers.
    NumberShape
);

impl NumberShape {
    /// Lower bound. An exclusive bound replaces an inclusive one and vice versa.
    pub fn min(&self, value: f64, exclusive: bool) -> Self {
        self.produce(|schema| {
            let main = &mut schema.main;
            if exclusive {
                main.exclusive_minimum = Some(value);
                main.minimum = None;
            } else {
                main.minimum = Some(value);
                main.exclusive_minimum = None;
            }
        })
    }

    /// Upper bound. An exclusive bound replaces an inclusive one and vice versa.
    pub fn max(&self, value: f64, exclusive: bool) -> Self {
        self.produce(|schema| {
            let main = &mut schema.main;
            if exclusive {
                main.exclusive_maximum = Some(value);
                main.maximum = None;
            } else {
                main.maximum = Some(value);
                main.exclusive_maximum = None;
            }
        })
    }

    pub fn range(&self, min: f64, max: f64, exclusive: bool) -> Self {
        self.min(min, exclusive).max(max, exclusive)
    }

    pub fn multiple_of(&self, base: f64) -> Self {
        self.produce(|schema| schema.main.multiple_of = Some(base))
    }
}

/// Any number. Numeric strings are coerced.
pub fn number() -> NumberShape {
    NumberShape(Shape::from_node(SchemaNode::typed(SchemaType::Number)))
}

/// Whole numbers. Integer strings are coerced.
pub fn integer() -> NumberShape {
    NumberShape(Shape::from_node(SchemaNode::typed(SchemaType::Integer)))
}
