use super::{BaseShape, Shape, shape_kind};
use crate::schema::{SchemaNode, SchemaType, StringFormat, StringTransform};

shape_kind!(
    /// A shape for strings.
    StringShape
);

impl StringShape {
    pub fn min_length(&self, length: usize) -> Self {
        self.produce(|schema| schema.main.min_length = Some(length))
    }

    pub fn max_length(&self, length: usize) -> Self {
        self.produce(|schema| schema.main.max_length = Some(length))
    }

    /// Require a match of `pattern` (regex crate syntax, inline flags such as
    /// `(?i)` allowed). An invalid pattern is reported on first validation.
    pub fn pattern(&self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.produce(|schema| schema.main.pattern = Some(pattern))
    }

    pub fn format(&self, format: StringFormat) -> Self {
        self.produce(|schema| schema.main.format = Some(format))
    }

    /// Trim surrounding whitespace before the string checks run.
    pub fn trim(&self) -> Self {
        self.before(SchemaNode::transform_step(StringTransform::Trim), true)
    }

    pub fn lowercase(&self) -> Self {
        self.before(SchemaNode::transform_step(StringTransform::ToLowerCase), true)
    }

    pub fn uppercase(&self) -> Self {
        self.before(SchemaNode::transform_step(StringTransform::ToUpperCase), true)
    }
}

/// Any string.
pub fn string() -> StringShape {
    StringShape(Shape::from_node(SchemaNode::typed(SchemaType::String)))
}
