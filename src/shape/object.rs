use super::{BaseShape, Shape, shape_kind};
use crate::schema::{Additional, Properties, SchemaNode, SchemaType};

shape_kind!(
    /// A shape for objects with known properties.
    ObjectShape
);

impl ObjectShape {
    /// Keep properties that are not declared instead of removing them.
    pub fn keep_unknown(&self, keep: bool) -> Self {
        self.produce(|schema| schema.main.additional_properties = Some(Additional::Allowed(keep)))
    }
}

/// Objects with the given properties, in declaration order.
///
/// A property is required unless its shape is optional. Undeclared
/// properties are removed during validation.
pub fn object<K>(properties: impl IntoIterator<Item = (K, Shape)>) -> ObjectShape
where
    K: Into<String>,
{
    let mut declared = Properties::new();
    let mut required = Vec::new();
    for (key, shape) in properties {
        let key = key.into();
        if !shape.is_optional() {
            required.push(key.clone());
        }
        declared.insert(key, shape.simplified());
    }
    ObjectShape(Shape::from_node(SchemaNode {
        properties: Some(declared),
        required,
        additional_properties: Some(Additional::Allowed(false)),
        ..SchemaNode::typed(SchemaType::Object)
    }))
}

/// Combine the properties of two object shapes; `extra` wins on conflicts.
///
/// Only properties, required keys and the unknown-property policy carry
/// over. Steps, defaults, messages and annotations of both operands are
/// dropped.
pub fn merge(base: &ObjectShape, extra: &ObjectShape) -> ObjectShape {
    let base = &base.0.schema().main;
    let extra = &extra.0.schema().main;

    let mut properties = base.properties.clone().unwrap_or_default();
    if let Some(overrides) = &extra.properties {
        for (key, node) in overrides.iter() {
            properties.insert(key, node.clone());
        }
    }

    let redefined = |key: &str| {
        extra
            .properties
            .as_ref()
            .is_some_and(|overrides| overrides.contains_key(key))
    };
    let mut required: Vec<String> = base
        .required
        .iter()
        .filter(|key| !redefined(key.as_str()))
        .cloned()
        .collect();
    required.extend(extra.required.iter().cloned());

    let additional_properties = match &base.additional_properties {
        Some(Additional::Allowed(true)) | Some(Additional::Schema(_)) => {
            base.additional_properties.clone()
        }
        _ => extra.additional_properties.clone(),
    };

    ObjectShape(Shape::from_node(SchemaNode {
        properties: Some(properties),
        required,
        additional_properties,
        ..SchemaNode::typed(SchemaType::Object)
    }))
}
