//! Simplification of three-phase schemas into evaluable graphs.
//!
//! Builders keep pre- and post-processing steps apart from the main node so
//! that `before`/`after` ordering can be manipulated freely. The evaluator
//! only understands plain [`SchemaNode`] graphs; this module collapses the
//! phases into an `allOf` conjunction, or into the main node alone when no
//! steps exist, and injects the implicit `cast` keyword at every level.

use super::types::{CastKind, ErrorMessage, Kind, SchemaNode, SchemaType, ThreePhaseSchema};
use serde_json::Value;

/// The shape of a three-phase schema after its steps have been simplified.
#[derive(Debug, Clone, PartialEq)]
pub enum Simplified {
    /// No steps: the main node stands alone
    Bare(SchemaNode),
    /// Only pre-processing steps
    PrefixOnly {
        before: Vec<SchemaNode>,
        main: SchemaNode,
    },
    /// Only post-processing steps
    SuffixOnly {
        main: SchemaNode,
        after: Vec<SchemaNode>,
    },
    Full {
        before: Vec<SchemaNode>,
        main: SchemaNode,
        after: Vec<SchemaNode>,
    },
}

impl Simplified {
    /// Produce the evaluable node.
    ///
    /// `default` and `strip_null` belong to the three-phase envelope. On a
    /// bare node they are merged into it; otherwise they sit on the `allOf`
    /// wrapper, which also carries the main title so that parent messages
    /// can name the property.
    pub fn into_node(self, default: Option<Value>, strip_null: bool) -> SchemaNode {
        let (before, main, after) = match self {
            Self::Bare(mut main) => {
                if default.is_some() {
                    main.default = default;
                }
                main.strip_null |= strip_null;
                return main;
            }
            Self::PrefixOnly { before, main } => (before, main, Vec::new()),
            Self::SuffixOnly { main, after } => (Vec::new(), main, after),
            Self::Full { before, main, after } => (before, main, after),
        };

        let title = main.title.clone();
        let mut all_of = before;
        all_of.push(main);
        all_of.extend(after);
        SchemaNode {
            all_of: Some(all_of),
            default,
            strip_null,
            title,
            ..SchemaNode::default()
        }
    }
}

/// Simplify the phases of `schema`.
pub fn simplify(schema: &ThreePhaseSchema) -> Simplified {
    let main = simplify_node(&schema.main);
    let before: Vec<SchemaNode> = schema.before.iter().map(simplify_node).collect();
    let after: Vec<SchemaNode> = schema.after.iter().map(simplify_node).collect();

    match (before.is_empty(), after.is_empty()) {
        (true, true) => Simplified::Bare(main),
        (false, true) => Simplified::PrefixOnly { before, main },
        (true, false) => Simplified::SuffixOnly { main, after },
        (false, false) => Simplified::Full { before, main, after },
    }
}

/// Simplify `schema` all the way down to a single node.
pub fn simplify_schema(schema: &ThreePhaseSchema) -> SchemaNode {
    simplify(schema).into_node(schema.default.clone(), schema.strip_null)
}

/// Simplify every nested child (post-order) and attach the implicit cast.
///
/// Applying this twice yields the same graph as applying it once.
pub fn simplify_node(node: &SchemaNode) -> SchemaNode {
    let mut node = node.clone();
    simplify_in_place(&mut node);
    node
}

fn simplify_in_place(node: &mut SchemaNode) {
    for child in node.children_mut() {
        simplify_in_place(child);
    }
    if node.cast.is_none() {
        node.cast = implicit_cast(node);
    }
}

fn implicit_cast(node: &SchemaNode) -> Option<CastKind> {
    match (node.schema_type, node.kind) {
        (_, Some(Kind::Date)) => Some(CastKind::Date),
        (Some(SchemaType::Number), _) => Some(CastKind::Number),
        (Some(SchemaType::Integer), _) => Some(CastKind::Integer),
        (Some(SchemaType::Boolean), _) => Some(CastKind::Boolean),
        _ => None,
    }
}

/// Whether evaluating `node` may have to await a `customAsync` hook.
pub fn requires_async(node: &SchemaNode) -> bool {
    node.custom_async.is_some() || node.children().into_iter().any(requires_async)
}

/// Give every nested child without its own fallback the message `message`.
///
/// A child that already defines a fallback keeps it, and so does its subtree.
pub fn overwrite_children_error_message(node: &mut SchemaNode, message: &str) {
    for child in node.children_mut() {
        let updated = match &mut child.error_message {
            Some(ErrorMessage::Keywords(map)) if !map.contains_key(ErrorMessage::FALLBACK_KEY) => {
                map.insert(ErrorMessage::FALLBACK_KEY.to_string(), message.to_string());
                true
            }
            None => {
                child.error_message = Some(ErrorMessage::Text(message.to_string()));
                true
            }
            _ => false,
        };
        if updated {
            overwrite_children_error_message(child, message);
        }
    }
}
