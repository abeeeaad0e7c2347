//! Projection of a typed parse tree into a [`GenericNode`].

use crate::tree::node::{GenericNode, Leaf, Slot, SlotContent};
use crate::tree::position::{position_attributes, PositionAttribute};
use crate::typed::{Element, FieldValue, Scalar, TypedNode};

/// Convert `node` and its whole subtree.
///
/// Total over any typed tree. Sequence fields holding anything other than
/// nodes are dropped; empty sequences are kept as empty slots.
pub fn convert<N: TypedNode>(node: &N) -> GenericNode {
    let attributes = position_attributes(node);
    let mut slots = Vec::new();

    for field in node.fields() {
        if is_reserved(field.name) {
            continue;
        }

        match field.value {
            FieldValue::Node(child) => {
                slots.push(Slot::new(
                    field.name,
                    SlotContent::Node(Box::new(convert(&child))),
                ));
            }
            FieldValue::Sequence(elements) => match only_nodes(elements) {
                Some(children) => {
                    let converted = children.iter().map(convert).collect();
                    slots.push(Slot::new(field.name, SlotContent::Nodes(converted)));
                }
                None => {
                    tracing::trace!(
                        kind = node.kind(),
                        field = field.name,
                        "dropping sequence field with non-node elements"
                    );
                }
            },
            FieldValue::Scalar(scalar) => {
                slots.push(Slot::new(field.name, SlotContent::Leaf(leaf(&scalar))));
            }
        }
    }

    GenericNode::new(node.kind(), attributes, slots)
}

fn leaf(scalar: &Scalar) -> Leaf {
    Leaf {
        type_name: scalar.type_name().to_string(),
        text: scalar.to_string(),
    }
}

// Private fields and the position fields already turned into attributes.
fn is_reserved(name: &str) -> bool {
    name.starts_with('_') || PositionAttribute::from_name(name).is_some()
}

fn only_nodes<N>(elements: Vec<Element<N>>) -> Option<Vec<N>> {
    elements
        .into_iter()
        .map(|element| match element {
            Element::Node(node) => Some(node),
            Element::Scalar(_) => None,
        })
        .collect()
}
