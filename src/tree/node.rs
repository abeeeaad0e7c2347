use crate::tree::position::Attributes;
use serde::{Deserialize, Serialize};

static NO_ATTRIBUTES: Attributes = Attributes::new();

/// A node of the generic tree.
///
/// Built once by the converter and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericNode {
    tag: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    slots: Vec<Slot>,
}

impl GenericNode {
    pub fn new(tag: impl Into<String>, attributes: Attributes, slots: Vec<Slot>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            slots,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// First slot with the given field name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Direct child nodes across all slots, in slot order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &GenericNode> {
        self.slots.iter().flat_map(|slot| slot.nodes())
    }

    /// This node and every node below it, in pre-order.
    pub fn descendants(&self) -> Vec<&GenericNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Borrowed view used by queries.
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        NodeRef::Node(self)
    }
}

/// A named field slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    name: String,
    content: SlotContent,
}

/// What a slot holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotContent {
    Node(Box<GenericNode>),
    Nodes(Vec<GenericNode>),
    Leaf(Leaf),
}

/// A stringified scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    #[serde(rename = "type")]
    pub type_name: String,
    pub text: String,
}

impl Slot {
    pub fn new(name: impl Into<String>, content: SlotContent) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    /// Nodes held by this slot; empty for leaves.
    pub fn nodes(&self) -> &[GenericNode] {
        match &self.content {
            SlotContent::Node(node) => std::slice::from_ref(node.as_ref()),
            SlotContent::Nodes(nodes) => nodes,
            SlotContent::Leaf(_) => &[],
        }
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        match &self.content {
            SlotContent::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Number of child nodes, or `None` for a leaf.
    pub fn arity(&self) -> Option<usize> {
        match &self.content {
            SlotContent::Leaf(_) => None,
            _ => Some(self.nodes().len()),
        }
    }
}

/// A borrowed reference to an element of the generic tree.
///
/// Path queries address slots as well as nodes (a slot is an element named
/// after its field), so a match is either.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'t> {
    Node(&'t GenericNode),
    Slot(&'t Slot),
}

impl<'t> NodeRef<'t> {
    /// Node tag, or the field name of a slot.
    pub fn tag(&self) -> &'t str {
        match self {
            NodeRef::Node(node) => node.tag(),
            NodeRef::Slot(slot) => slot.name(),
        }
    }

    /// Position attributes. Slots never carry any.
    pub fn attributes(&self) -> &'t Attributes {
        match self {
            NodeRef::Node(node) => node.attributes(),
            NodeRef::Slot(_) => &NO_ATTRIBUTES,
        }
    }

    /// Attribute by name: position attributes on nodes, `type` on leaves.
    pub fn attribute(&self, name: &str) -> Option<&'t str> {
        match self {
            NodeRef::Node(node) => node.attributes().get_by_name(name),
            NodeRef::Slot(slot) => match (name, slot.leaf()) {
                ("type", Some(leaf)) => Some(leaf.type_name.as_str()),
                _ => None,
            },
        }
    }

    /// Every attribute as `(name, value)`.
    pub fn attribute_pairs(&self) -> Vec<(&'static str, &'t str)> {
        match self {
            NodeRef::Node(node) => node
                .attributes()
                .iter()
                .map(|(attr, value)| (attr.name(), value))
                .collect(),
            NodeRef::Slot(slot) => slot
                .leaf()
                .map(|leaf| vec![("type", leaf.type_name.as_str())])
                .unwrap_or_default(),
        }
    }

    pub fn as_node(&self) -> Option<&'t GenericNode> {
        match self {
            NodeRef::Node(node) => Some(node),
            NodeRef::Slot(_) => None,
        }
    }

    pub fn as_slot(&self) -> Option<&'t Slot> {
        match self {
            NodeRef::Slot(slot) => Some(slot),
            NodeRef::Node(_) => None,
        }
    }

    /// Child elements: a node's slots, or a slot's nodes.
    pub fn children(&self) -> Vec<NodeRef<'t>> {
        match self {
            NodeRef::Node(node) => node.slots().iter().map(NodeRef::Slot).collect(),
            NodeRef::Slot(slot) => slot.nodes().iter().map(NodeRef::Node).collect(),
        }
    }

    /// Concatenated text of every leaf at or below this element.
    pub fn string_value(&self) -> String {
        let mut out = String::new();
        collect_text(*self, &mut out);
        out
    }

    /// Identity key: element class plus address.
    pub(crate) fn key(&self) -> (bool, usize) {
        match self {
            NodeRef::Node(node) => (false, *node as *const GenericNode as usize),
            NodeRef::Slot(slot) => (true, *slot as *const Slot as usize),
        }
    }
}

fn collect_text(element: NodeRef<'_>, out: &mut String) {
    if let NodeRef::Slot(slot) = element {
        if let Some(leaf) = slot.leaf() {
            out.push_str(&leaf.text);
            return;
        }
    }
    for child in element.children() {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::position::PositionAttribute;

    fn leaf(name: &str, type_name: &str, text: &str) -> Slot {
        Slot::new(
            name,
            SlotContent::Leaf(Leaf {
                type_name: type_name.to_string(),
                text: text.to_string(),
            }),
        )
    }

    fn located(line: usize) -> Attributes {
        [
            (PositionAttribute::StartLine, line.to_string()),
            (PositionAttribute::EndLine, line.to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn sample() -> GenericNode {
        let name = GenericNode::new("identifier", located(1), vec![leaf("value", "str", "f")]);
        let ret = GenericNode::new("return_statement", located(2), vec![]);
        GenericNode::new(
            "function_definition",
            located(1),
            vec![
                Slot::new("name", SlotContent::Node(Box::new(name))),
                Slot::new("body", SlotContent::Nodes(vec![ret])),
                Slot::new("decorators", SlotContent::Nodes(vec![])),
            ],
        )
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = sample();
        let tags: Vec<_> = tree.descendants().iter().map(|n| n.tag()).collect();
        assert_eq!(
            tags,
            vec!["function_definition", "identifier", "return_statement"]
        );
    }

    #[test]
    fn slot_arity() {
        let tree = sample();
        assert_eq!(tree.slot("name").and_then(Slot::arity), Some(1));
        assert_eq!(tree.slot("decorators").and_then(Slot::arity), Some(0));
        let ident = tree.child_nodes().next().unwrap();
        assert_eq!(ident.slot("value").and_then(Slot::arity), None);
        assert!(tree.slot("missing").is_none());
    }

    #[test]
    fn string_value_concatenates_leaves() {
        let tree = sample();
        assert_eq!(tree.as_node_ref().string_value(), "f");
        let name = NodeRef::Slot(tree.slot("name").unwrap());
        assert_eq!(name.string_value(), "f");
    }

    #[test]
    fn slot_refs_have_no_position() {
        let tree = sample();
        let slot = NodeRef::Slot(tree.slot("body").unwrap());
        assert!(slot.attributes().is_empty());
        assert_eq!(slot.tag(), "body");
        assert_eq!(tree.as_node_ref().attribute("start_line"), Some("1"));
    }

    #[test]
    fn leaf_exposes_type_attribute() {
        let tree = sample();
        let ident = tree.child_nodes().next().unwrap();
        let value = NodeRef::Slot(ident.slot("value").unwrap());
        assert_eq!(value.attribute("type"), Some("str"));
        assert_eq!(value.attribute_pairs(), vec![("type", "str")]);
    }

    #[test]
    fn json_round_trip_preserves_shape() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: GenericNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert!(json.contains("\"start_line\":\"1\""));
    }
}
