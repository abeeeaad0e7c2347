//! Tree-sitter nodes seen as typed parse-tree nodes.

use crate::ts::fields::{field_table, Arity, FieldSpec, CHILDREN, VALUE};
use crate::ts::lang::SupportLang;
use crate::typed::{Element, Field, FieldValue, Position, Scalar, TypedNode};
use tree_sitter::Node;

/// A named tree-sitter node together with the source it was parsed from.
///
/// Fields are assembled from the node's children:
/// - a child with a grammar field name joins that field, as a node if it is
///   named and as a string scalar if it is an anonymous token (`operator`);
/// - named children without a field are collected under `children`;
/// - anonymous children without a field (punctuation, keywords) are dropped;
/// - a named leaf carries its text as a typed `value` scalar.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
    language: SupportLang,
}

impl<'t> SyntaxNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str, language: SupportLang) -> Self {
        Self {
            node,
            source,
            language,
        }
    }

    pub fn text(&self) -> &'t str {
        &self.source[self.node.byte_range()]
    }

    fn wrap(&self, node: Node<'t>) -> Self {
        Self::new(node, self.source, self.language)
    }

    // Children grouped by field name, in order of first appearance.
    fn groups(&self) -> Vec<(&'static str, Vec<Element<Self>>)> {
        let mut groups: Vec<(&'static str, Vec<Element<Self>>)> = Vec::new();
        let mut cursor = self.node.walk();
        if !cursor.goto_first_child() {
            return groups;
        }

        loop {
            let child = cursor.node();
            let entry = match (cursor.field_name(), child.is_named()) {
                (Some(name), true) => Some((name, Element::Node(self.wrap(child)))),
                (Some(name), false) => Some((
                    name,
                    Element::Scalar(Scalar::Str(self.wrap(child).text().to_string())),
                )),
                (None, true) => Some((CHILDREN, Element::Node(self.wrap(child)))),
                (None, false) => None,
            };

            if let Some((name, element)) = entry {
                match groups.iter_mut().find(|(existing, _)| *existing == name) {
                    Some((_, elements)) => elements.push(element),
                    None => groups.push((name, vec![element])),
                }
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }

        groups
    }
}

impl TypedNode for SyntaxNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn position(&self) -> Position {
        if self.node.is_missing() {
            return Position::unlocated();
        }
        Position::of_span(self.source, self.node.start_byte(), self.node.end_byte())
    }

    fn fields(&self) -> Vec<Field<Self>> {
        let table = field_table(self.language, self.node.kind());
        let mut fields = arrange(self.groups(), table);

        if self.node.is_named() && self.node.child_count() == 0 {
            let scalar = leaf_scalar(self.node.kind(), self.text());
            fields.push(Field::new(VALUE, FieldValue::Scalar(scalar)));
        }

        fields
    }
}

/// Apply a field table to grouped children. Listed fields come first, in
/// table order; anything the table does not mention follows in order of
/// appearance with occurrence-based arity.
fn arrange<N>(
    mut groups: Vec<(&'static str, Vec<Element<N>>)>,
    table: &[FieldSpec],
) -> Vec<Field<N>> {
    let mut fields = Vec::with_capacity(table.len() + groups.len());

    for spec in table {
        let elements = match groups.iter().position(|(name, _)| *name == spec.name) {
            Some(index) => groups.remove(index).1,
            None => Vec::new(),
        };

        let value = match spec.arity {
            Arity::Many => FieldValue::Sequence(elements),
            Arity::One | Arity::Optional if elements.is_empty() => FieldValue::Scalar(Scalar::None),
            Arity::One | Arity::Optional => by_occurrence(elements),
        };
        fields.push(Field::new(spec.name, value));
    }

    for (name, elements) in groups {
        fields.push(Field::new(name, by_occurrence(elements)));
    }

    fields
}

fn by_occurrence<N>(mut elements: Vec<Element<N>>) -> FieldValue<N> {
    if elements.len() != 1 {
        return FieldValue::Sequence(elements);
    }
    match elements.pop() {
        Some(Element::Node(node)) => FieldValue::Node(node),
        Some(Element::Scalar(scalar)) => FieldValue::Scalar(scalar),
        None => FieldValue::Sequence(Vec::new()),
    }
}

/// Typed value of a named leaf token.
fn leaf_scalar(kind: &str, text: &str) -> Scalar {
    match kind {
        "integer" | "integer_literal" | "int_literal" => {
            parse_int(text).map_or_else(|| Scalar::Str(text.to_string()), Scalar::Int)
        }
        "float" | "float_literal" => text
            .replace('_', "")
            .parse()
            .map_or_else(|_| Scalar::Str(text.to_string()), Scalar::Float),
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        "none" | "null" | "nil" => Scalar::None,
        _ => Scalar::Str(text.to_string()),
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = match lower.get(..2) {
        Some("0x") => (16, &lower[2..]),
        Some("0o") => (8, &lower[2..]),
        Some("0b") => (2, &lower[2..]),
        _ => (10, lower.as_str()),
    };
    i64::from_str_radix(body, radix).ok()
}
