//! Position metadata extraction.

use crate::typed::TypedNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of position attributes a generic node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionAttribute {
    StartLine,
    StartColumn,
    EndLine,
    EndColumn,
}

impl PositionAttribute {
    pub const ALL: [PositionAttribute; 4] = [
        PositionAttribute::StartLine,
        PositionAttribute::StartColumn,
        PositionAttribute::EndLine,
        PositionAttribute::EndColumn,
    ];

    /// Attribute name as it appears in queries and serialized trees.
    pub fn name(self) -> &'static str {
        match self {
            PositionAttribute::StartLine => "start_line",
            PositionAttribute::StartColumn => "start_column",
            PositionAttribute::EndLine => "end_line",
            PositionAttribute::EndColumn => "end_column",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

/// String-valued position attributes of a generic node.
///
/// A missing key means the originating node did not have that field, which
/// is not the same thing as an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<PositionAttribute, String>);

impl Attributes {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, attr: PositionAttribute) -> Option<&str> {
        self.0.get(&attr).map(String::as_str)
    }

    /// Look up by attribute name (`start_line`, ...).
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        PositionAttribute::from_name(name).and_then(|attr| self.get(attr))
    }

    /// Parse a numeric attribute. Values we did not write ourselves may fail
    /// to parse; those read as absent.
    pub fn number(&self, attr: PositionAttribute) -> Option<usize> {
        self.get(attr)?.parse().ok()
    }

    pub fn start_line(&self) -> Option<usize> {
        self.number(PositionAttribute::StartLine)
    }

    pub fn end_line(&self) -> Option<usize> {
        self.number(PositionAttribute::EndLine)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PositionAttribute, &str)> {
        self.0.iter().map(|(attr, value)| (*attr, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PositionAttribute, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (PositionAttribute, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read the position fields a typed node actually has.
pub fn position_attributes<N: TypedNode>(node: &N) -> Attributes {
    let pos = node.position();
    [
        (PositionAttribute::StartLine, pos.start_line),
        (PositionAttribute::StartColumn, pos.start_column),
        (PositionAttribute::EndLine, pos.end_line),
        (PositionAttribute::EndColumn, pos.end_column),
    ]
    .into_iter()
    .filter_map(|(attr, value)| value.map(|v| (attr, v.to_string())))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::{Field, Position};

    struct Marker(Position);

    impl TypedNode for Marker {
        fn kind(&self) -> &str {
            "Marker"
        }

        fn position(&self) -> Position {
            self.0
        }

        fn fields(&self) -> Vec<Field<Self>> {
            Vec::new()
        }
    }

    #[test]
    fn located_node_has_all_four() {
        let attrs = position_attributes(&Marker(Position::new(3, 4, 5, 10)));
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get(PositionAttribute::StartLine), Some("3"));
        assert_eq!(attrs.get(PositionAttribute::StartColumn), Some("4"));
        assert_eq!(attrs.get_by_name("end_line"), Some("5"));
        assert_eq!(attrs.get_by_name("end_column"), Some("10"));
    }

    #[test]
    fn missing_fields_are_omitted() {
        let pos = Position {
            start_line: Some(7),
            ..Position::default()
        };
        let attrs = position_attributes(&Marker(pos));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.start_line(), Some(7));
        assert_eq!(attrs.get(PositionAttribute::EndLine), None);
    }

    #[test]
    fn unlocated_node_has_no_attributes() {
        let attrs = position_attributes(&Marker(Position::unlocated()));
        assert!(attrs.is_empty());
        assert_eq!(attrs.start_line(), None);
    }

    #[test]
    fn attribute_names_round_trip() {
        for attr in PositionAttribute::ALL {
            assert_eq!(PositionAttribute::from_name(attr.name()), Some(attr));
        }
        assert_eq!(PositionAttribute::from_name("lineno"), None);
    }
}
