//! Path query evaluation over the element view of a generic tree.

use crate::query::path::{Axis, LocationPath, Operand, Predicate, Step};
use crate::tree::{GenericNode, NodeRef};
use std::collections::HashMap;

type Key = (bool, usize);

/// An evaluation item: the virtual document above the root, or an element.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Item<'t> {
    Document,
    Element(NodeRef<'t>),
}

/// Document order and parent links for one tree, built per evaluation.
pub(crate) struct Document<'t> {
    root: &'t GenericNode,
    order: HashMap<Key, usize>,
    parents: HashMap<Key, Item<'t>>,
}

impl<'t> Document<'t> {
    pub fn new(root: &'t GenericNode) -> Self {
        let mut order = HashMap::new();
        let mut parents = HashMap::new();
        let mut stack = vec![(NodeRef::Node(root), Item::Document)];

        while let Some((element, parent)) = stack.pop() {
            order.insert(element.key(), order.len() + 1);
            parents.insert(element.key(), parent);
            let children = element.children();
            stack.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|child| (child, Item::Element(element))),
            );
        }

        Self {
            root,
            order,
            parents,
        }
    }

    pub fn eval_path(&self, path: &LocationPath, context: Item<'t>) -> Vec<Item<'t>> {
        let start = if path.absolute {
            Item::Document
        } else {
            context
        };

        let mut current = vec![start];
        for step in &path.steps {
            current = self.apply_step(&current, step);
        }
        current
    }

    /// Sort into document order and drop duplicates.
    pub fn sort_unique(&self, items: &mut Vec<Item<'t>>) {
        items.sort_by_key(|item| self.position(*item));
        items.dedup_by_key(|item| self.position(*item));
    }

    fn apply_step(&self, contexts: &[Item<'t>], step: &Step) -> Vec<Item<'t>> {
        let mut out = Vec::new();
        for context in contexts {
            match step.axis {
                Axis::SelfNode => out.push(*context),
                Axis::Parent => out.extend(self.parent(*context)),
                Axis::Child => out.extend(self.matching_children(*context, step)),
                Axis::Descendant => {
                    for item in self.descendants_or_self(*context) {
                        out.extend(self.matching_children(item, step));
                    }
                }
            }
        }
        self.sort_unique(&mut out);
        out
    }

    // Positional predicates count among the children of one parent.
    fn matching_children(&self, context: Item<'t>, step: &Step) -> Vec<Item<'t>> {
        let mut items: Vec<Item<'t>> = self
            .children(context)
            .into_iter()
            .filter(|child| step.test.matches(child.tag()))
            .map(Item::Element)
            .collect();

        for predicate in &step.predicates {
            let size = items.len();
            items = items
                .into_iter()
                .enumerate()
                .filter(|(index, item)| self.holds(predicate, *item, index + 1, size))
                .map(|(_, item)| item)
                .collect();
        }
        items
    }

    fn holds(&self, predicate: &Predicate, item: Item<'t>, position: usize, size: usize) -> bool {
        match predicate {
            Predicate::Position(n) => position == *n,
            Predicate::Last => position == size,
            Predicate::Exists(operand) => !self.operand_values(operand, item).is_empty(),
            Predicate::Compare {
                operand,
                negate,
                literal,
            } => self
                .operand_values(operand, item)
                .iter()
                .any(|value| (value == literal) != *negate),
        }
    }

    fn operand_values(&self, operand: &Operand, item: Item<'t>) -> Vec<String> {
        match operand {
            Operand::Attribute(name) => match item {
                Item::Element(element) => element
                    .attribute(name)
                    .map(str::to_string)
                    .into_iter()
                    .collect(),
                Item::Document => Vec::new(),
            },
            Operand::Path { path, attribute } => {
                let items = self.eval_path(path, item);
                match attribute {
                    Some(name) => items
                        .into_iter()
                        .filter_map(|item| match item {
                            Item::Element(element) => element.attribute(name).map(str::to_string),
                            Item::Document => None,
                        })
                        .collect(),
                    None => items.into_iter().map(|item| self.string_value(item)).collect(),
                }
            }
        }
    }

    fn children(&self, item: Item<'t>) -> Vec<NodeRef<'t>> {
        match item {
            Item::Document => vec![NodeRef::Node(self.root)],
            Item::Element(element) => element.children(),
        }
    }

    fn parent(&self, item: Item<'t>) -> Option<Item<'t>> {
        match item {
            Item::Document => None,
            Item::Element(element) => self.parents.get(&element.key()).copied(),
        }
    }

    fn descendants_or_self(&self, item: Item<'t>) -> Vec<Item<'t>> {
        let mut out = Vec::new();
        let mut stack = vec![item];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev().map(Item::Element));
        }
        out
    }

    fn position(&self, item: Item<'t>) -> usize {
        match item {
            Item::Document => 0,
            Item::Element(element) => self.order.get(&element.key()).copied().unwrap_or(usize::MAX),
        }
    }

    fn string_value(&self, item: Item<'t>) -> String {
        match item {
            Item::Document => NodeRef::Node(self.root).string_value(),
            Item::Element(element) => element.string_value(),
        }
    }
}
