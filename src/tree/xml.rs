//! XML rendering of the generic tree.
//!
//! Nodes become elements named by tag with their position attributes, slots
//! become elements named by field, and leaves carry a `type` attribute and
//! their text. This is the shape path queries are written against.

use crate::tree::node::{GenericNode, Slot, SlotContent};
use std::fmt::Write;

const INDENT: &str = "  ";

impl GenericNode {
    /// Render the subtree as indented XML.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self, 0);
        out
    }
}

fn write_node(out: &mut String, node: &GenericNode, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(node.tag());
    for (attr, value) in node.attributes().iter() {
        let _ = write!(out, " {}=\"{}\"", attr.name(), escape(value));
    }

    if node.slots().is_empty() {
        out.push_str("/>\n");
        return;
    }

    out.push_str(">\n");
    for slot in node.slots() {
        write_slot(out, slot, depth + 1);
    }
    indent(out, depth);
    let _ = writeln!(out, "</{}>", node.tag());
}

fn write_slot(out: &mut String, slot: &Slot, depth: usize) {
    indent(out, depth);
    match slot.content() {
        SlotContent::Leaf(leaf) => {
            let _ = writeln!(
                out,
                "<{name} type=\"{ty}\">{text}</{name}>",
                name = slot.name(),
                ty = escape(&leaf.type_name),
                text = escape(&leaf.text)
            );
        }
        _ if slot.nodes().is_empty() => {
            let _ = writeln!(out, "<{}/>", slot.name());
        }
        _ => {
            let _ = writeln!(out, "<{}>", slot.name());
            for child in slot.nodes() {
                write_node(out, child, depth + 1);
            }
            indent(out, depth);
            let _ = writeln!(out, "</{}>", slot.name());
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
