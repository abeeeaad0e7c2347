//! The generic tree: a uniform, string-attributed projection of a typed
//! parse tree that path queries run against.

pub mod convert;
pub mod node;
pub mod position;
mod xml;

pub use convert::convert;
pub use node::{GenericNode, Leaf, NodeRef, Slot, SlotContent};
pub use position::{position_attributes, Attributes, PositionAttribute};
