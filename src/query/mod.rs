//! Query engines selecting elements of a generic tree.
//!
//! Two engines ship with the crate: [`PathQuery`], an XPath-style path
//! language over the element view of the tree, and [`PatternQuery`], which
//! runs ast-grep patterns against the source and maps the matches back.

pub mod cache;
pub mod errors;
mod eval;
pub mod path;
pub mod pattern;

pub use errors::QueryError;
pub use path::PathQuery;
pub use pattern::PatternQuery;

use crate::tree::{GenericNode, NodeRef};
use serde::{Deserialize, Serialize};

/// Which engine a query string is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    #[default]
    Path,
    Pattern,
}

/// Anything that can select elements of a generic tree.
///
/// Results are in document (pre-order) order without duplicates.
pub trait QueryEngine {
    fn select<'t>(&self, root: &'t GenericNode) -> Result<Vec<NodeRef<'t>>, QueryError>;
}

impl<Q: QueryEngine + ?Sized> QueryEngine for &Q {
    fn select<'t>(&self, root: &'t GenericNode) -> Result<Vec<NodeRef<'t>>, QueryError> {
        (**self).select(root)
    }
}
