//! astpath: path queries over syntax trees, and source extraction by query
//!
//! Source is parsed with tree-sitter and projected into a [`GenericNode`]
//! tree: every construct becomes a node tagged with its kind and carrying
//! its position as string attributes, and every field becomes a named slot.
//! Queries select nodes of that tree; the extractor maps the selected nodes
//! back to the lines of source they came from.
//!
//! # Architecture
//!
//! ```text
//! SourceInput -> SourceParser -> SyntaxNode (TypedNode)
//!             -> convert -> GenericNode
//!             -> QueryEngine::select -> resolve -> Extraction
//! ```
//!
//! The converter works on anything implementing [`TypedNode`]; tree-sitter
//! is one implementation. Queries go through the [`QueryEngine`] trait, with
//! an XPath-style [`PathQuery`] and an ast-grep [`PatternQuery`] provided.
//!
//! # Example
//!
//! ```no_run
//! let source = "\
//! def f():
//!     x = 1
//!     return x
//! def g():
//!     pass
//! ";
//!
//! let found = astpath::extract(source, "//function_definition", None, true).unwrap();
//! assert_eq!(found[0].text, "def f():\n    x = 1\n    return x");
//! assert_eq!(found[1].text, "def g():\n    pass");
//!
//! // Stop the first function where the second one starts.
//! let bounded = astpath::extract(
//!     source,
//!     "//function_definition[1]",
//!     Some("//function_definition[name/identifier/value='g']"),
//!     true,
//! )
//! .unwrap();
//! assert_eq!(bounded[0].end_line, 3);
//! ```

pub mod config;
pub mod document;
pub mod extract;
pub mod loader;
pub mod pool;
pub mod query;
pub mod tree;
pub mod ts;
pub mod typed;

// Re-exports
pub use config::{
    load_from_path, load_from_str, run_plan, ConfigError, ExtractConfig, ExtractPlan,
};
pub use document::Document;
pub use extract::{extract, resolve, ExtractError, ExtractOptions, Extraction};
pub use loader::SourceInput;
pub use query::{PathQuery, PatternQuery, QueryEngine, QueryError, QueryKind};
pub use tree::{convert, Attributes, GenericNode, NodeRef, PositionAttribute};
pub use ts::{
    language_for_path, language_from_name, ParseOptions, SourceParser, SupportLang,
    TreeSitterError, DEFAULT_LANGUAGE,
};
pub use typed::{Position, Scalar, TypedNode};
