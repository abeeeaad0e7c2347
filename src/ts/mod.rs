//! Tree-sitter integration: the typed parse tree the converter consumes.
//!
//! Grammars come from ast-grep-language. Each tree-sitter node is exposed as
//! a [`TypedNode`](crate::typed::TypedNode) through [`SyntaxNode`], with field
//! arity pinned by the per-construct tables in [`fields`].

pub mod errors;
pub mod fields;
pub mod lang;
pub mod node;
pub mod parser;

pub use errors::TreeSitterError;
pub use lang::{language_for_path, language_from_name, SupportLang, DEFAULT_LANGUAGE};
pub use node::SyntaxNode;
pub use parser::{ParseOptions, ParsedSource, SourceParser};
