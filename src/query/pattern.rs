use crate::query::cache;
use crate::query::errors::QueryError;
use crate::query::QueryEngine;
use crate::tree::{GenericNode, NodeRef, PositionAttribute};
use crate::typed::Position;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, NodeMatch};
use ast_grep_language::SupportLang;

/// Span of one ast-grep match, in generic-tree coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MatchSpan {
    kind: String,
    position: Position,
}

impl MatchSpan {
    fn selects(&self, node: &GenericNode) -> bool {
        let attrs = node.attributes();
        let pos = &self.position;
        node.tag() == self.kind
            && attrs.number(PositionAttribute::StartLine) == pos.start_line
            && attrs.number(PositionAttribute::StartColumn) == pos.start_column
            && attrs.number(PositionAttribute::EndLine) == pos.end_line
            && attrs.number(PositionAttribute::EndColumn) == pos.end_column
    }
}

/// Query engine backed by ast-grep's metavariable patterns.
///
/// # Metavariable Syntax
///
/// - `$NAME` - Matches a single node and captures it
/// - `$$$NAME` - Matches zero or more nodes (variadic)
/// - `$_` - Matches any single node (anonymous)
///
/// # Example Patterns (Python)
///
/// ```text
/// def $NAME($$$PARAMS): $$$BODY       // function definitions
/// print($$$ARGS)                      // calls to print
/// class $NAME: $$$BODY                // classes without bases
/// ```
///
/// Patterns run over the source text, so a `PatternQuery` is bound to the
/// source its tree was converted from. Matches are mapped back to the generic
/// nodes with the same tag and the same span.
#[derive(Debug, Clone)]
pub struct PatternQuery {
    pattern: String,
    spans: Vec<MatchSpan>,
}

impl PatternQuery {
    /// Run `pattern` over `source` and remember the matched spans.
    pub fn find(pattern: &str, source: &str, language: SupportLang) -> Result<Self, QueryError> {
        let pat = cache::get_or_compile_pattern(pattern, language)?;
        let sg = AstGrep::new(source, language);
        let root = sg.root();

        let spans = root
            .find_all(&pat)
            .map(|m| match_span(source, &m))
            .collect::<Vec<_>>();

        tracing::debug!(pattern, matches = spans.len(), "pattern matched");
        Ok(Self {
            pattern: pattern.to_string(),
            spans,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of ast-grep matches in the source.
    pub fn match_count(&self) -> usize {
        self.spans.len()
    }
}

impl QueryEngine for PatternQuery {
    fn select<'t>(&self, root: &'t GenericNode) -> Result<Vec<NodeRef<'t>>, QueryError> {
        Ok(root
            .descendants()
            .into_iter()
            .filter(|node| self.spans.iter().any(|span| span.selects(node)))
            .map(NodeRef::Node)
            .collect())
    }
}

fn match_span(source: &str, m: &NodeMatch<StrDoc<SupportLang>>) -> MatchSpan {
    let node = m.get_node();
    let range = node.range();
    MatchSpan {
        kind: node.kind().to_string(),
        position: Position::of_span(source, range.start, range.end),
    }
}
