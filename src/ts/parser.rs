use crate::ts::errors::TreeSitterError;
use crate::ts::lang::{SupportLang, DEFAULT_LANGUAGE};
use crate::ts::node::SyntaxNode;
use ast_grep_language::LanguageExt;
use tree_sitter::{Parser, Tree};

/// How to treat trees that contain syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject sources whose tree has ERROR or MISSING nodes.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Tree-sitter parser wrapper bound to one grammar.
pub struct SourceParser {
    parser: Parser,
    language: SupportLang,
}

impl SourceParser {
    /// Create a parser for the default language (Python).
    pub fn new() -> Result<Self, TreeSitterError> {
        Self::for_language(DEFAULT_LANGUAGE)
    }

    /// Create a parser for a specific grammar.
    pub fn for_language(language: SupportLang) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        let ts_lang = language.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser, language })
    }

    pub fn language(&self) -> SupportLang {
        self.language
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource {
            source,
            tree,
            language: self.language,
        })
    }

    /// Parse and apply `options`, rejecting malformed sources in strict mode.
    pub fn parse_checked<'a>(
        &mut self,
        source: &'a str,
        options: ParseOptions,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let parsed = self.parse_with_source(source)?;
        if options.strict {
            parsed.check_syntax()?;
        }
        Ok(parsed)
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
    pub language: SupportLang,
}

impl<'a> ParsedSource<'a> {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Root of the tree as a typed node, ready for conversion.
    pub fn typed_root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.tree.root_node(), self.source, self.language)
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Get all ERROR and MISSING nodes in the tree.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    /// Fail with the first syntax error, if any.
    pub fn check_syntax(&self) -> Result<(), TreeSitterError> {
        let errors = self.error_nodes();
        let Some(first) = errors.first() else {
            return Ok(());
        };
        let line = first.start_point.row + 1;
        let column = first.start_point.column;
        match errors.len() {
            1 => Err(TreeSitterError::SyntaxError { line, column }),
            count => Err(TreeSitterError::MultipleSyntaxErrors {
                count,
                line,
                column,
            }),
        }
    }
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
    pub missing: bool,
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
            missing: node.is_missing(),
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
