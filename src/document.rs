//! A parsed source together with its generic tree.

use crate::extract::{resolve, ExtractError, ExtractOptions, Extraction};
use crate::loader::SourceInput;
use crate::pool;
use crate::query::{cache, PatternQuery, QueryEngine, QueryError, QueryKind};
use crate::tree::{convert, GenericNode, NodeRef};
use crate::ts::{ParseOptions, SupportLang, TreeSitterError, DEFAULT_LANGUAGE};

/// Source text, its language, and the generic tree converted from it.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use astpath::{Document, ExtractOptions, ParseOptions, SupportLang};
///
/// let source = "def f():\n    return 1\n\ndef g():\n    pass\n";
/// let doc = Document::parse(source, SupportLang::Python, ParseOptions::default())?;
///
/// for extraction in doc.extract("//function_definition", None, ExtractOptions::default())? {
///     println!("{}\n", extraction.text);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    language: SupportLang,
    tree: GenericNode,
}

impl Document {
    /// Parse `source` and convert its tree.
    ///
    /// # Errors
    ///
    /// In strict mode any ERROR or MISSING node fails with a syntax error.
    pub fn parse(
        source: impl Into<String>,
        language: SupportLang,
        options: ParseOptions,
    ) -> Result<Self, TreeSitterError> {
        let source = source.into();
        let tree = pool::with_parser(language, |parser| {
            parser
                .parse_checked(&source, options)
                .map(|parsed| convert(&parsed.typed_root()))
        })??;

        tracing::debug!(
            language = ?language,
            bytes = source.len(),
            nodes = tree.descendants().len(),
            "converted source"
        );
        Ok(Self {
            source,
            language,
            tree,
        })
    }

    /// Load and parse `input`.
    ///
    /// The language is `language` if given, else inferred from the input's
    /// extension, else Python.
    pub fn from_input(
        input: &SourceInput,
        language: Option<SupportLang>,
        options: ParseOptions,
    ) -> Result<Self, TreeSitterError> {
        let language = match language {
            Some(language) => language,
            None => input.language().unwrap_or(DEFAULT_LANGUAGE),
        };
        let source = input.load()?;
        Self::parse(source, language, options)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> SupportLang {
        self.language
    }

    pub fn tree(&self) -> &GenericNode {
        &self.tree
    }

    /// Build the engine for a query string.
    pub fn engine(&self, kind: QueryKind, query: &str) -> Result<Box<dyn QueryEngine>, QueryError> {
        match kind {
            QueryKind::Path => Ok(Box::new(cache::compiled(query)?)),
            QueryKind::Pattern => Ok(Box::new(PatternQuery::find(
                query,
                &self.source,
                self.language,
            )?)),
        }
    }

    /// Run a path query against the tree.
    pub fn select(&self, query: &str) -> Result<Vec<NodeRef<'_>>, QueryError> {
        cache::compiled(query)?.select(&self.tree)
    }

    /// Extract with path queries.
    pub fn extract(
        &self,
        primary: &str,
        boundary: Option<&str>,
        options: ExtractOptions,
    ) -> Result<Vec<Extraction>, ExtractError> {
        self.extract_with(QueryKind::Path, primary, boundary, options)
    }

    /// Extract with queries of the given kind.
    pub fn extract_with(
        &self,
        kind: QueryKind,
        primary: &str,
        boundary: Option<&str>,
        options: ExtractOptions,
    ) -> Result<Vec<Extraction>, ExtractError> {
        let primary = self.engine(kind, primary)?;
        let boundary = match boundary {
            Some(query) => Some(self.engine(kind, query)?),
            None => None,
        };
        resolve(
            &self.source,
            &self.tree,
            primary.as_ref(),
            boundary.as_deref(),
            options,
        )
    }
}
