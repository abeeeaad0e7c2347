//! Thread-local parser pooling.
//!
//! Keeps one parser per thread and reuses it while the requested language
//! stays the same; switching languages replaces the pooled parser.

use crate::ts::{SourceParser, SupportLang, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static PARSER: RefCell<Option<SourceParser>> = const { RefCell::new(None) };
}

/// Execute `f` with the pooled parser for `language`.
///
/// `f` must not call `with_parser` itself.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use astpath::pool::with_parser;
/// use astpath::ts::SupportLang;
///
/// let tree = with_parser(SupportLang::Python, |parser| parser.parse("x = 1\n"))??;
/// assert_eq!(tree.root_node().kind(), "module");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(language: SupportLang, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSER.with(|cell| {
        let mut pooled = cell.borrow_mut();
        let reusable = pooled
            .as_ref()
            .is_some_and(|parser| parser.language() == language);
        if !reusable {
            *pooled = Some(SourceParser::for_language(language)?);
        }
        match pooled.as_mut() {
            Some(parser) => Ok(f(parser)),
            None => Err(TreeSitterError::ParserInit),
        }
    })
}
