//! Source range resolution: turning matched elements back into text.

pub mod dedent;
pub mod errors;
pub mod resolver;

pub use dedent::dedent;
pub use errors::ExtractError;
pub use resolver::{resolve, ExtractOptions, Extraction};

use crate::document::Document;
use crate::ts::{ParseOptions, DEFAULT_LANGUAGE};

/// Extract Python source by path query.
///
/// Parses `source` strictly, converts it, and resolves `primary` (and the
/// optional `boundary`) against the generic tree.
///
/// ```no_run
/// let source = "def f():\n    x = 1\n    return x\ndef g():\n    pass\n";
/// let found = astpath::extract(source, "//function_definition", None, true).unwrap();
/// assert_eq!(found[1].text, "def g():\n    pass");
/// ```
pub fn extract(
    source: &str,
    primary: &str,
    boundary: Option<&str>,
    dedent: bool,
) -> Result<Vec<Extraction>, ExtractError> {
    let document = Document::parse(source, DEFAULT_LANGUAGE, ParseOptions::default())?;
    document.extract(primary, boundary, ExtractOptions { dedent })
}
