//! Mapping matched elements back to line ranges of the source.

use crate::extract::dedent::dedent;
use crate::extract::errors::ExtractError;
use crate::query::QueryEngine;
use crate::tree::{Attributes, GenericNode, NodeRef};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Strip common leading indentation from each extraction.
    pub dedent: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { dedent: true }
    }
}

impl ExtractOptions {
    /// Keep the original indentation.
    pub fn raw() -> Self {
        Self { dedent: false }
    }
}

/// One extracted span of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    /// Attributes of the matched element.
    pub attributes: Attributes,
    /// First line of the span (1-based).
    pub start_line: usize,
    /// Last line of the span, inclusive. Less than `start_line` for an
    /// empty span.
    pub end_line: usize,
}

/// Extract the source lines of every `primary` match in `root`.
///
/// With a `boundary`, each span runs from the match's start line up to, but
/// not including, the line the single boundary match starts on. Without one,
/// it runs to the match's own end line.
///
/// # Errors
///
/// - `AmbiguousBoundary` if the boundary does not match exactly once. This
///   is checked before the primary query runs.
/// - `UnlocatedBoundary` if the boundary match has no start line.
/// - `InvertedRange` if the boundary starts before any primary match. No
///   partial results are returned.
pub fn resolve(
    source: &str,
    root: &GenericNode,
    primary: &dyn QueryEngine,
    boundary: Option<&dyn QueryEngine>,
    options: ExtractOptions,
) -> Result<Vec<Extraction>, ExtractError> {
    let boundary_line = match boundary {
        Some(engine) => Some(boundary_start(root, engine)?),
        None => None,
    };

    let lines: Vec<&str> = source.lines().collect();
    let matches = primary.select(root)?;
    let mut out = Vec::with_capacity(matches.len());

    for element in matches {
        let attributes = element.attributes();
        let Some(start) = first_line(attributes) else {
            tracing::trace!(tag = element.tag(), "skipping match without start line");
            continue;
        };

        let end = match boundary_line {
            Some(boundary_line) if boundary_line < start => {
                return Err(ExtractError::InvertedRange {
                    boundary_line,
                    match_line: start,
                });
            }
            Some(boundary_line) => boundary_line - 1,
            None => attributes.end_line().unwrap_or(start),
        };

        let text = slice_lines(&lines, start, end);
        let text = if options.dedent { dedent(&text) } else { text };

        out.push(Extraction {
            text,
            attributes: attributes.clone(),
            start_line: start,
            end_line: end,
        });
    }

    tracing::debug!(
        extractions = out.len(),
        bounded = boundary_line.is_some(),
        "resolved source ranges"
    );
    Ok(out)
}

fn boundary_start(root: &GenericNode, engine: &dyn QueryEngine) -> Result<usize, ExtractError> {
    let found = engine.select(root)?;
    let element: NodeRef<'_> = match found.as_slice() {
        [only] => *only,
        _ => return Err(ExtractError::AmbiguousBoundary { count: found.len() }),
    };
    first_line(element.attributes()).ok_or_else(|| ExtractError::UnlocatedBoundary {
        tag: element.tag().to_string(),
    })
}

// Lines are 1-based; a deserialized tree may still say "0".
fn first_line(attributes: &Attributes) -> Option<usize> {
    attributes.start_line().filter(|&line| line > 0)
}

/// Lines `start..=end` (1-based), clamped to the text, joined with `\n`.
fn slice_lines(lines: &[&str], start: usize, end: usize) -> String {
    let lo = start.saturating_sub(1).min(lines.len());
    let hi = end.min(lines.len()).max(lo);
    lines[lo..hi].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PathQuery, QueryError};
    use crate::tree::{PositionAttribute, Slot, SlotContent};
    use proptest::prelude::*;

    fn located(start: usize, end: usize) -> Attributes {
        [
            (PositionAttribute::StartLine, start.to_string()),
            (PositionAttribute::StartColumn, "0".to_string()),
            (PositionAttribute::EndLine, end.to_string()),
            (PositionAttribute::EndColumn, "0".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn module(children: Vec<GenericNode>) -> GenericNode {
        GenericNode::new(
            "module",
            Attributes::new(),
            vec![Slot::new("children", SlotContent::Nodes(children))],
        )
    }

    fn item(tag: &str, start: usize, end: usize) -> GenericNode {
        GenericNode::new(tag, located(start, end), vec![])
    }

    fn path(query: &str) -> PathQuery {
        PathQuery::compile(query).unwrap()
    }

    const TWO_FUNCTIONS: &str = "\
def f():
    x = 1
    return x
def g():
    pass
";

    fn two_functions() -> GenericNode {
        module(vec![item("function", 1, 3), item("function", 4, 5)])
    }

    #[test]
    fn each_match_spans_its_own_lines() {
        let tree = two_functions();
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            None,
            ExtractOptions::default(),
        )
        .unwrap();

        let texts: Vec<_> = out.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["def f():\n    x = 1\n    return x", "def g():\n    pass"]
        );
        assert_eq!((out[1].start_line, out[1].end_line), (4, 5));
        assert_eq!(out[0].attributes.start_line(), Some(1));
    }

    #[test]
    fn boundary_line_is_excluded() {
        let tree = two_functions();
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function[1]"),
            Some(&path("//function[2]")),
            ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "def f():\n    x = 1\n    return x");
        assert_eq!(out[0].end_line, 3);
    }

    #[test]
    fn boundary_on_match_start_gives_empty_span() {
        let tree = two_functions();
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            Some(&path("//function[2]")),
            ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "def f():\n    x = 1\n    return x");
        assert_eq!(out[1].text, "");
        assert_eq!((out[1].start_line, out[1].end_line), (4, 3));
    }

    #[test]
    fn boundary_before_match_is_inverted() {
        let tree = two_functions();
        let err = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function[2]"),
            Some(&path("//function[1]")),
            ExtractOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ExtractError::InvertedRange {
                boundary_line: 1,
                match_line: 4
            }
        ));
    }

    #[test]
    fn boundary_must_match_exactly_once() {
        let tree = two_functions();
        for (boundary, count) in [("//class", 0), ("//function", 2)] {
            let err = resolve(
                TWO_FUNCTIONS,
                &tree,
                &path("//nothing"),
                Some(&path(boundary)),
                ExtractOptions::default(),
            )
            .unwrap_err();
            assert!(matches!(err, ExtractError::AmbiguousBoundary { count: c } if c == count));
        }
    }

    #[test]
    fn unlocated_boundary_is_rejected() {
        let tree = module(vec![
            item("function", 1, 3),
            GenericNode::new("marker", Attributes::new(), vec![]),
        ]);
        let err = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            Some(&path("//marker")),
            ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::UnlocatedBoundary { ref tag } if tag == "marker"));
    }

    #[test]
    fn line_zero_counts_as_unlocated() {
        let tree = module(vec![item("function", 0, 0), item("marker", 0, 0)]);

        let err = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            Some(&path("//marker")),
            ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::UnlocatedBoundary { ref tag } if tag == "marker"));

        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            None,
            ExtractOptions::default(),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn matches_without_position_are_skipped() {
        let tree = module(vec![
            GenericNode::new("function", Attributes::new(), vec![]),
            item("function", 4, 5),
        ]);
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            None,
            ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "def g():\n    pass");
    }

    #[test]
    fn missing_end_line_is_a_single_line() {
        let attrs: Attributes = [(PositionAttribute::StartLine, "2".to_string())]
            .into_iter()
            .collect();
        let tree = module(vec![GenericNode::new("stmt", attrs, vec![])]);
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//stmt"),
            None,
            ExtractOptions::raw(),
        )
        .unwrap();
        assert_eq!(out[0].text, "    x = 1");
    }

    #[test]
    fn spans_are_clamped_to_the_source() {
        let tree = module(vec![item("function", 4, 40)]);
        let out = resolve(
            TWO_FUNCTIONS,
            &tree,
            &path("//function"),
            None,
            ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(out[0].text, "def g():\n    pass");
    }

    #[test]
    fn nested_matches_dedent_independently() {
        let source = "class A:\n    def m(self):\n        return 1\n";
        let tree = module(vec![GenericNode::new(
            "class",
            located(1, 3),
            vec![Slot::new(
                "body",
                SlotContent::Nodes(vec![item("function", 2, 3)]),
            )],
        )]);

        let out = resolve(source, &tree, &path("//function"), None, ExtractOptions::default()).unwrap();
        assert_eq!(out[0].text, "def m(self):\n    return 1");

        let raw = resolve(source, &tree, &path("//function"), None, ExtractOptions::raw()).unwrap();
        assert_eq!(raw[0].text, "    def m(self):\n        return 1");
    }

    #[test]
    fn query_errors_propagate() {
        struct Failing;
        impl QueryEngine for Failing {
            fn select<'t>(&self, _: &'t GenericNode) -> Result<Vec<NodeRef<'t>>, QueryError> {
                Err(QueryError::Empty)
            }
        }

        let tree = two_functions();
        let err = resolve(TWO_FUNCTIONS, &tree, &Failing, None, ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Query(QueryError::Empty)));
    }

    proptest! {
        #[test]
        fn boundary_span_ends_just_before_boundary(
            start in 1usize..20,
            gap in 0usize..20,
            total in 0usize..50,
        ) {
            let boundary = start + gap;
            let source: String = (1..=total).map(|n| format!("line {n}\n")).collect();
            let tree = module(vec![item("p", start, start), item("b", boundary, boundary)]);

            let out = resolve(
                &source,
                &tree,
                &path("//p"),
                Some(&path("//b")),
                ExtractOptions::raw(),
            ).unwrap();

            let expected: Vec<String> = (start..boundary)
                .filter(|n| *n <= total)
                .map(|n| format!("line {n}"))
                .collect();
            prop_assert_eq!(&out[0].text, &expected.join("\n"));
            prop_assert_eq!(out[0].end_line, boundary - 1);
        }
    }
}
