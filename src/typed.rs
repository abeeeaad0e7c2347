//! The typed parse tree boundary.
//!
//! A parser hands us nodes tagged with a construct kind and a fixed, ordered
//! set of named fields. [`TypedNode`] is the only thing the converter needs
//! to know about that tree, so any parser (tree-sitter here, hand-built
//! fixtures in tests) can be projected into a [`GenericNode`].
//!
//! [`GenericNode`]: crate::tree::GenericNode

use std::fmt;

/// Source position carried by a typed node.
///
/// Lines are 1-indexed, columns are 0-indexed byte offsets and the end column
/// is exclusive. Nodes that were synthesized by the parser (or recovered from
/// a syntax error) may carry no position at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub start_line: Option<usize>,
    pub start_column: Option<usize>,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
}

impl Position {
    /// A fully located span.
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line: Some(start_line),
            start_column: Some(start_column),
            end_line: Some(end_line),
            end_column: Some(end_column),
        }
    }

    /// No position fields at all.
    pub fn unlocated() -> Self {
        Self::default()
    }

    /// Position of the bytes `start..end` of `source`.
    ///
    /// A span that stops right after a newline ends on the line holding its
    /// last character, so `end_line` never names a line the span has no
    /// text on.
    pub fn of_span(source: &str, start: usize, end: usize) -> Self {
        let bytes = source.as_bytes();
        let end = end.min(bytes.len());
        let start = start.min(end);

        let mut last = end;
        if last > start && bytes[last - 1] == b'\n' {
            last -= 1;
            if last > start && bytes[last - 1] == b'\r' {
                last -= 1;
            }
        }

        let (start_line, start_column) = line_column(bytes, start);
        let (end_line, end_column) = line_column(bytes, last);
        Self::new(start_line, start_column, end_line, end_column)
    }
}

/// 1-based line and 0-based byte column of a byte offset.
fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let before = &bytes[..offset];
    let line = before.iter().filter(|b| **b == b'\n').count() + 1;
    let column = match before.iter().rposition(|b| *b == b'\n') {
        Some(newline) => before.len() - newline - 1,
        None => before.len(),
    };
    (line, column)
}

/// A scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl Scalar {
    /// Name written to the `type` attribute of a leaf slot.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "str",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
            Scalar::None => "NoneType",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write_float(f, *x),
            Scalar::Bool(true) => f.write_str("True"),
            Scalar::Bool(false) => f.write_str("False"),
            Scalar::None => f.write_str("None"),
        }
    }
}

// Floats always render with a fraction or exponent so `1.0` never reads back
// as an integer.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }
    let abs = x.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        return write!(f, "{x:e}");
    }
    let text = x.to_string();
    if text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

/// One element of a sequence field.
#[derive(Debug, Clone)]
pub enum Element<N> {
    Node(N),
    Scalar(Scalar),
}

/// The value of a single named field.
#[derive(Debug, Clone)]
pub enum FieldValue<N> {
    /// A nested node.
    Node(N),
    /// An ordered sequence, not necessarily homogeneous.
    Sequence(Vec<Element<N>>),
    Scalar(Scalar),
}

/// A named field, in the node's declared order.
#[derive(Debug, Clone)]
pub struct Field<N> {
    pub name: &'static str,
    pub value: FieldValue<N>,
}

impl<N> Field<N> {
    pub fn new(name: &'static str, value: FieldValue<N>) -> Self {
        Self { name, value }
    }
}

/// A node of a typed parse tree.
pub trait TypedNode: Sized {
    /// Construct kind, e.g. `function_definition`.
    fn kind(&self) -> &str;

    /// Position fields the node carries.
    fn position(&self) -> Position;

    /// Structural fields in declared order.
    fn fields(&self) -> Vec<Field<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_type_names() {
        assert_eq!(Scalar::Str("x".into()).type_name(), "str");
        assert_eq!(Scalar::Int(3).type_name(), "int");
        assert_eq!(Scalar::Float(1.5).type_name(), "float");
        assert_eq!(Scalar::Bool(false).type_name(), "bool");
        assert_eq!(Scalar::None.type_name(), "NoneType");
    }

    #[test]
    fn scalar_stringification() {
        assert_eq!(Scalar::Str("hello".into()).to_string(), "hello");
        assert_eq!(Scalar::Int(-42).to_string(), "-42");
        assert_eq!(Scalar::Bool(true).to_string(), "True");
        assert_eq!(Scalar::Bool(false).to_string(), "False");
        assert_eq!(Scalar::None.to_string(), "None");
    }

    #[test]
    fn float_stringification_keeps_fraction() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Float(0.0).to_string(), "0.0");
        assert_eq!(Scalar::Float(1e100).to_string(), "1e100");
        assert_eq!(Scalar::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Scalar::Float(f64::NAN).to_string(), "nan");
    }

    #[test]
    fn unlocated_position_is_empty() {
        let pos = Position::unlocated();
        assert!(pos.start_line.is_none());
        assert!(pos.end_column.is_none());
        assert_eq!(Position::new(1, 0, 2, 4).end_line, Some(2));
    }

    #[test]
    fn span_positions() {
        let text = "ab\ncd\n";
        assert_eq!(Position::of_span(text, 0, 2), Position::new(1, 0, 1, 2));
        assert_eq!(Position::of_span(text, 3, 5), Position::new(2, 0, 2, 2));
        assert_eq!(Position::of_span(text, 100, 200), Position::new(3, 0, 3, 0));
    }

    #[test]
    fn span_ending_after_newline_stays_on_last_text_line() {
        let text = "ab\ncd\nef";
        assert_eq!(Position::of_span(text, 0, 6), Position::new(1, 0, 2, 2));
        assert_eq!(Position::of_span("ab\r\ncd\r\n", 0, 8), Position::new(1, 0, 2, 2));
        // A bare newline keeps its own line.
        assert_eq!(Position::of_span(text, 2, 3), Position::new(1, 2, 1, 2));
    }
}
