//! Per-construct field tables.
//!
//! Tree-sitter reports field names per child but not whether a field may
//! repeat, so the arity of a field would otherwise depend on how many
//! children a particular node happened to have. The tables below pin the
//! declared field order and arity for each known construct kind. Kinds (or
//! languages) without an entry fall back to occurrence-based arity.

use crate::ts::lang::SupportLang;

/// Pseudo-field collecting named children that have no grammar field.
pub const CHILDREN: &str = "children";

/// Pseudo-field holding the scalar value of a named leaf node.
pub const VALUE: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value.
    One,
    /// Zero or one; an absent value is recorded as a `None` scalar.
    Optional,
    /// Always a sequence, possibly empty.
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub arity: Arity,
}

// Struct literals (not const fn calls) so the table slices promote to
// `'static`.
macro_rules! one {
    ($name:expr) => {
        FieldSpec {
            name: $name,
            arity: Arity::One,
        }
    };
}

macro_rules! opt {
    ($name:expr) => {
        FieldSpec {
            name: $name,
            arity: Arity::Optional,
        }
    };
}

macro_rules! many {
    ($name:expr) => {
        FieldSpec {
            name: $name,
            arity: Arity::Many,
        }
    };
}

/// Declared fields of `kind` in `language`, or an empty table.
pub fn field_table(language: SupportLang, kind: &str) -> &'static [FieldSpec] {
    match language {
        SupportLang::Python => python(kind),
        _ => &[],
    }
}

fn python(kind: &str) -> &'static [FieldSpec] {
    match kind {
        "module" | "block" => &[many!(CHILDREN)],

        // definitions
        "function_definition" => &[
            one!("name"),
            opt!("type_parameters"),
            one!("parameters"),
            opt!("return_type"),
            one!("body"),
        ],
        "class_definition" => &[
            one!("name"),
            opt!("type_parameters"),
            opt!("superclasses"),
            one!("body"),
        ],
        "decorated_definition" => &[many!(CHILDREN), one!("definition")],
        "decorator" => &[many!(CHILDREN)],
        "parameters" | "lambda_parameters" => &[many!(CHILDREN)],
        "default_parameter" => &[one!("name"), one!("value")],
        "typed_parameter" => &[many!(CHILDREN), one!("type")],
        "typed_default_parameter" => &[one!("name"), one!("type"), one!("value")],

        // compound statements
        "if_statement" => &[
            one!("condition"),
            one!("consequence"),
            many!("alternative"),
        ],
        "elif_clause" => &[one!("condition"), one!("consequence")],
        "else_clause" => &[one!("body")],
        "for_statement" => &[
            one!("left"),
            one!("right"),
            one!("body"),
            opt!("alternative"),
        ],
        "while_statement" => &[one!("condition"), one!("body"), opt!("alternative")],
        "try_statement" => &[one!("body"), many!(CHILDREN)],
        "with_statement" => &[many!(CHILDREN), one!("body")],
        "match_statement" => &[many!("subject"), one!("body")],
        "case_clause" => &[many!(CHILDREN), opt!("guard"), one!("consequence")],

        // simple statements
        "expression_statement" | "return_statement" | "delete_statement" => &[many!(CHILDREN)],
        "import_statement" => &[many!("name")],
        "import_from_statement" => &[one!("module_name"), many!("name")],
        "aliased_import" => &[one!("name"), one!("alias")],
        "assignment" => &[one!("left"), opt!("type"), opt!("right")],
        "augmented_assignment" => &[one!("left"), one!("operator"), one!("right")],
        "raise_statement" => &[many!(CHILDREN), opt!("cause")],
        "global_statement" | "nonlocal_statement" | "assert_statement" => &[many!(CHILDREN)],

        // expressions
        "binary_operator" | "boolean_operator" => &[one!("left"), one!("operator"), one!("right")],
        "unary_operator" => &[one!("operator"), one!("argument")],
        "not_operator" => &[one!("argument")],
        "comparison_operator" => &[many!(CHILDREN), many!("operators")],
        "call" => &[one!("function"), one!("arguments")],
        "argument_list" => &[many!(CHILDREN)],
        "keyword_argument" => &[one!("name"), one!("value")],
        "attribute" => &[one!("object"), one!("attribute")],
        "subscript" => &[one!("value"), many!("subscript")],
        "lambda" => &[opt!("parameters"), one!("body")],
        "named_expression" => &[one!("name"), one!("value")],
        "pair" => &[one!("key"), one!("value")],
        "list" | "tuple" | "set" | "dictionary" => &[many!(CHILDREN)],

        _ => &[],
    }
}
