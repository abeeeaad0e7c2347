use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to initialize tree-sitter parser")]
    ParserInit,

    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("unknown language: {name}")]
    UnknownLanguage { name: String },

    #[error("no language registered for file extension of {path}")]
    UnknownExtension { path: PathBuf },

    #[error("syntax error at line {line}, column {column}")]
    SyntaxError { line: usize, column: usize },

    #[error("multiple syntax errors detected: {count} ERROR nodes, first at line {line}, column {column}")]
    MultipleSyntaxErrors {
        count: usize,
        line: usize,
        column: usize,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
