use crate::query::QueryError;
use crate::ts::TreeSitterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("boundary query matched {count} locations, expected exactly 1")]
    AmbiguousBoundary { count: usize },

    #[error("boundary starts at line {boundary_line}, before the match at line {match_line}")]
    InvertedRange {
        boundary_line: usize,
        match_line: usize,
    },

    #[error("boundary element <{tag}> has no start line")]
    UnlocatedBoundary { tag: String },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Parse(#[from] TreeSitterError),
}
