use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid path query at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("empty path query")]
    Empty,

    #[error("invalid pattern: {message}")]
    InvalidPattern { message: String },
}
