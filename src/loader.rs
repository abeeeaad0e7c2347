//! Where source text comes from.

use crate::ts::{language_for_path, SupportLang, TreeSitterError};
use std::fs;
use std::path::{Path, PathBuf};

/// A source to parse: a file on disk or named in-memory text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    Path(PathBuf),
    Text { name: String, text: String },
}

impl SourceInput {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        SourceInput::Path(path.into())
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceInput::Text {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Display name: the path, or the given name.
    pub fn name(&self) -> String {
        match self {
            SourceInput::Path(path) => path.display().to_string(),
            SourceInput::Text { name, .. } => name.clone(),
        }
    }

    /// Language implied by the file extension (or the name's extension).
    pub fn language(&self) -> Result<SupportLang, TreeSitterError> {
        match self {
            SourceInput::Path(path) => language_for_path(path),
            SourceInput::Text { name, .. } => language_for_path(Path::new(name)),
        }
    }

    /// Read the source text.
    pub fn load(&self) -> Result<String, TreeSitterError> {
        match self {
            SourceInput::Path(path) => fs::read_to_string(path).map_err(|source| TreeSitterError::Io {
                path: path.clone(),
                source,
            }),
            SourceInput::Text { text, .. } => Ok(text.clone()),
        }
    }
}
