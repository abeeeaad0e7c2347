//! Plan runner - executes every target of an extraction plan
//!
//! Targets are grouped by file and language so each source is read and
//! converted once. Results come back in plan order, one per target; a
//! failing target does not stop the others.

use crate::config::loader::ExtractPlan;
use crate::config::schema::TargetDefinition;
use crate::document::Document;
use crate::extract::{ExtractError, ExtractOptions, Extraction};
use crate::ts::{ParseOptions, SupportLang};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of running a single target
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "TargetResult should be checked"]
pub struct TargetResult {
    pub file: PathBuf,
    pub extractions: Vec<Extraction>,
}

impl fmt::Display for TargetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.extractions.len() == 1 {
            "extraction"
        } else {
            "extractions"
        };
        write!(
            f,
            "{} {} from {}",
            self.extractions.len(),
            noun,
            self.file.display()
        )
    }
}

/// Errors while running a target
#[derive(Debug)]
pub enum RunError {
    /// Source file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Source could not be parsed
    Parse { file: PathBuf, message: String },
    /// Query or range resolution failed
    Extract { file: PathBuf, source: ExtractError },
    /// Primary query matched nothing
    NoMatch { file: PathBuf },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            RunError::Parse { file, message } => {
                write!(f, "failed to parse {}: {}", file.display(), message)
            }
            RunError::Extract { file, source } => {
                write!(f, "extraction failed in {}: {}", file.display(), source)
            }
            RunError::NoMatch { file } => {
                write!(f, "query matched no locations in {}", file.display())
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Io { source, .. } => Some(source),
            RunError::Extract { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Run every target of `plan`, resolving files through [`ExtractPlan::resolve`].
pub fn run_plan(plan: &ExtractPlan) -> Vec<(String, Result<TargetResult, RunError>)> {
    let config = &plan.config;
    let mut documents: HashMap<(PathBuf, SupportLang), Result<Document, RunError>> =
        HashMap::new();
    let mut results = Vec::with_capacity(config.targets.len());

    for target in &config.targets {
        let file = plan.resolve(&target.file);
        let language = target.language(&config.meta);

        let document = documents
            .entry((file.clone(), language))
            .or_insert_with(|| load_document(&file, language));

        let result = match document {
            Ok(document) => run_target(target, &file, document),
            Err(error) => Err(copy_error(error)),
        };
        results.push((target.id.clone(), result));
    }

    tracing::debug!(
        targets = results.len(),
        files = documents.len(),
        failed = results.iter().filter(|(_, r)| r.is_err()).count(),
        "ran extraction plan"
    );
    results
}

fn load_document(file: &Path, language: SupportLang) -> Result<Document, RunError> {
    let source = fs::read_to_string(file).map_err(|source| RunError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    Document::parse(source, language, ParseOptions::default()).map_err(|e| RunError::Parse {
        file: file.to_path_buf(),
        message: e.to_string(),
    })
}

fn run_target(
    target: &TargetDefinition,
    file: &Path,
    document: &Document,
) -> Result<TargetResult, RunError> {
    let options = ExtractOptions {
        dedent: target.dedent,
    };
    let extractions = document
        .extract_with(target.kind, &target.query, target.until.as_deref(), options)
        .map_err(|source| RunError::Extract {
            file: file.to_path_buf(),
            source,
        })?;

    if extractions.is_empty() {
        return Err(RunError::NoMatch {
            file: file.to_path_buf(),
        });
    }

    Ok(TargetResult {
        file: file.to_path_buf(),
        extractions,
    })
}

// A file-level failure is reported once per target that uses the file.
fn copy_error(error: &RunError) -> RunError {
    match error {
        RunError::Io { path, source } => RunError::Io {
            path: path.clone(),
            source: std::io::Error::new(source.kind(), source.to_string()),
        },
        RunError::Parse { file, message } => RunError::Parse {
            file: file.clone(),
            message: message.clone(),
        },
        other => RunError::Parse {
            file: PathBuf::new(),
            message: other.to_string(),
        },
    }
}
