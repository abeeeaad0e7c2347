use crate::query::{cache, QueryKind};
use crate::ts::{language_from_name, SupportLang, DEFAULT_LANGUAGE};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// A batch of extraction targets.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ExtractConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub targets: Vec<TargetDefinition>,
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.targets.is_empty() {
            issues.push(ValidationIssue::EmptyTargetList);
        }

        if let Some(name) = &self.meta.language {
            if language_from_name(name).is_err() {
                issues.push(ValidationIssue::UnknownLanguage {
                    target_id: None,
                    name: name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            let target_id = (!target.id.trim().is_empty()).then(|| target.id.clone());

            match &target_id {
                Some(id) => {
                    if !seen.insert(target.id.as_str()) {
                        issues.push(ValidationIssue::DuplicateId { id: id.clone() });
                    }
                }
                None => issues.push(ValidationIssue::MissingField {
                    target_id: None,
                    field: "id",
                }),
            }
            if target.file.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    target_id: target_id.clone(),
                    field: "file",
                });
            }

            let language = match &target.language {
                Some(name) => match language_from_name(name) {
                    Ok(language) => Some(language),
                    Err(_) => {
                        issues.push(ValidationIssue::UnknownLanguage {
                            target_id: target_id.clone(),
                            name: name.clone(),
                        });
                        None
                    }
                },
                None => Some(self.meta.language()),
            };

            if target.query.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    target_id: target_id.clone(),
                    field: "query",
                });
            } else if let Some(message) = check_query(target.kind, &target.query, language) {
                issues.push(ValidationIssue::InvalidQuery {
                    target_id: target_id.clone(),
                    field: "query",
                    message,
                });
            }

            if let Some(until) = &target.until {
                if let Some(message) = check_query(target.kind, until, language) {
                    issues.push(ValidationIssue::InvalidQuery {
                        target_id: target_id.clone(),
                        field: "until",
                        message,
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

// Patterns can only be checked once the grammar is known.
fn check_query(kind: QueryKind, query: &str, language: Option<SupportLang>) -> Option<String> {
    let result = match (kind, language) {
        (QueryKind::Path, _) => cache::compiled(query).map(|_| ()),
        (QueryKind::Pattern, Some(language)) => {
            cache::get_or_compile_pattern(query, language).map(|_| ())
        }
        (QueryKind::Pattern, None) => Ok(()),
    };
    result.err().map(|e| e.to_string())
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default language for targets; Python when unset.
    #[serde(default)]
    pub language: Option<String>,
    /// Resolve target files relative to the plan's directory.
    #[serde(default)]
    pub root_relative: bool,
}

impl Metadata {
    /// The plan-wide language, falling back to the default for unknown names.
    pub fn language(&self) -> SupportLang {
        self.language
            .as_deref()
            .and_then(|name| language_from_name(name).ok())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TargetDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub query: String,
    /// Boundary query; the extraction stops before its line.
    #[serde(default)]
    pub until: Option<String>,
    #[serde(default = "default_dedent")]
    pub dedent: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub kind: QueryKind,
}

fn default_dedent() -> bool {
    true
}

impl TargetDefinition {
    /// Target language, else the plan's.
    pub fn language(&self, meta: &Metadata) -> SupportLang {
        self.language
            .as_deref()
            .and_then(|name| language_from_name(name).ok())
            .unwrap_or_else(|| meta.language())
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyTargetList,
    MissingField {
        target_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        id: String,
    },
    UnknownLanguage {
        target_id: Option<String>,
        name: String,
    },
    InvalidQuery {
        target_id: Option<String>,
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyTargetList => write!(f, "extraction plan contains no targets"),
            ValidationIssue::MissingField { target_id, field } => match target_id {
                Some(id) => write!(f, "target '{id}' missing required field '{field}'"),
                None => write!(f, "target missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { id } => write!(f, "target id '{id}' is used more than once"),
            ValidationIssue::UnknownLanguage { target_id, name } => match target_id {
                Some(id) => write!(f, "target '{id}' uses unknown language '{name}'"),
                None => write!(f, "unknown language '{name}'"),
            },
            ValidationIssue::InvalidQuery {
                target_id,
                field,
                message,
            } => match target_id {
                Some(id) => write!(f, "target '{id}' has invalid {field}: {message}"),
                None => write!(f, "target has invalid {field}: {message}"),
            },
        }
    }
}
