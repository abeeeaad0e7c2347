//! Plan loading: TOML text in, a validated [`ExtractPlan`] out.
//!
//! A plan loaded from a file remembers that file, so relative target paths
//! resolve against the plan's own directory.

use crate::config::schema::{ExtractConfig, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read plan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed plan TOML: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("{}: invalid extraction plan: {source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<inline plan>".to_string(),
    }
}

/// A validated plan and the directory its relative files resolve against.
#[derive(Debug, Clone)]
pub struct ExtractPlan {
    pub config: ExtractConfig,
    path: Option<PathBuf>,
    base_dir: PathBuf,
}

impl ExtractPlan {
    /// The plan file, when loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve relative target files against `dir` instead.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Where a target's `file` lives: under the base directory when the
    /// plan is `root_relative`, as written otherwise.
    pub fn resolve(&self, file: &str) -> PathBuf {
        if self.config.meta.root_relative {
            self.base_dir.join(file)
        } else {
            PathBuf::from(file)
        }
    }

    /// `meta.name`, falling back to the plan file's path.
    pub fn display_name(&self) -> String {
        if !self.config.meta.name.is_empty() {
            return self.config.meta.name.clone();
        }
        origin(&self.path)
    }
}

fn parse(input: &str, path: Option<&Path>) -> Result<ExtractConfig, ConfigError> {
    let config: ExtractConfig = toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    config.validate().map_err(|source| ConfigError::Validation {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    Ok(config)
}

/// Parse and validate inline plan text. Relative files resolve against
/// the working directory until [`ExtractPlan::with_base_dir`] says otherwise.
pub fn load_from_str(input: &str) -> Result<ExtractPlan, ConfigError> {
    Ok(ExtractPlan {
        config: parse(input, None)?,
        path: None,
        base_dir: PathBuf::from("."),
    })
}

/// Read, parse and validate a plan file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ExtractPlan, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let config = parse(&contents, Some(path))?;

    tracing::debug!(
        plan = %path.display(),
        base_dir = %base_dir.display(),
        targets = config.targets.len(),
        "loaded plan"
    );
    Ok(ExtractPlan {
        config,
        path: Some(path.to_path_buf()),
        base_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryKind;
    use tempfile::TempDir;

    const PLAN: &str = r#"
[meta]
name = "snippets"
language = "python"

[[targets]]
id = "handler"
file = "app.py"
query = "//function_definition[name/identifier/value='handler']"
"#;

    #[test]
    fn parses_defaults() {
        let plan = load_from_str(PLAN).unwrap();
        assert_eq!(plan.config.meta.name, "snippets");
        assert!(!plan.config.meta.root_relative);
        assert_eq!(plan.path(), None);
        assert_eq!(plan.base_dir(), Path::new("."));

        let target = &plan.config.targets[0];
        assert!(target.dedent);
        assert_eq!(target.until, None);
        assert_eq!(target.kind, QueryKind::Path);
    }

    #[test]
    fn file_plans_resolve_against_their_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.toml");
        fs::write(&path, PLAN.replace("language = \"python\"", "root_relative = true")).unwrap();

        let plan = load_from_path(&path).unwrap();
        assert_eq!(plan.path(), Some(path.as_path()));
        assert_eq!(plan.base_dir(), dir.path());
        assert_eq!(plan.resolve("src/app.py"), dir.path().join("src/app.py"));
        assert_eq!(plan.display_name(), "snippets");
    }

    #[test]
    fn paths_are_kept_as_written_unless_root_relative() {
        let plan = load_from_str(PLAN).unwrap().with_base_dir("/srv");
        assert_eq!(plan.resolve("app.py"), PathBuf::from("app.py"));
    }

    #[test]
    fn unnamed_plans_are_named_by_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unnamed.toml");
        fs::write(&path, PLAN.replace("name = \"snippets\"\n", "")).unwrap();

        let plan = load_from_path(&path).unwrap();
        assert!(plan.display_name().ends_with("unnamed.toml"));

        let inline = load_from_str(&PLAN.replace("name = \"snippets\"\n", "")).unwrap();
        assert_eq!(inline.display_name(), "<inline plan>");
    }

    #[test]
    fn toml_errors_carry_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.toml");
        fs::write(&path, "[[targets]\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { path: Some(_), .. }));
        assert!(err.to_string().contains("plan.toml"));
    }

    #[test]
    fn validation_errors_are_reported() {
        let err = load_from_str("[meta]\nname = \"empty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { path: None, .. }));
        assert!(err.to_string().starts_with("<inline plan>: invalid extraction plan"));
        assert!(err.to_string().contains("no targets"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_from_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
