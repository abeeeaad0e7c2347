//! Grammar selection via ast-grep-language.
//!
//! We use the built-in `SupportLang` grammars from ast-grep-language rather
//! than depending on individual tree-sitter grammar crates.

use crate::ts::errors::TreeSitterError;
pub use ast_grep_language::SupportLang;
use std::path::Path;

/// Language used when nothing else is specified.
pub const DEFAULT_LANGUAGE: SupportLang = SupportLang::Python;

/// Resolve a language by name or common alias (case-insensitive).
pub fn language_from_name(name: &str) -> Result<SupportLang, TreeSitterError> {
    let lang = match name.trim().to_ascii_lowercase().as_str() {
        "python" | "py" => SupportLang::Python,
        "rust" | "rs" => SupportLang::Rust,
        "javascript" | "js" => SupportLang::JavaScript,
        "typescript" | "ts" => SupportLang::TypeScript,
        "go" | "golang" => SupportLang::Go,
        "java" => SupportLang::Java,
        "ruby" | "rb" => SupportLang::Ruby,
        "c" => SupportLang::C,
        "cpp" | "c++" | "cxx" => SupportLang::Cpp,
        _ => {
            return Err(TreeSitterError::UnknownLanguage {
                name: name.to_string(),
            })
        }
    };
    Ok(lang)
}

/// Pick a language from a file extension.
pub fn language_for_path(path: &Path) -> Result<SupportLang, TreeSitterError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let lang = match ext.as_deref() {
        Some("py" | "pyi") => SupportLang::Python,
        Some("rs") => SupportLang::Rust,
        Some("js" | "mjs" | "cjs") => SupportLang::JavaScript,
        Some("ts" | "mts" | "cts") => SupportLang::TypeScript,
        Some("go") => SupportLang::Go,
        Some("java") => SupportLang::Java,
        Some("rb") => SupportLang::Ruby,
        Some("c" | "h") => SupportLang::C,
        Some("cc" | "cpp" | "cxx" | "hpp" | "hh") => SupportLang::Cpp,
        _ => {
            return Err(TreeSitterError::UnknownExtension {
                path: path.to_path_buf(),
            })
        }
    };
    Ok(lang)
}

/// Whether `path` has an extension belonging to `lang`.
pub fn path_matches_language(path: &Path, lang: SupportLang) -> bool {
    language_for_path(path).is_ok_and(|found| found == lang)
}
