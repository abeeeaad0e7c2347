//! Thread-local compilation cache for path queries and ast-grep patterns.
//!
//! Batch extraction runs the same handful of queries against many files.
//! Each cache is capped at 256 entries and cleared when the cap is reached.

use crate::query::errors::QueryError;
use crate::query::path::PathQuery;
use ast_grep_core::Pattern;
use ast_grep_language::SupportLang;
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    static QUERY_CACHE: RefCell<HashMap<String, PathQuery>> =
        RefCell::new(HashMap::new());

    // Key is "<lang_debug>:<pattern_str>": the same pattern text parses
    // differently per grammar.
    static PATTERN_CACHE: RefCell<HashMap<String, Pattern>> =
        RefCell::new(HashMap::new());
}

/// Get a compiled path query from cache, or compile and cache it.
///
/// Syntax errors are not cached.
pub fn compiled(query: &str) -> Result<PathQuery, QueryError> {
    QUERY_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();

        if let Some(q) = cache.get(query) {
            return Ok(q.clone());
        }

        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }

        let compiled = PathQuery::compile(query)?;
        cache.insert(query.to_string(), compiled.clone());
        Ok(compiled)
    })
}

/// Get a compiled ast-grep pattern from cache, or compile and cache it.
pub fn get_or_compile_pattern(pattern_str: &str, lang: SupportLang) -> Result<Pattern, QueryError> {
    let cache_key = format!("{lang:?}:{pattern_str}");

    PATTERN_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();

        if let Some(p) = cache.get(&cache_key) {
            return Ok(p.clone());
        }

        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }

        let compiled =
            Pattern::try_new(pattern_str, lang).map_err(|e| QueryError::InvalidPattern {
                message: e.to_string(),
            })?;
        cache.insert(cache_key, compiled.clone());
        Ok(compiled)
    })
}

/// Clear both caches (mainly for testing).
pub fn clear_cache() {
    QUERY_CACHE.with(|cache| cache.borrow_mut().clear());
    PATTERN_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Number of cached entries across both caches.
pub fn cache_size() -> usize {
    QUERY_CACHE.with(|cache| cache.borrow().len()) + PATTERN_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_queries_hit_cache() {
        clear_cache();
        let first = compiled("//function_definition").unwrap();
        let second = compiled("//function_definition").unwrap();
        assert_eq!(first, second);
        assert_eq!(cache_size(), 1);
    }

    #[test]
    fn syntax_errors_are_not_cached() {
        clear_cache();
        assert!(compiled("//[").is_err());
        assert_eq!(cache_size(), 0);
    }

    #[test]
    fn cache_is_cleared_at_capacity() {
        clear_cache();
        for i in 0..MAX_CACHE_ENTRIES {
            compiled(&format!("//n{i}")).unwrap();
        }
        assert_eq!(cache_size(), MAX_CACHE_ENTRIES);
        compiled("//overflow").unwrap();
        assert_eq!(cache_size(), 1);
    }

    #[test]
    fn patterns_are_keyed_by_language() {
        clear_cache();
        get_or_compile_pattern("print($X)", SupportLang::Python).unwrap();
        get_or_compile_pattern("print($X)", SupportLang::JavaScript).unwrap();
        get_or_compile_pattern("print($X)", SupportLang::Python).unwrap();
        assert_eq!(cache_size(), 2);
    }
}
