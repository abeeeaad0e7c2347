//! Integration tests for extraction plans loaded from disk.

use astpath::config::{load_from_path, run_plan, ConfigError, RunError, ValidationIssue};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn plan_spanning_languages_and_files() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "py/app.py",
        "def handler(event):\n    return event\n",
    );
    write(
        &dir,
        "rs/lib.rs",
        "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n\npub fn sub(a: i32, b: i32) -> i32 {\n    a - b\n}\n",
    );
    let plan = write(
        &dir,
        "plan.toml",
        r#"
[meta]
name = "mixed"
root_relative = true

[[targets]]
id = "py-handler"
file = "py/app.py"
query = "//function_definition"

[[targets]]
id = "rs-add"
file = "rs/lib.rs"
language = "rust"
query = "//function_item[name/identifier/value='add']"

[[targets]]
id = "rs-sub-pattern"
file = "rs/lib.rs"
language = "rust"
kind = "pattern"
query = "pub fn sub($$$P) -> i32 { $$$B }"
"#,
    );

    let plan = load_from_path(&plan).unwrap();
    assert_eq!(plan.base_dir(), dir.path());
    let results = run_plan(&plan);
    let ids: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["py-handler", "rs-add", "rs-sub-pattern"]);

    let handler = results[0].1.as_ref().unwrap();
    assert_eq!(handler.extractions[0].text, "def handler(event):\n    return event");

    let add = results[1].1.as_ref().unwrap();
    assert_eq!(add.extractions.len(), 1);
    assert_eq!(
        add.extractions[0].text,
        "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}"
    );

    let sub = results[2].1.as_ref().unwrap();
    assert_eq!(sub.extractions[0].start_line, 5);
    assert!(sub.extractions[0].text.ends_with("a - b\n}"));
}

#[test]
fn plan_without_root_relative_uses_paths_as_written() {
    let dir = TempDir::new().unwrap();
    let source = write(&dir, "abs.py", "x = 1\n");
    let plan = write(
        &dir,
        "plan.toml",
        &format!(
            "[[targets]]\nid = \"abs\"\nfile = {:?}\nquery = \"//assignment\"\n",
            source.to_string_lossy()
        ),
    );

    let plan = load_from_path(&plan).unwrap().with_base_dir("/nonexistent");
    let results = run_plan(&plan);
    let found = results[0].1.as_ref().unwrap();
    assert_eq!(found.extractions[0].text, "x = 1");
}

#[test]
fn invalid_plan_lists_every_issue() {
    let dir = TempDir::new().unwrap();
    let plan = write(
        &dir,
        "plan.toml",
        r#"
[meta]
language = "klingon"

[[targets]]
id = "a"
file = "a.py"
query = "//call[@"

[[targets]]
id = "a"
file = "a.py"
query = "//call"
"#,
    );

    let err = load_from_path(&plan).unwrap_err();
    let ConfigError::Validation { path, source } = err else {
        panic!("expected a validation error");
    };
    assert_eq!(path.as_deref(), Some(plan.as_path()));
    assert!(source
        .issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::UnknownLanguage { name, .. } if name == "klingon")));
    assert!(source
        .issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::InvalidQuery { field: "query", .. })));
    assert!(source
        .issues
        .contains(&ValidationIssue::DuplicateId { id: "a".into() }));
}

#[test]
fn inverted_boundary_fails_only_that_target() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "app.py",
        "def first():\n    pass\n\ndef second():\n    pass\n",
    );
    let plan = write(
        &dir,
        "plan.toml",
        r#"
[meta]
root_relative = true

[[targets]]
id = "inverted"
file = "app.py"
query = "//function_definition[2]"
until = "//function_definition[1]"

[[targets]]
id = "first"
file = "app.py"
query = "//function_definition[1]"
until = "//function_definition[2]"
"#,
    );

    let plan = load_from_path(&plan).unwrap();
    assert_eq!(plan.base_dir(), dir.path());
    let results = run_plan(&plan);

    assert!(matches!(
        &results[0].1,
        Err(RunError::Extract { source, .. }) if source.to_string().contains("before the match")
    ));
    let first = results[1].1.as_ref().unwrap();
    assert_eq!(first.extractions[0].text, "def first():\n    pass\n");
}
