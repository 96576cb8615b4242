//! Loading stack schemas from disk

use stackup::paths;
use stackup::{Schema, SchemaError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_schema(root: &Path, content: &str) {
    let path = paths::stack::schema_path(root);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_missing_schema_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = Schema::open(tmp.path()).unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, SchemaError::NotFound { .. }));
    assert!(err.to_string().contains("no schema declared"));
}

#[test]
fn test_malformed_schema_is_syntax_error() {
    let tmp = TempDir::new().unwrap();
    write_schema(tmp.path(), "parameters: [\n  - key: A\n");

    let err = Schema::open(tmp.path()).unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, SchemaError::Syntax { .. }));
}

#[test]
fn test_wrong_shape_is_syntax_error() {
    let tmp = TempDir::new().unwrap();
    write_schema(tmp.path(), "parameters: just-a-string\n");

    let err = Schema::open(tmp.path()).unwrap_err();
    assert!(matches!(err, SchemaError::Syntax { .. }));
}

#[test]
fn test_reload_replaces_parameters() {
    let tmp = TempDir::new().unwrap();
    write_schema(tmp.path(), "parameters:\n  - key: A\n");

    let schema = Schema::new(tmp.path()).load().unwrap();
    assert_eq!(schema.parameters().len(), 1);

    write_schema(tmp.path(), "parameters:\n  - key: A\n  - key: B\n");
    let schema = schema.load().unwrap();
    let keys: Vec<_> = schema.parameters().iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["A", "B"]);

    // A failed reload hands back only the error.
    write_schema(tmp.path(), "parameters: [oops\n");
    let err = schema.load().unwrap_err();
    assert!(matches!(err, SchemaError::Syntax { .. }));
}

#[test]
fn test_loads_in_declaration_order() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        r#"
parameters:
  - title: Application name
    key: APP_NAME
    required: true
  - title: Work directory
    key: WORK_DIR
    default: ~/.cache/work
  - title: Notes
    key: NOTES
"#,
    );

    let schema = Schema::open(tmp.path()).unwrap();
    let keys: Vec<&str> = schema.parameters().iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["APP_NAME", "WORK_DIR", "NOTES"]);
    assert_eq!(schema.directory(), tmp.path());
    assert!(schema.declares("WORK_DIR"));
    assert!(!schema.declares("OTHER"));
    assert!(schema.duplicate_keys().is_empty());
}

#[test]
fn test_duplicate_keys_are_reported_not_rejected() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        "parameters:\n  - key: A\n  - key: B\n  - key: A\n",
    );

    let schema = Schema::open(tmp.path()).unwrap();
    assert_eq!(schema.parameters().len(), 3);
    assert_eq!(schema.duplicate_keys(), vec!["A"]);
}
