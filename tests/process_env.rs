//! Binding into the real process environment
//!
//! Kept to a single test: this binary is the only one that writes the
//! process environment, and one test means no other thread reads it
//! mid-write.

use stackup::paths;
use stackup::resolve::Overrides;
use stackup::{EnvStore, NoPrompt, ProcessEnv, ResolveError, Resolver, Schema, Source};
use std::fs;
use tempfile::TempDir;

fn stack(content: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let path = paths::stack::schema_path(tmp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    tmp
}

#[test]
fn test_process_environment_bindings() {
    let mut env = ProcessEnv;

    // Plain write and read back
    env.set("STACKUP_PE_ROUND_TRIP", "value").unwrap();
    assert_eq!(std::env::var("STACKUP_PE_ROUND_TRIP").unwrap(), "value");
    assert!(env.is_set("STACKUP_PE_ROUND_TRIP"));

    // A pass stops at the first failure and keeps what it bound before it
    let tmp = stack(
        r#"
parameters:
  - title: First
    key: STACKUP_PE_FIRST_BOUND
    default: /opt/first
  - title: Second
    key: STACKUP_PE_SECOND_MISSING
    required: true
  - title: Third
    key: STACKUP_PE_THIRD_MISSING
    required: true
"#,
    );
    let schema = Schema::open(tmp.path()).unwrap();
    let err = Resolver::new(&schema)
        .resolve(&mut env, &mut NoPrompt)
        .unwrap_err();
    match err {
        ResolveError::MissingRequired { title, .. } => assert_eq!(title, "Second"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        std::env::var("STACKUP_PE_FIRST_BOUND").unwrap(),
        "/opt/first"
    );
    assert!(std::env::var("STACKUP_PE_SECOND_MISSING").is_err());
    assert!(std::env::var("STACKUP_PE_THIRD_MISSING").is_err());

    // Overrides, declared or not, reach the environment
    let tmp = stack("parameters:\n  - key: STACKUP_PE_OVERRIDDEN\n    required: true\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let overrides: Overrides = [
        ("STACKUP_PE_OVERRIDDEN".to_string(), "from-set".to_string()),
        ("STACKUP_PE_UNDECLARED".to_string(), "extra".to_string()),
    ]
    .into();
    let resolver = Resolver::new(&schema).overrides(overrides);

    let res = resolver.resolve(&mut env, &mut NoPrompt).unwrap();
    resolver.apply_extra_overrides(&mut env).unwrap();

    assert_eq!(res.source_of("STACKUP_PE_OVERRIDDEN"), Some(Source::Override));
    assert_eq!(std::env::var("STACKUP_PE_OVERRIDDEN").unwrap(), "from-set");
    assert_eq!(std::env::var("STACKUP_PE_UNDECLARED").unwrap(), "extra");
}
