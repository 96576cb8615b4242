//! End-to-end resolution passes over schemas on disk

use stackup::paths;
use stackup::resolve::Overrides;
use stackup::{
    EnvStore, MapEnv, NoPrompt, Parameter, Prompter, ResolveError, Resolver, Schema, Source,
    TerminalPrompter,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn stack(content: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let path = paths::stack::schema_path(tmp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    tmp
}

/// Panics if asked; proves a pass never reached the prompter.
struct Unreachable;

impl Prompter for Unreachable {
    fn prompt(&mut self, p: &Parameter) -> anyhow::Result<String> {
        panic!("prompted for {}", p.key)
    }
}

#[test]
fn test_fully_bound_environment_is_a_no_op() {
    let tmp = stack(
        "parameters:\n  - key: A\n    required: true\n  - key: B\n    default: ~/b\n",
    );
    let schema = Schema::open(tmp.path()).unwrap();
    let before: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();

    for interactive in [false, true] {
        let mut env = before.clone();
        let res = Resolver::new(&schema)
            .interactive(interactive)
            .resolve(&mut env, &mut Unreachable)
            .unwrap();
        assert_eq!(env, before);
        assert_eq!(res.count(Source::Environment), 2);
    }
}

#[test]
fn test_interactive_pass_needs_no_terminal_when_bound() {
    let tmp = stack("parameters:\n  - key: A\n    required: true\n  - key: B\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let before: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
    let mut env = before.clone();

    // Would fail on its first prompt without a terminal on stdin.
    let mut prompter = TerminalPrompter::stdio();
    let res = Resolver::new(&schema)
        .interactive(true)
        .resolve(&mut env, &mut prompter)
        .unwrap();

    assert_eq!(env, before);
    assert_eq!(res.count(Source::Environment), 2);
}

#[test]
fn test_second_pass_is_a_no_op() {
    let tmp = stack("parameters:\n  - key: DIR\n    default: data\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    let after_first = env.clone();
    let res = Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();

    assert_eq!(env, after_first);
    assert_eq!(res.source_of("DIR"), Some(Source::Environment));
}

#[test]
fn test_environment_value_wins_over_default() {
    let tmp = stack("parameters:\n  - key: OUT\n    default: /tmp/default\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env: MapEnv = [("OUT", "/srv/existing")].into_iter().collect();

    Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    assert_eq!(env.get("OUT").as_deref(), Some("/srv/existing"));
}

#[test]
fn test_required_without_default_fails() {
    let tmp = stack("parameters:\n  - title: API token\n    key: TOKEN\n    required: true\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    let err = Resolver::new(&schema)
        .resolve(&mut env, &mut NoPrompt)
        .unwrap_err();
    match &err {
        ResolveError::MissingRequired { title, key } => {
            assert_eq!(title, "API token");
            assert_eq!(key, "TOKEN");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("API token"));
    assert!(env.get("TOKEN").is_none());
}

#[test]
fn test_optional_without_default_is_skipped() {
    let tmp = stack("parameters:\n  - title: Notes\n    key: NOTES\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    let res = Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    assert_eq!(res.source_of("NOTES"), Some(Source::Skipped));
    assert!(env.is_empty());
}

#[test]
fn test_default_expands_home() {
    let tmp = stack("parameters:\n  - key: CACHE\n    default: ~/.cache/x\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    let res = Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    let home = dirs::home_dir().expect("tests need a home directory");
    assert_eq!(
        PathBuf::from(env.get("CACHE").unwrap()),
        home.join(".cache/x")
    );
    assert!(Path::new(&env.get("CACHE").unwrap()).is_absolute());
    assert_eq!(res.source_of("CACHE"), Some(Source::Default));
}

#[test]
fn test_relative_default_is_made_absolute() {
    let tmp = stack("parameters:\n  - key: DATA\n    default: ./data/../out\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(PathBuf::from(env.get("DATA").unwrap()), cwd.join("out"));
}

// Duplicate keys are not validated. The later declaration sees the value
// bound by the earlier one and keeps it.
#[test]
fn test_duplicate_key_observes_earlier_binding() {
    let tmp = stack(
        "parameters:\n  - key: DUP\n    default: /first\n  - key: DUP\n    default: /second\n",
    );
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env = MapEnv::new();

    let res = Resolver::new(&schema).resolve(&mut env, &mut NoPrompt).unwrap();
    assert_eq!(env.get("DUP").as_deref(), Some("/first"));
    assert_eq!(
        res.entries(),
        &[
            ("DUP".to_string(), Source::Default),
            ("DUP".to_string(), Source::Environment)
        ]
    );
}

#[test]
fn test_interactive_prompts_in_declaration_order() {
    struct Recorder(Vec<String>);

    impl Prompter for Recorder {
        fn prompt(&mut self, p: &Parameter) -> anyhow::Result<String> {
            self.0.push(p.key.clone());
            Ok(format!("{}-value", p.key.to_lowercase()))
        }
    }

    let tmp = stack("parameters:\n  - key: Z\n  - key: A\n  - key: M\n");
    let schema = Schema::open(tmp.path()).unwrap();
    let mut env: MapEnv = [("A", "preset")].into_iter().collect();
    let mut recorder = Recorder(Vec::new());

    Resolver::new(&schema)
        .interactive(true)
        .resolve(&mut env, &mut recorder)
        .unwrap();

    assert_eq!(recorder.0, vec!["Z", "M"]);
    assert_eq!(env.get("Z").as_deref(), Some("z-value"));
    assert_eq!(env.get("A").as_deref(), Some("preset"));
}
