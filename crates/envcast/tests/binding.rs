//! Constant binding, batch registration and manifests.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use envcast::prelude::*;
use envcast::{CastError, DEFAULT_MANIFEST_PATH, Validator};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn source(pairs: &[(&str, &str)]) -> Arc<dyn ValueSource> {
    Arc::new(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>(),
    )
}

#[test]
fn registers_global_and_namespaced_constants() {
    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry);

    let abc = binder
        .register("ABC", Registration::new("integer").from(source(&[("ABC", "123")])))
        .unwrap();
    assert_eq!(abc, Value::Integer(123));
    assert_eq!(binder.constants().get("ABC"), Some(&Value::Integer(123)));

    binder
        .register(
            "XYZ",
            Registration::new("integer")
                .from(source(&[("XYZ", "456")]))
                .within("Sample"),
        )
        .unwrap();
    let sample = binder.constants().namespace("Sample").unwrap();
    assert_eq!(sample.get("XYZ"), Some(&Value::Integer(456)));
    assert_eq!(binder.constants().get("XYZ"), None);
}

#[test]
fn batch_registration_falls_back_to_overrides() {
    let registry = TypeRegistry::with_builtins();
    let vars = source(&[("FIRST", "first"), ("SECOND", "99"), ("THIRD", "third")]);
    let mut binder = Binder::new(&registry).with_source(vars);

    let entries = IndexMap::from([
        ("FIRST".to_owned(), Registration::new("string").if_unset("no first")),
        ("SECOND".to_owned(), Registration::new("integer").if_unset("no second")),
        ("THIRD".to_owned(), Registration::new("string").if_unset("no third")),
        ("FOURTH".to_owned(), Registration::new("boolean").if_unset("no fourth")),
    ]);
    let values = binder.register_all(entries, None).unwrap();

    let expected = IndexMap::from([
        ("FIRST".to_owned(), Value::from("first")),
        ("SECOND".to_owned(), Value::Integer(99)),
        ("THIRD".to_owned(), Value::from("third")),
        ("FOURTH".to_owned(), Value::from("no fourth")),
    ]);
    assert_eq!(values, expected);
    assert_eq!(binder.constants().get("FOURTH"), Some(&Value::from("no fourth")));

    let names: Vec<&str> = binder.constants().global().iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["FIRST", "SECOND", "THIRD", "FOURTH"]);
}

#[test]
fn batch_stops_at_the_first_failure() {
    let registry = TypeRegistry::with_builtins();
    let vars = source(&[("A", "1"), ("B", "not a port"), ("C", "3")]);
    let mut binder = Binder::new(&registry).with_source(vars);

    let entries = IndexMap::from([
        ("A".to_owned(), Registration::new("integer")),
        ("B".to_owned(), Registration::new("port")),
        ("C".to_owned(), Registration::new("integer")),
    ]);
    let err = binder.register_all(entries, None).unwrap_err();

    assert!(matches!(err, CastError::ValueNotConvertible { .. }));
    assert_eq!(binder.constants().get("A"), Some(&Value::Integer(1)));
    assert_eq!(binder.constants().get("B"), None);
    assert_eq!(binder.constants().get("C"), None);
}

#[test]
fn shared_validator_fails_before_any_binding() {
    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry).with_source(source(&[("A", "1")]));

    let entries = IndexMap::from([("A".to_owned(), Registration::new("integer"))]);
    let shared: Validator = Arc::new(|_| true);

    assert!(matches!(
        binder.register_all(entries, Some(shared)),
        Err(CastError::InvalidRequest { .. })
    ));
    assert!(binder.constants().global().is_empty());
}

#[test]
fn per_entry_validators_apply() {
    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry).with_source(source(&[("WORKERS", "0")]));

    let err = binder
        .register(
            "WORKERS",
            Registration::new("integer").validated_by(|v| v.as_i64().is_some_and(|n| n > 0)),
        )
        .unwrap_err();
    assert!(matches!(err, CastError::ValueNotAllowed { .. }));
}

#[test]
fn env_view_parses_and_registers_by_key() {
    let registry = TypeRegistry::with_builtins();
    let view = EnvView::new(&registry).with_source(source(&[("ABCD", "1234"), ("WXYZ", "5678")]));

    assert_eq!(
        view.parse("ABCD", "integer", &CoerceOptions::new()).unwrap(),
        Value::Integer(1234)
    );

    let mut binder = Binder::new(&registry);
    view.register(&mut binder, "ABCD", Registration::new("integer")).unwrap();
    view.register(&mut binder, "WXYZ", Registration::new("integer").within("Sample"))
        .unwrap();

    assert_eq!(binder.constants().get("ABCD"), Some(&Value::Integer(1234)));
    assert_eq!(
        binder.constants().namespace("Sample").unwrap().get("WXYZ"),
        Some(&Value::Integer(5678))
    );
}

#[test]
fn namespace_dumps_to_json() {
    let registry = TypeRegistry::with_builtins();
    let vars = source(&[("HOST", "127.0.0.1"), ("FLAGS", r#"["a","b"]"#)]);
    let mut binder = Binder::new(&registry).with_source(vars);

    binder.register("HOST", Registration::new("ipv4_address")).unwrap();
    binder.register("FLAGS", Registration::new("array")).unwrap();

    assert_eq!(
        binder.constants().global().to_json(),
        serde_json::json!({ "HOST": "127.0.0.1", "FLAGS": ["a", "b"] })
    );
}

// ============================================================================
// MANIFESTS
// ============================================================================

#[test]
fn autoregister_reads_the_manifest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_MANIFEST_PATH);
    fs::write(
        &path,
        "\
FIFTH:
  as: string
  if_unset: no fifth
SIXTH:
  as: :integer
  if_unset: no sixth
  from_set: { min: 1, max: 100 }
EIGHTH:
  as: boolean
  if_unset: no eighth
LEVEL:
  as: string
  from_set: [debug, info]
  within: App::Logging
",
    )
    .unwrap();

    let registry = TypeRegistry::with_builtins();
    let vars = source(&[("FIFTH", "fifth"), ("SIXTH", "99"), ("LEVEL", "info")]);
    let mut binder = Binder::new(&registry).with_source(vars);

    let values = binder.autoregister(Some(path.as_path())).unwrap();
    assert_eq!(values["FIFTH"], Value::from("fifth"));
    assert_eq!(values["SIXTH"], Value::Integer(99));
    assert_eq!(values["EIGHTH"], Value::from("no eighth"));

    let logging = binder.constants().namespace("App::Logging").unwrap();
    assert_eq!(logging.get("LEVEL"), Some(&Value::from("info")));
    assert_eq!(values.keys().collect::<Vec<_>>(), ["FIFTH", "SIXTH", "EIGHTH", "LEVEL"]);
}

#[test]
fn symbol_sets_from_yaml_hold_strings() {
    // YAML has no symbols, so a listed `debug` is a string and never
    // matches a symbol value.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.yml");
    fs::write(&path, "LEVEL:\n  as: symbol\n  from_set: [debug]\n").unwrap();

    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry).with_source(source(&[("LEVEL", "debug")]));
    let err = binder.autoregister(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, CastError::ValueNotAllowed { .. }));
}

#[test]
fn missing_manifest_is_reported_with_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yml");

    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry);
    let err = binder.autoregister(Some(path.as_path())).unwrap_err();

    assert_eq!(err, CastError::AutoRegisterFileNotFound { path: path.clone() });
    assert_eq!(err.to_string(), format!("file not found: \"{}\"", path.display()));
}

#[test]
fn malformed_manifest_is_unparseable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "A: { as: integer\n").unwrap();

    let registry = TypeRegistry::with_builtins();
    let mut binder = Binder::new(&registry);
    let err = binder.autoregister(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, CastError::UnparseableAutoRegisterSpec { .. }));
    assert!(err.to_string().starts_with("malformed YAML in spec file"));
    assert!(binder.constants().global().is_empty());
}
