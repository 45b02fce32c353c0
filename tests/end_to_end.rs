// tests/end_to_end.rs

mod common;
use crate::common::{init_tracing, json, write_file};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use scanlink::config::load_and_validate;
use scanlink::errors::ScanlinkError;
use scanlink::orchestrator::{RunState, UNKNOWN_VERSION_ADVISORY};
use scanlink::{dry_run_report, run_from_config};
use scanlink::session::ExtensionConvention;
use tempfile::tempdir;

const APP_GRAPH: &str = r#"{
  "nodes": [
    { "id": "app", "group": "com.acme", "artifact": "app", "version": "1.0" },
    { "id": "io", "parent": "app", "group": "commons-io", "artifact": "commons-io",
      "version": "2.4", "scope": "compile" },
    { "id": "lang", "parent": "io", "group": "commons-lang", "artifact": "commons-lang",
      "version": "2.6", "scope": "compile" },
    { "id": "junit", "parent": "app", "group": "junit", "artifact": "junit",
      "version": "3.8.1", "scope": "test" }
  ]
}"#;

const CORE_GRAPH: &str = r#"{
  "nodes": [
    { "id": "core", "group": "com.acme", "artifact": "core", "version": "1.0" },
    { "id": "xfire", "parent": "core", "group": "org.codehaus.xfire", "artifact": "xfire-core",
      "version": "1.2.6", "scope": "compile" },
    { "id": "activation", "parent": "xfire", "group": "javax.activation", "artifact": "activation",
      "version": "1.1.1", "scope": "system" }
  ]
}"#;

const APP_DEPENDENCIES: &str = r#"[{"k":"commons-io:commons-io","v":"2.4","s":"compile","d":[{"k":"commons-lang:commons-lang","v":"2.6","s":"compile","d":[]}]},{"k":"junit:junit","v":"3.8.1","s":"test","d":[]}]"#;

fn config(server_version: Option<&str>, extra_scanner: &str) -> String {
    let session = match server_version {
        Some(v) => format!("server_version = \"{v}\"\n"),
        None => String::new(),
    };
    format!(
        r#"
[scanner]
masked_keys = ["sonar.login"]
{extra_scanner}

[session]
{session}dump_file = "target/dump.properties"

[project]
group = "com.acme"
artifact = "app"
version = "1.0"
name = "Acme App"
graph = "deps/app.json"

[project.properties]
"sonar.login" = "admin"

[module.core]
group = "com.acme"
artifact = "core"
version = "1.0"
graph = "deps/core.json"
"#
    )
}

fn workspace(dir: &Path, toml: &str) {
    write_file(dir, "deps/app.json", APP_GRAPH);
    write_file(dir, "deps/core.json", CORE_GRAPH);
    write_file(dir, "Scanlink.toml", toml);
}

fn read_dump(dir: &Path) -> BTreeMap<String, String> {
    fs::read_to_string(dir.join("target/dump.properties"))
        .unwrap()
        .lines()
        .map(|line| {
            let (k, v) = line.split_once('=').expect("key=value line");
            (k.to_string(), v.to_string())
        })
        .collect()
}

#[test]
fn dumps_dependency_trees_and_project_properties() {
    init_tracing();
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("5.1"), ""));
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    let report = run_from_config(&cfg, dir.path(), false)
        .unwrap()
        .expect("analysis not skipped");

    assert_eq!(report.state, RunState::Stopped);
    assert_eq!(report.extension_convention, Some(ExtensionConvention::Current));
    assert_eq!(report.extensions_registered, 4);
    assert_eq!(report.masked_keys, vec!["sonar.login"]);

    let dump = read_dump(dir.path());
    assert_eq!(dump["sonar.maven.projectDependencies"], APP_DEPENDENCIES);
    assert_eq!(
        json(&dump["core.sonar.maven.projectDependencies"]),
        json(
            r#"[{"k":"org.codehaus.xfire:xfire-core","v":"1.2.6","s":"compile","d":[
                {"k":"javax.activation:activation","v":"1.1.1","s":"system","d":[]}]}]"#
        )
    );
    assert_eq!(dump["sonar.projectKey"], "com.acme:app");
    assert_eq!(dump["sonar.projectName"], "Acme App");
    assert_eq!(dump["sonar.projectVersion"], "1.0");
    assert_eq!(dump["sonar.modules"], "core");
    assert_eq!(dump["core.sonar.projectKey"], "com.acme:core");
    assert_eq!(dump["sonar.login"], "******");
}

#[test]
fn excluded_scopes_shrink_the_tree() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("6.0"), ""));
    let mut cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();
    cfg.dependencies.exclude_scopes = vec!["test".to_string()];

    let report = run_from_config(&cfg, dir.path(), false).unwrap().unwrap();

    assert_eq!(report.extension_convention, None);
    let dump = read_dump(dir.path());
    let deps = json(&dump["sonar.maven.projectDependencies"]);
    assert_eq!(deps.as_array().unwrap().len(), 1);
    assert_eq!(deps[0]["k"], "commons-io:commons-io");
}

#[test]
fn verbose_adds_property() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("6.0"), "verbose = true"));
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    run_from_config(&cfg, dir.path(), false).unwrap();

    assert_eq!(read_dump(dir.path())["sonar.verbose"], "true");
}

#[test]
fn unknown_server_version_uses_legacy_convention_with_advisory() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(None, ""));
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    let report = run_from_config(&cfg, dir.path(), false).unwrap().unwrap();

    assert_eq!(report.extension_convention, Some(ExtensionConvention::Legacy));
    assert_eq!(report.advisories, vec![UNKNOWN_VERSION_ADVISORY.to_string()]);
}

#[test]
fn skip_does_not_touch_the_session() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("5.1"), "skip = true"));
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    let report = run_from_config(&cfg, dir.path(), cfg.scanner.skip).unwrap();

    assert!(report.is_none());
    assert!(!dir.path().join("target/dump.properties").exists());
}

#[test]
fn broken_graph_file_fails_before_any_dump() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("5.1"), ""));
    write_file(dir.path(), "deps/core.json", "{ \"nodes\": [] }");
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    let err = run_from_config(&cfg, dir.path(), false).unwrap_err();

    match err {
        ScanlinkError::GraphBuild { project, .. } => assert_eq!(project, "com.acme:core:1.0"),
        other => panic!("expected graph build failure, got {other:?}"),
    }
    assert!(!dir.path().join("target/dump.properties").exists());
}

#[test]
fn dry_run_prints_trees_and_encoded_json_without_a_session() {
    let dir = tempdir().unwrap();
    workspace(dir.path(), &config(Some("5.1"), ""));
    let cfg = load_and_validate(dir.path().join("Scanlink.toml")).unwrap();

    let report = dry_run_report(&cfg, dir.path()).unwrap();

    assert!(report.contains(&format!("  json: {APP_DEPENDENCIES}")), "{report}");
    assert!(report.contains("- commons-io:commons-io:2.4 (compile)"), "{report}");
    assert!(report.contains("com.acme:core:1.0 [core]"), "{report}");
    assert!(report.contains("sonar.login=******"), "{report}");
    assert!(!report.contains("=admin"), "{report}");
    assert!(!dir.path().join("target/dump.properties").exists());
}
