// tests/dump_session.rs

use std::fs;

use scanlink::project::Properties;
use scanlink::session::dump::MASKED_VALUE;
use scanlink::session::{AnalysisSession, DumpSession, Extension, ExtensionConvention};
use tempfile::tempdir;

fn properties(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn writes_sorted_properties_with_masked_values() {
    let dir = tempdir().unwrap();
    let dump = dir.path().join("nested/out/dump.properties");
    let mut session = DumpSession::new(&dump, Some("5.1".to_string()));

    session.mask("sonar.login").unwrap();
    session.start().unwrap();
    assert_eq!(session.server_version().unwrap().as_deref(), Some("5.1"));
    session
        .run_analysis(&properties(&[
            ("sonar.projectKey", "com.acme:app"),
            ("sonar.login", "admin"),
            ("a.first", "1"),
        ]))
        .unwrap();
    session.unmask("sonar.login").unwrap();
    session.stop().unwrap();

    let contents = fs::read_to_string(&dump).unwrap();
    assert_eq!(
        contents,
        format!("a.first=1\nsonar.login={MASKED_VALUE}\nsonar.projectKey=com.acme:app\n")
    );
    assert_eq!(session.masked_keys().count(), 0);
    assert!(!session.is_started());
}

#[test]
fn operations_require_a_started_session() {
    let dir = tempdir().unwrap();
    let mut session = DumpSession::new(dir.path().join("dump.properties"), None);

    assert!(session.server_version().is_err());
    assert!(session.run_analysis(&Properties::new()).is_err());
    assert!(session
        .add_extensions(vec![Extension::new("log")], ExtensionConvention::Legacy)
        .is_err());
    assert!(session.stop().is_err());
    assert!(!session.dump_file().exists());
}

#[test]
fn start_twice_is_rejected() {
    let dir = tempdir().unwrap();
    let mut session = DumpSession::new(dir.path().join("dump.properties"), None);

    session.start().unwrap();
    assert!(session.start().is_err());
}

#[test]
fn records_extensions_with_their_convention() {
    let dir = tempdir().unwrap();
    let mut session = DumpSession::new(dir.path().join("dump.properties"), Some("4.8".into()));

    session.start().unwrap();
    session
        .add_extensions(
            vec![Extension::new("log"), Extension::new("project-builder")],
            ExtensionConvention::Current,
        )
        .unwrap();

    let names: Vec<String> = session
        .extensions()
        .iter()
        .map(|(ext, convention)| format!("{ext}/{convention:?}"))
        .collect();
    assert_eq!(names, vec!["log/Current", "project-builder/Current"]);
}

#[test]
fn unknown_version_is_reported_as_absent() {
    let dir = tempdir().unwrap();
    let mut session = DumpSession::new(dir.path().join("dump.properties"), None);

    session.start().unwrap();
    assert_eq!(session.server_version().unwrap(), None);
}
