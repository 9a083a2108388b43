//! End-to-end tests that drive the compiled binary against the fixture
//! workspace in `tests/fixtures/basic`.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/basic")
}

fn yamlnav(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yamlnav"))
        .current_dir(fixture_root())
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn list_reports_every_reference_in_the_pipeline() {
    let output = yamlnav(&["list", "azure-pipelines.yml"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("templates/build.yml"), "got: {text}");
    assert!(text.contains("/cicd/common/setup.yml"), "got: {text}");
    assert!(text.contains("infra"), "got: {text}");
}

#[test]
fn list_json_emits_a_reference_array() {
    let output = yamlnav(&["list", "azure-pipelines.yml", "--json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let references = parsed.as_array().unwrap();
    assert_eq!(references.len(), 3);
    assert_eq!(references[0]["kind"], "template");
}

#[test]
fn resolve_prints_the_resolved_target_for_a_relative_reference() {
    let output = yamlnav(&["resolve", "azure-pipelines.yml", "9:25"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("templates/build.yml -> "), "got: {text}");
}

#[test]
fn resolve_reports_an_external_reference_without_failing() {
    let output = yamlnav(&["resolve", "azure-pipelines.yml", "13:15"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("infra"), "got: {text}");
}

#[test]
fn resolve_fails_when_the_cursor_is_not_on_a_reference() {
    let output = yamlnav(&["resolve", "azure-pipelines.yml", "1:1"]);
    assert!(!output.status.success());
}

#[test]
fn refs_finds_the_pipeline_that_uses_a_template() {
    let output = yamlnav(&["refs", "templates/build.yml"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("azure-pipelines.yml"), "got: {text}");
    assert!(text.contains("1 reference(s) in 1 file(s)"), "got: {text}");
}

#[test]
fn refs_matches_root_relative_references() {
    let output = yamlnav(&["refs", "cicd/common/setup.yml"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("azure-pipelines.yml"), "got: {text}");
}

#[test]
fn refs_fails_for_a_missing_target() {
    let output = yamlnav(&["refs", "does-not-exist.yml"]);
    assert!(!output.status.success());
}
