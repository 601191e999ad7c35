//! Cycles and missing dependencies are reported, never fatal

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_cycle_is_reported_and_build_completes() {
    let project = TestProject::new()
        .with_block("common", "a", &["b"])
        .with_block("common", "b", &["a"]);

    project
        .bemaker()
        .args(["build", "-l", "common", "--ext", "css"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Circular dependency: a → b → a"));

    assert_eq!(project.read("index.css"), ".b{}\n.a{}\n");
}

#[test]
fn test_missing_dependency_is_reported_once() {
    let project = TestProject::new()
        .with_block("common", "page", &["ghost"])
        .with_block("common", "menu", &["ghost"]);

    let assert = project
        .bemaker()
        .args(["build", "-l", "common"])
        .assert()
        .success()
        .stderr(predicate::str::contains("requires missing block ghost"));

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert_eq!(stderr.matches("missing block ghost").count(), 1, "stderr:\n{stderr}");
    assert!(project.join("index.css").is_file());
}

#[test]
fn test_unknown_requested_block() {
    let project = TestProject::new().with_block("common", "page", &[]);

    project
        .bemaker()
        .args(["build", "-l", "common", "--block", "ghost"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Requested block ghost does not exist"))
        .stdout(predicate::str::contains("Built 0 artifact(s) from 0 block(s)"));
}

#[test]
fn test_quiet_hides_warnings() {
    let project = TestProject::new()
        .with_block("common", "a", &["b"])
        .with_block("common", "b", &["a"]);

    project
        .bemaker()
        .args(["--quiet", "build", "-l", "common"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Circular").not());
}
