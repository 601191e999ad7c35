//! User-facing failures

use predicates::prelude::*;
use std::fs;

use crate::common::TestProject;

#[test]
fn test_no_levels_configured() {
    TestProject::new()
        .bemaker()
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid build configuration"))
        .stderr(predicate::str::contains("no level directories configured"));
}

#[test]
fn test_missing_level_directory() {
    TestProject::new()
        .with_block("common", "page", &[])
        .bemaker()
        .args(["build", "-l", "common", "-l", "touch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Level directory not found"))
        .stderr(predicate::str::contains("touch"));
}

#[test]
fn test_missing_explicit_project_file() {
    TestProject::new()
        .bemaker()
        .args(["--config", "site.toml", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project file not found"));
}

#[test]
fn test_invalid_project_file() {
    let project = TestProject::new().with_project_file("levels = [\"common\"\n");

    project
        .bemaker()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project file"));
}

#[test]
fn test_unknown_project_field() {
    let project = TestProject::new()
        .with_block("common", "page", &[])
        .with_project_file("levels = [\"common\"]\nout_dir = \"dist\"\n");

    project
        .bemaker()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project file"))
        .stderr(predicate::str::contains("out_dir"));
}

#[test]
fn test_partial_build_keeps_successful_artifacts() {
    let project = TestProject::new().with_block("common", "page", &[]);
    fs::create_dir_all(project.join("dist/index.css")).unwrap();

    project
        .bemaker()
        .args(["build", "-l", "common", "-o", "dist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build finished with 1 failed artifact(s)"))
        .stderr(predicate::str::contains("index.css"));

    assert!(project.read("dist/index.js").contains("page();"));
}
