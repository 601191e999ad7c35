//! `bemaker list`

use predicates::prelude::*;

use crate::common::TestProject;

fn project() -> TestProject {
    TestProject::new()
        .with_block("common", "page", &["button"])
        .with_block("common", "button", &[])
        .with_block("desktop", "button", &[])
        .with_project_file("levels = [\"common\", \"desktop\"]\n")
}

#[test]
fn test_list_text() {
    project()
        .bemaker()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. button"))
        .stdout(predicate::str::contains("2. page"))
        .stdout(predicate::str::contains("requires: button"))
        .stdout(predicate::str::contains("desktop (2 file(s))"));
}

#[test]
fn test_list_json() {
    let project = project();
    let assert = project.bemaker().args(["list", "--format", "json"]).assert().success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let names: Vec<&str> =
        value["blocks"].as_array().unwrap().iter().map(|block| block["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["button", "page"]);
    assert_eq!(value["blocks"][0]["levels"].as_array().unwrap().len(), 2);
    assert_eq!(value["blocks"][1]["levels"][0]["files"][0]["basename"], "page.css");
}

#[test]
fn test_list_json_reports_cycles() {
    let project = TestProject::new()
        .with_block("common", "a", &["b"])
        .with_block("common", "b", &["a"]);

    let assert = project.bemaker().args(["list", "-l", "common", "-f", "json"]).assert().success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["cycles"], serde_json::json!([["a", "b", "a"]]));
}

#[test]
fn test_list_selected_blocks() {
    project()
        .bemaker()
        .args(["list", "--block", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("button"))
        .stdout(predicate::str::contains("page").not());
}
