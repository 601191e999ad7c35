//! `bemaker build` end to end

use predicates::prelude::*;

use crate::common::TestProject;

/// `page` needs `header` and `button`, `header` needs `button`; desktop extends `button`
fn site() -> TestProject {
    TestProject::new()
        .with_block("common", "page", &["header", "button"])
        .with_block("common", "header", &["button"])
        .with_block("common", "button", &[])
        .with_file("desktop/button/button.css", ".button_desktop{}\n")
}

#[test]
fn test_build_from_project_file() {
    let project = site().with_project_file(
        r#"
levels = ["common", "desktop"]
outdir = "dist"
"#,
    );

    project
        .bemaker()
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ dist/index.css"))
        .stdout(predicate::str::contains("✓ dist/index.js"))
        .stdout(predicate::str::contains("Built 2 artifact(s) from 3 block(s)"));

    assert_eq!(
        project.read("dist/index.css"),
        ".button{}\n.button_desktop{}\n.header{}\n.page{}\n"
    );

    let js = project.read("dist/index.js");
    let button = js.find("button();").unwrap();
    let header = js.find("header();").unwrap();
    let page = js.find("page();").unwrap();
    assert!(button < header && header < page, "unexpected order:\n{js}");
}

#[test]
fn test_build_with_flags_only() {
    let project = site();

    project
        .bemaker()
        .args(["build", "-l", "common", "-o", "out", "--ext", "css"])
        .assert()
        .success();

    assert_eq!(project.read("out/index.css"), ".button{}\n.header{}\n.page{}\n");
    assert!(!project.join("out/index.js").exists());
}

#[test]
fn test_build_selected_block() {
    let project = site();

    project
        .bemaker()
        .args(["build", "-l", "common", "-l", "desktop", "--block", "header", "--outname", "header"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from 2 block(s)"));

    assert_eq!(project.read("header.css"), ".button{}\n.button_desktop{}\n.header{}\n");
}

#[test]
fn test_build_with_hooks() {
    let project = site().with_project_file(
        r#"
levels = ["common"]
outdir = "dist"
extensions = ["css"]

[hooks]
before = "/* {relative} ({index}/{total}) */\n"
"#,
    );

    project.bemaker().arg("build").assert().success();

    let css = project.read("dist/index.css");
    assert!(css.starts_with("/* common/button/button.css (0/3) */\n.button{}\n"), "got:\n{css}");
    assert!(css.contains("/* common/page/page.css (2/3) */\n.page{}\n"));
}

#[test]
fn test_hook_paths_are_relative_to_working_directory() {
    let project = TestProject::new()
        .with_block("site/common", "button", &[])
        .with_file(
            "site/bemaker.toml",
            r#"
levels = ["common"]
outdir = "dist"
extensions = ["css"]

[hooks]
before = "/* {relative} */\n"
"#,
        );

    project.bemaker().args(["-c", "site/bemaker.toml", "build"]).assert().success();

    let css = project.read("site/dist/index.css");
    assert!(css.starts_with("/* site/common/button/button.css */\n"), "got:\n{css}");
}

#[test]
fn test_build_custom_tag_and_deps_extension() {
    let project = TestProject::new()
        .with_file("common/a/a.ts", "/** @requires b */\n")
        .with_file("common/a/a.css", "A")
        .with_file("common/b/b.css", "B");

    project
        .bemaker()
        .args(["build", "-l", "common", "--tag", "requires", "--deps-ext", "ts", "--ext", "css"])
        .assert()
        .success();

    assert_eq!(project.read("index.css"), "BA");
}

#[test]
fn test_dry_run_lists_groups_without_writing() {
    let project = site().with_project_file("levels = [\"common\"]\noutdir = \"dist\"\n");

    project
        .bemaker()
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dist/index.css (3 file(s))"))
        .stdout(predicate::str::contains("common/page/page.js"));

    assert!(!project.join("dist").exists());
}

#[test]
fn test_quiet_build_prints_nothing() {
    let project = site();

    project
        .bemaker()
        .args(["-q", "build", "-l", "common"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(project.join("index.css").is_file());
}
