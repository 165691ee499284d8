use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Runs the binary end to end and checks the summary line.
#[test]
fn test_extracts_tree_and_reports_counts() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("vue.mdx"),
        "export const meta = { title: 'Vue', platforms: ['vue'] };\n\nVue page.",
    )
    .unwrap();
    fs::write(
        src.join("swift.mdx"),
        "export const meta = { title: 'Swift', platforms: ['swift'] };\n\nSwift page.",
    )
    .unwrap();

    Command::cargo_bin("docs2md")
        .unwrap()
        .arg(&src)
        .arg(&out)
        .arg("vue")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Extracted 1 documents for vue (1 skipped for platform, 0 with empty content)",
        ));

    assert_eq!(
        fs::read_to_string(out.join("vue.md")).unwrap(),
        "# Vue\n\nVue page."
    );
    assert!(!out.join("swift.md").exists());
    assert!(out.join("README.md").exists());
}

/// The platform argument is optional.
#[test]
fn test_default_platform() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("page.mdx"),
        "export const meta = { title: 'Page', platforms: ['react'] };\n\nReact page.",
    )
    .unwrap();

    Command::cargo_bin("docs2md")
        .unwrap()
        .arg(&src)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("for react"));

    assert!(out.join("page.md").exists());
}

#[test]
fn test_missing_output_prints_usage() {
    let temp_dir = tempdir().unwrap();

    Command::cargo_bin("docs2md")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_source_is_rejected() {
    let temp_dir = tempdir().unwrap();

    Command::cargo_bin("docs2md")
        .unwrap()
        .arg(temp_dir.path().join("missing"))
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory does not exist"));

    assert!(!temp_dir.path().join("out").exists());
}
