// tests/cli_test.rs
mod common;

use assert_cmd::Command;
use common::Fixture;
use predicates::prelude::*;
use std::path::Path;
use tempfile::NamedTempFile;

/// The binary with an empty config file, so no user config leaks in
fn modtag(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("modtag").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("-c")
        .arg(config.path());
    cmd
}

fn empty_config() -> NamedTempFile {
    NamedTempFile::new().unwrap()
}

/// v1.0.0 on the first commit, then one untagged commit with `message`
fn stale_repo(message: &str) -> Fixture {
    let fixture = Fixture::new();
    let first = fixture.go_mod("", "example.com/mod");
    fixture.tag("v1.0.0", first);
    fixture.commit("a.go", "package mod\n", message);
    fixture.push();
    fixture
}

#[test]
fn test_help() {
    Command::cargo_bin("modtag")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("modtag"))
        .stdout(predicate::str::contains("--add"));
}

#[test]
fn test_json_report() {
    let fixture = Fixture::new();
    let tip = fixture.go_mod("", "example.com/mod");
    fixture.tag("v1.0.0", tip);
    fixture.push();
    let config = empty_config();

    let output = modtag(&config)
        .arg("--json")
        .arg(fixture.path())
        .arg(fixture.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["modpath"], "example.com/mod");
    assert_eq!(json["version_suffix"], "ok");
    assert_eq!(json["latest_commit_has_latest_version"], true);
    assert_eq!(json["new_version"]["minor"], 0);
}

#[test]
fn test_relative_repodir_and_moduledir() {
    let fixture = Fixture::new();
    fixture.go_mod("", "example.com/repo");
    fixture.go_mod("lib", "example.com/repo/lib");
    fixture.push();
    let config = empty_config();

    let parent = fixture.path().parent().unwrap();
    let name = Path::new(fixture.path().file_name().unwrap());

    let output = modtag(&config)
        .current_dir(parent)
        .arg("--json")
        .arg(name)
        .arg(name.join("lib"))
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["module_subdir"], "lib");
    assert_eq!(json["modpath"], "example.com/repo/lib");
}

#[test]
fn test_describe_and_status_exit_code() {
    let fixture = stale_repo("fix: handle nil");
    let config = empty_config();

    modtag(&config)
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended new version: v1.0.1"));

    modtag(&config)
        .arg("--status")
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .code(2);
}

#[test]
fn test_add_creates_tag() {
    let fixture = stale_repo("feat: add A");
    let config = empty_config();

    modtag(&config)
        .arg("--add")
        .arg("-q")
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added tag v1.1.0"));

    assert!(fixture.has_tag("v1.1.0"));
}

#[test]
fn test_major_bump_refused_exit_codes() {
    let fixture = stale_repo("feat!: drop old API");
    let config = empty_config();

    modtag(&config)
        .arg("--add")
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("v2.0.0"));

    modtag(&config)
        .arg("--add")
        .arg("--status")
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .code(6);

    assert!(!fixture.has_tag("v2.0.0"));
}

#[test]
fn test_all_with_moduledir_fails() {
    let fixture = stale_repo("fix: x");
    let config = empty_config();

    modtag(&config)
        .arg("--all")
        .arg(fixture.path())
        .arg(fixture.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--all"));
}

#[test]
fn test_all_modules_json() {
    let fixture = Fixture::new();
    fixture.go_mod("", "example.com/repo");
    fixture.go_mod("lib", "example.com/repo/lib");
    fixture.push();
    let config = empty_config();

    let output = modtag(&config)
        .arg("--all")
        .arg("--json")
        .arg(fixture.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[""]["modpath"], "example.com/repo");
    assert_eq!(json["lib"]["version_prefix"], "lib/");
    assert_eq!(json["lib"]["state"], "no_versions");
}
