// tests/config_test.rs
use modtag::config::{load_config, Backend, ClassifierKind, Config, CONFIG_FILE_NAME};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
git = "/opt/git/bin/git"
backend = "command"
timeout_secs = 30
remotes = ["upstream", "origin"]

[classifier]
kind = "command"
command = "/usr/local/bin/modver"

[conventional_commits]
major_keywords = ["incompatible"]

[tagging]
message = "Release {tag}"
sign = true
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.git, "/opt/git/bin/git");
    assert_eq!(config.backend, Backend::Command);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.remotes, vec!["upstream", "origin"]);
    assert_eq!(config.classifier.kind, ClassifierKind::Command);
    assert_eq!(config.classifier.command, "/usr/local/bin/modver");
    assert_eq!(
        config.conventional_commits.major_keywords,
        vec!["incompatible".to_string()]
    );
    assert!(config
        .conventional_commits
        .breaking_change_indicators
        .contains(&"BREAKING CHANGE:".to_string()));
    assert_eq!(config.tag_message("v1.2.0"), "Release v1.2.0");
    assert!(config.tagging.sign);
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert!(config
        .conventional_commits
        .breaking_change_indicators
        .contains(&"BREAKING CHANGE:".to_string()));
    assert!(config
        .conventional_commits
        .major_keywords
        .contains(&"breaking".to_string()));
    assert!(config
        .conventional_commits
        .minor_keywords
        .contains(&"feature".to_string()));
    assert_eq!(config.tagging.message, "Version {tag} added by modtag");
    assert!(!config.tagging.sign);
}

#[test]
fn test_missing_explicit_file_is_error() {
    assert!(load_config(Some("/nonexistent/modtag.toml")).is_err());
}

#[test]
fn test_invalid_toml_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"remotes = \"origin\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
#[serial]
fn test_config_in_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "timeout_secs = 7\n").unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(result.unwrap().timeout_secs, 7);
}
