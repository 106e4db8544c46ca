use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ModtagError, Result};

/// Name of the configuration file looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "modtag.toml";

/// Represents the complete configuration for modtag.
///
/// Contains the git backend selection, the compatibility classifier settings,
/// conventional commit keywords, and tag creation defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_remotes")]
    pub remotes: Vec<String>,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,
}

/// Which implementation talks to the repository.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process libgit2.
    #[default]
    Git2,
    /// The external git binary named by `git`.
    Command,
}

fn default_git() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_remotes() -> Vec<String> {
    vec!["origin".to_string()]
}

/// Which compatibility classifier decides the size of the next version bump.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Conventional-commit messages between the latest tag and the tip.
    #[default]
    Conventional,
    /// An external program such as `modver`.
    Command,
}

/// Configuration for the compatibility classifier.
///
/// `args` may contain the placeholders `{repo}`, `{gitdir}`, `{from}`, `{to}` and `{subdir}`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub kind: ClassifierKind,

    #[serde(default = "default_classifier_command")]
    pub command: String,

    #[serde(default = "default_classifier_args")]
    pub args: Vec<String>,
}

fn default_classifier_command() -> String {
    "modver".to_string()
}

fn default_classifier_args() -> Vec<String> {
    vec![
        "-git".to_string(),
        "{gitdir}".to_string(),
        "{from}".to_string(),
        "{to}".to_string(),
    ]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            kind: ClassifierKind::default(),
            command: default_classifier_command(),
            args: default_classifier_args(),
        }
    }
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Returns the default list of keywords that trigger major version bumps.
fn default_major_keywords() -> Vec<String> {
    vec!["breaking".to_string()]
}

/// Returns the default list of keywords that trigger minor version bumps.
fn default_minor_keywords() -> Vec<String> {
    vec![
        "feature".to_string(),
        "feat".to_string(),
        "enhancement".to_string(),
    ]
}

/// Configuration for the conventional-commit classifier.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_major_keywords")]
    pub major_keywords: Vec<String>,

    #[serde(default = "default_minor_keywords")]
    pub minor_keywords: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            major_keywords: default_major_keywords(),
            minor_keywords: default_minor_keywords(),
        }
    }
}

/// Defaults for `--add`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    /// Message template; `{tag}` is replaced by the new tag name.
    #[serde(default = "default_tag_message")]
    pub message: String,

    #[serde(default)]
    pub sign: bool,
}

fn default_tag_message() -> String {
    "Version {tag} added by modtag".to_string()
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            message: default_tag_message(),
            sign: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            git: default_git(),
            backend: Backend::default(),
            timeout_secs: default_timeout_secs(),
            remotes: default_remotes(),
            classifier: ClassifierConfig::default(),
            conventional_commits: ConventionalCommitsConfig::default(),
            tagging: TaggingConfig::default(),
        }
    }
}

impl Config {
    /// Overall deadline budget for external processes.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Renders the tag message template for `tag`.
    pub fn tag_message(&self, tag: &str) -> String {
        self.tagging.message.replace("{tag}", tag)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `modtag.toml` in current directory
/// 3. `modtag.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML configuration document.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ModtagError::config(e.to_string()))
}
