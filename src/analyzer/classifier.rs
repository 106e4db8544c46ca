//! Compatibility classifiers: given two revisions of a module, report the
//! minimum version bump the change between them requires.

use std::process::Command;

use tracing::debug;

use crate::config::{ClassifierKind, Config, ConventionalCommitsConfig};
use crate::domain::{Compatibility, ParsedCommit};
use crate::error::{ModtagError, Result};
use crate::git::Repository;
use crate::process::{self, Deadline};

/// The two revisions being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison<'a> {
    /// Module subdirectory within the repository, empty at the root
    pub module_subdir: &'a str,
    /// Older revision: the latest version tag, prefix included
    pub from: &'a str,
    /// Newer revision: the default branch tip
    pub to: &'a str,
}

/// A classifier's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub compatibility: Compatibility,
    /// Human-readable explanation
    pub detail: String,
}

/// Compatibility oracle. Must be deterministic for a given pair of revisions.
pub trait CompatibilityClassifier {
    fn classify(&self, repo: &dyn Repository, comparison: &Comparison<'_>) -> Result<Verdict>;
}

/// Builds the classifier the configuration selects.
pub fn from_config(config: &Config, deadline: Deadline) -> Box<dyn CompatibilityClassifier> {
    match config.classifier.kind {
        ClassifierKind::Conventional => Box::new(ConventionalClassifier::new(
            config.conventional_commits.clone(),
        )),
        ClassifierKind::Command => Box::new(CommandClassifier::new(
            &config.classifier.command,
            config.classifier.args.clone(),
            deadline,
        )),
    }
}

/// Classifies by the conventional-commit messages of the commits between the
/// two revisions that touch the module's subdirectory.
pub struct ConventionalClassifier {
    config: ConventionalCommitsConfig,
}

impl ConventionalClassifier {
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        ConventionalClassifier { config }
    }

    /// Breaking changes need a major bump, features a minor one, anything else
    /// a patch; no commits at all need nothing.
    pub fn analyze_messages(&self, messages: &[String]) -> Compatibility {
        let mut needed = Compatibility::None;

        for message in messages {
            let parsed = ParsedCommit::parse(message, &self.config.breaking_change_indicators);
            let header_words = words(message.lines().next().unwrap_or(""));

            let change = if parsed.is_breaking_change
                || has_keyword(&header_words, &self.config.major_keywords)
            {
                Compatibility::Major
            } else if matches!(parsed.r#type.as_str(), "feat" | "feature")
                || has_keyword(&header_words, &self.config.minor_keywords)
            {
                Compatibility::Minor
            } else {
                Compatibility::Patch
            };

            needed = needed.max(change);
            if needed == Compatibility::Major {
                break;
            }
        }

        needed
    }
}

/// Header tokens; hyphenated words such as `non-breaking` stay whole.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '!' | ',' | '.' | ';'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn has_keyword(words: &[String], keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| words.iter().any(|w| w == &k.to_lowercase()))
}

impl CompatibilityClassifier for ConventionalClassifier {
    fn classify(&self, repo: &dyn Repository, comparison: &Comparison<'_>) -> Result<Verdict> {
        let commits =
            repo.commits_between(comparison.from, comparison.to, Some(comparison.module_subdir))?;
        let messages: Vec<String> = commits.into_iter().map(|c| c.message).collect();
        let compatibility = self.analyze_messages(&messages);

        debug!(
            from = comparison.from,
            to = comparison.to,
            commits = messages.len(),
            %compatibility,
            "classified by commit messages"
        );

        let detail = match compatibility {
            Compatibility::None => format!("no commits touch the module since {}", comparison.from),
            Compatibility::Major => format!(
                "breaking change in {} commit(s) since {}",
                messages.len(),
                comparison.from
            ),
            Compatibility::Minor => format!(
                "new feature in {} commit(s) since {}",
                messages.len(),
                comparison.from
            ),
            Compatibility::Patch => format!(
                "{} commit(s) since {} without features or breaking changes",
                messages.len(),
                comparison.from
            ),
        };

        Ok(Verdict {
            compatibility,
            detail,
        })
    }
}

/// Runs an external classifier (e.g. `modver`) and reads its verdict from the
/// first word of stdout.
///
/// Arguments may use `{repo}`, `{gitdir}`, `{from}`, `{to}` and `{subdir}`.
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
    deadline: Deadline,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>, deadline: Deadline) -> Self {
        CommandClassifier {
            program: program.into(),
            args,
            deadline,
        }
    }

    fn expand(&self, repo: &dyn Repository, comparison: &Comparison<'_>) -> Vec<String> {
        let repo_dir = repo.workdir().display().to_string();
        let git_dir = repo.git_dir().display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{repo}", &repo_dir)
                    .replace("{gitdir}", &git_dir)
                    .replace("{from}", comparison.from)
                    .replace("{to}", comparison.to)
                    .replace("{subdir}", comparison.module_subdir)
            })
            .collect()
    }
}

impl CompatibilityClassifier for CommandClassifier {
    fn classify(&self, repo: &dyn Repository, comparison: &Comparison<'_>) -> Result<Verdict> {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(repo.workdir())
            .args(self.expand(repo, comparison));

        let output = process::run(cmd, self.deadline)?;
        if !output.status.success() {
            return Err(ModtagError::classification(
                comparison.from,
                comparison.to,
                format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = stdout.trim().to_string();

        match detail.split_whitespace().next().and_then(Compatibility::from_word) {
            Some(compatibility) => Ok(Verdict {
                compatibility,
                detail,
            }),
            None => Err(ModtagError::classification(
                comparison.from,
                comparison.to,
                format!("{} printed no verdict: {}", self.program, detail),
            )),
        }
    }
}
