//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! operations modtag needs, so the analysis can run against a real
//! repository or a test double.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete implementations include:
//!
//! - [repository::Git2Repository]: in-process implementation using the `git2` crate
//! - [command::GitCommand]: runs an external git binary under a deadline
//! - [mock::MockRepository]: a scripted implementation for tests
//!
//! # Usage
//!
//! Analysis code depends on `&dyn Repository`; [open_repository] picks the
//! backend from the configuration.
//!
//! ```rust,no_run
//! # use modtag::git::Repository;
//! # fn example(repo: &dyn Repository) -> modtag::Result<()> {
//! for entry in repo.list_refs()? {
//!     println!("{} {}", entry.hash, entry.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCommand;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::{Path, PathBuf};

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::process::Deadline;

/// Prefix of local branch refs.
pub const HEADS_PREFIX: &str = "refs/heads/";
/// Prefix of remote-tracking refs.
pub const REMOTES_PREFIX: &str = "refs/remotes/";
/// Prefix of tag refs.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// One line of a ref listing: a full ref name and the object it points at.
///
/// For tags the hash is that of the tag object itself; annotated tags are
/// dereferenced separately through [Repository::tag_target].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub name: String,
    pub hash: String,
}

impl RefEntry {
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        RefEntry {
            name: name.into(),
            hash: hash.into(),
        }
    }
}

/// Commit information for classification
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Repository operations used by the analyzer and the tag creator
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// underlying failures (libgit2 errors, failed subprocesses) into
/// [crate::error::ModtagError] variants; callers add the domain meaning.
pub trait Repository {
    /// Root of the working tree.
    fn workdir(&self) -> &Path;

    /// The `.git` directory.
    fn git_dir(&self) -> PathBuf;

    /// Enumerate every branch head, remote-tracking ref (including each
    /// remote's symbolic `HEAD`, resolved), and tag.
    fn list_refs(&self) -> Result<Vec<RefEntry>>;

    /// Hash of the commit that the tag ultimately points at.
    fn tag_target(&self, tag_name: &str) -> Result<String>;

    /// Commits reachable from `to` but not from `from`, oldest first.
    ///
    /// When `path` is given, only commits touching that subdirectory are returned.
    fn commits_between(&self, from: &str, to: &str, path: Option<&str>)
        -> Result<Vec<CommitInfo>>;

    /// Create an annotated tag `name` on `target`.
    fn create_tag(&self, name: &str, target: &str, message: &str, sign: bool) -> Result<()>;

    /// True iff the working tree has no modifications to tracked files.
    fn is_clean(&self) -> Result<bool>;
}

/// Opens the repository at `repo_dir` with the backend the configuration selects.
///
/// `git_override` (the `--git` flag) forces the command backend with that binary.
pub fn open_repository(
    config: &Config,
    repo_dir: &Path,
    git_override: Option<&str>,
    deadline: Deadline,
) -> Result<Box<dyn Repository>> {
    match (git_override, config.backend) {
        (Some(git), _) => Ok(Box::new(GitCommand::new(git, repo_dir, deadline))),
        (None, Backend::Command) => Ok(Box::new(GitCommand::new(
            &config.git,
            repo_dir,
            deadline,
        ))),
        (None, Backend::Git2) => Ok(Box::new(Git2Repository::open(repo_dir)?)),
    }
}
