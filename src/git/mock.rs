use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, RefEntry, Repository, HEADS_PREFIX, REMOTES_PREFIX, TAGS_PREFIX};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A tag created through [MockRepository::create_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub target: String,
    pub message: String,
    pub sign: bool,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    workdir: PathBuf,
    refs: Vec<RefEntry>,
    tag_targets: HashMap<String, String>,
    commits: Vec<CommitInfo>,
    clean: bool,
    fail_listing: bool,
    list_refs_calls: Cell<usize>,
    created: RefCell<Vec<CreatedTag>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            workdir: PathBuf::from("/mock/repo"),
            refs: Vec::new(),
            tag_targets: HashMap::new(),
            commits: Vec::new(),
            clean: true,
            fail_listing: false,
            list_refs_calls: Cell::new(0),
            created: RefCell::new(Vec::new()),
        }
    }

    /// Set a local branch head
    pub fn set_branch_head(&mut self, branch: &str, hash: &str) -> &mut Self {
        self.refs
            .push(RefEntry::new(format!("{}{}", HEADS_PREFIX, branch), hash));
        self
    }

    /// Set a remote-tracking ref; use `HEAD` for the remote's symbolic default
    pub fn set_remote_ref(&mut self, remote: &str, name: &str, hash: &str) -> &mut Self {
        self.refs.push(RefEntry::new(
            format!("{}{}/{}", REMOTES_PREFIX, remote, name),
            hash,
        ));
        self
    }

    /// Add a lightweight tag pointing directly at a commit
    pub fn add_tag(&mut self, name: &str, commit: &str) -> &mut Self {
        self.add_annotated_tag(name, commit, commit)
    }

    /// Add an annotated tag: the listing reports `tag_object`, dereferencing yields `commit`
    pub fn add_annotated_tag(&mut self, name: &str, tag_object: &str, commit: &str) -> &mut Self {
        self.refs
            .push(RefEntry::new(format!("{}{}", TAGS_PREFIX, name), tag_object));
        self.tag_targets.insert(name.to_string(), commit.to_string());
        self
    }

    /// Add an arbitrary ref line, for names outside the three known namespaces
    pub fn add_raw_ref(&mut self, name: &str, hash: &str) -> &mut Self {
        self.refs.push(RefEntry::new(name, hash));
        self
    }

    /// Add a commit returned by [Repository::commits_between]
    pub fn add_commit(&mut self, info: CommitInfo) -> &mut Self {
        self.commits.push(info);
        self
    }

    pub fn set_clean(&mut self, clean: bool) -> &mut Self {
        self.clean = clean;
        self
    }

    /// Make [Repository::list_refs] fail
    pub fn fail_ref_listing(&mut self) -> &mut Self {
        self.fail_listing = true;
        self
    }

    /// Number of times the refs were listed
    pub fn list_refs_calls(&self) -> usize {
        self.list_refs_calls.get()
    }

    /// Tags created so far
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git_dir(&self) -> PathBuf {
        self.workdir.join(".git")
    }

    fn list_refs(&self) -> Result<Vec<RefEntry>> {
        self.list_refs_calls.set(self.list_refs_calls.get() + 1);
        if self.fail_listing {
            return Err(ModtagError::command("show-ref: simulated failure"));
        }
        Ok(self.refs.clone())
    }

    fn tag_target(&self, tag_name: &str) -> Result<String> {
        self.tag_targets
            .get(tag_name)
            .cloned()
            .ok_or_else(|| ModtagError::command(format!("no such tag: {}", tag_name)))
    }

    fn commits_between(
        &self,
        _from: &str,
        _to: &str,
        _path: Option<&str>,
    ) -> Result<Vec<CommitInfo>> {
        // Simplified: every scripted commit is in range
        Ok(self.commits.clone())
    }

    fn create_tag(&self, name: &str, target: &str, message: &str, sign: bool) -> Result<()> {
        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            target: target.to_string(),
            message: message.to_string(),
            sign,
        });
        Ok(())
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }
}
