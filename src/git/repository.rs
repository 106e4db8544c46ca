use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, RefEntry, TAGS_PREFIX};
use git2::{Commit, DiffOptions, Oid, Repository as Git2Repo, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open the repository whose working tree is at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path.as_ref())?;
        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        let workdir = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Git2Repository { repo, workdir }
    }

    fn resolve_commit(&self, rev: &str) -> Result<Commit<'_>> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit)
    }

    fn touches(&self, commit: &Commit<'_>, path: &str) -> Result<bool> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = DiffOptions::new();
        opts.pathspec(path);
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
        Ok(diff.deltas().len() > 0)
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    fn list_refs(&self) -> Result<Vec<RefEntry>> {
        let mut entries = Vec::new();

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(name) = reference.name().map(str::to_string) else {
                continue;
            };

            // Symbolic refs such as refs/remotes/origin/HEAD are listed with
            // the hash they resolve to.
            let resolved = match reference.resolve() {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!(%name, error = %e, "skipping dangling ref");
                    continue;
                }
            };
            if let Some(oid) = resolved.target() {
                entries.push(RefEntry::new(name, oid.to_string()));
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn tag_target(&self, tag_name: &str) -> Result<String> {
        let reference = self
            .repo
            .find_reference(&format!("{}{}", TAGS_PREFIX, tag_name))?;
        let commit = reference.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn commits_between(
        &self,
        from: &str,
        to: &str,
        path: Option<&str>,
    ) -> Result<Vec<CommitInfo>> {
        let from_oid = self.resolve_commit(from)?.id();
        let to_oid = self.resolve_commit(to)?.id();

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            if let Some(path) = path.filter(|p| !p.is_empty()) {
                if !self.touches(&commit, path)? {
                    continue;
                }
            }

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: commit.message().unwrap_or("(empty message)").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        commits.reverse();
        Ok(commits)
    }

    fn create_tag(&self, name: &str, target: &str, message: &str, sign: bool) -> Result<()> {
        if sign {
            return Err(ModtagError::command(
                "signed tags need the external git backend (set backend = \"command\" or pass --git)",
            ));
        }

        let oid = Oid::from_str(target)?;
        let object = self.repo.find_object(oid, None)?;
        let tagger = self.repo.signature()?;

        self.repo.tag(name, &object, &tagger, message, false)?;
        Ok(())
    }

    fn is_clean(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses.len() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn commit_file(repo: &Git2Repo, dir: &Path, file: &str, content: &str, msg: &str) -> Oid {
        let path = dir.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();

        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &parent_refs)
            .unwrap()
    }

    fn setup() -> (TempDir, Git2Repo) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn test_list_refs_and_annotated_tag_target() {
        let (dir, repo) = setup();
        let first = commit_file(&repo, dir.path(), "README.md", "one\n", "first");
        let tag_oid = {
            let object = repo.find_object(first, None).unwrap();
            let sig = repo.signature().unwrap();
            repo.tag("v1.0.0", &object, &sig, "release", false).unwrap()
        };

        let wrapped = Git2Repository::from_git2(repo);
        let refs = wrapped.list_refs().unwrap();
        let tag_entry = refs
            .iter()
            .find(|r| r.name == "refs/tags/v1.0.0")
            .expect("tag listed");

        assert_eq!(tag_entry.hash, tag_oid.to_string());
        assert_eq!(wrapped.tag_target("v1.0.0").unwrap(), first.to_string());
        assert!(refs.iter().any(|r| r.name.starts_with("refs/heads/")));
    }

    #[test]
    fn test_commits_between_filters_by_path() {
        let (dir, repo) = setup();
        let base = commit_file(&repo, dir.path(), "README.md", "one\n", "base");
        commit_file(&repo, dir.path(), "lib/a.go", "package a\n", "feat: lib change");
        let tip = commit_file(&repo, dir.path(), "README.md", "two\n", "docs: root change");

        let wrapped = Git2Repository::from_git2(repo);
        let all = wrapped
            .commits_between(&base.to_string(), &tip.to_string(), None)
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "feat: lib change");

        let lib_only = wrapped
            .commits_between(&base.to_string(), &tip.to_string(), Some("lib"))
            .unwrap();
        assert_eq!(lib_only.len(), 1);
        assert_eq!(lib_only[0].message, "feat: lib change");
    }

    #[test]
    fn test_is_clean_tolerates_untracked() {
        let (dir, repo) = setup();
        commit_file(&repo, dir.path(), "README.md", "one\n", "base");
        let wrapped = Git2Repository::from_git2(repo);

        fs::write(dir.path().join("scratch.txt"), "x").unwrap();
        assert!(wrapped.is_clean().unwrap());

        fs::write(dir.path().join("README.md"), "changed\n").unwrap();
        assert!(!wrapped.is_clean().unwrap());
    }

    #[test]
    fn test_create_annotated_tag() {
        let (dir, repo) = setup();
        let head = commit_file(&repo, dir.path(), "README.md", "one\n", "base");
        let wrapped = Git2Repository::from_git2(repo);

        wrapped
            .create_tag("v0.1.0", &head.to_string(), "Version v0.1.0", false)
            .unwrap();
        assert_eq!(wrapped.tag_target("v0.1.0").unwrap(), head.to_string());
        assert!(wrapped
            .create_tag("v0.2.0", &head.to_string(), "signed", true)
            .is_err());
    }
}
