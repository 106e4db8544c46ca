// Throwaway git repositories for integration tests
#![allow(dead_code)]

use git2::{Commit, Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub repo: Repository,
}

impl Fixture {
    /// An empty repository whose initial branch is `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        Fixture { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Writes `file` and commits it on the current branch
    pub fn commit(&self, file: &str, content: &str, message: &str) -> Oid {
        let path = self.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();

        let parents = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    pub fn go_mod(&self, subdir: &str, module_path: &str) -> Oid {
        let file = if subdir.is_empty() {
            "go.mod".to_string()
        } else {
            format!("{}/go.mod", subdir)
        };
        self.commit(
            &file,
            &format!("module {}\n\ngo 1.22\n", module_path),
            &format!("chore: add {}", file),
        )
    }

    pub fn tag(&self, name: &str, commit: Oid) {
        let object = self.repo.find_object(commit, None).unwrap();
        let sig = self.repo.signature().unwrap();
        self.repo
            .tag(name, &object, &sig, &format!("Release {}", name), false)
            .unwrap();
    }

    pub fn lightweight_tag(&self, name: &str, commit: Oid) {
        let object = self.repo.find_object(commit, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    /// Points `origin/main` and `origin/HEAD` at the local `main`, as after a push
    pub fn push(&self) {
        let head = self
            .repo
            .find_reference("refs/heads/main")
            .unwrap()
            .target()
            .unwrap();
        self.repo
            .reference("refs/remotes/origin/main", head, true, "push")
            .unwrap();
        self.repo
            .reference_symbolic(
                "refs/remotes/origin/HEAD",
                "refs/remotes/origin/main",
                true,
                "remote HEAD",
            )
            .unwrap();
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/tags/{}", name))
            .is_ok()
    }
}
