use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::classifier::CompatibilityClassifier;
use super::index::VersionIndex;
use super::recommend::recommend;
use super::snapshot::RefSnapshot;
use crate::domain::{detect_across_remotes, ModulePath};
use crate::error::{ModtagError, Result};
use crate::git::Repository;
use crate::manifest::ManifestReader;
use crate::report::ModuleReport;

/// Analyzes modules of one repository.
pub struct Checker<'a> {
    repo: &'a dyn Repository,
    manifests: &'a dyn ManifestReader,
    classifier: &'a dyn CompatibilityClassifier,
    remotes: &'a [String],
}

impl<'a> Checker<'a> {
    /// `remotes` are tried first, in order, when detecting the default branch.
    pub fn new(
        repo: &'a dyn Repository,
        manifests: &'a dyn ManifestReader,
        classifier: &'a dyn CompatibilityClassifier,
        remotes: &'a [String],
    ) -> Self {
        Checker {
            repo,
            manifests,
            classifier,
            remotes,
        }
    }

    pub fn repo(&self) -> &'a dyn Repository {
        self.repo
    }

    /// Checks the module rooted at `module_dir` against a fresh ref snapshot.
    pub fn check(&self, module_dir: &Path) -> Result<ModuleReport> {
        let snapshot = RefSnapshot::build(self.repo)?;
        self.check_snapshot(&snapshot, module_dir)
    }

    /// Checks the module rooted at `module_dir` against an existing snapshot.
    pub fn check_snapshot(&self, snapshot: &RefSnapshot, module_dir: &Path) -> Result<ModuleReport> {
        let repo_dir = self.repo.workdir();
        let module_subdir = resolve_subdir(repo_dir, module_dir)?;
        let version_prefix = if module_subdir.is_empty() {
            String::new()
        } else {
            format!("{}/", module_subdir)
        };
        debug!(module = %module_subdir, prefix = %version_prefix, "checking module");

        let index = VersionIndex::build(&snapshot.tags, &version_prefix);
        let latest = index.latest();
        let latest_major = latest.map_or(0, |v| v.tag.major());

        let module_root = if module_subdir.is_empty() {
            repo_dir.to_path_buf()
        } else {
            repo_dir.join(&module_subdir)
        };
        let modpath = ModulePath::parse(&self.manifests.module_path(&module_root)?);

        let branch = detect_across_remotes(&snapshot.remotes, &snapshot.heads, self.remotes);
        match &branch {
            Some(b) => debug!(branch = %b.name, remote = %b.remote, "detected default branch"),
            None => debug!(module = %module_subdir, "default branch is indeterminate"),
        }

        let recommendation = recommend(
            self.repo,
            self.classifier,
            &index,
            branch.as_ref(),
            &module_subdir,
        )?;

        let tip = branch.as_ref().map(|b| b.tip.as_str());
        let latest_commit_has_latest_version =
            matches!((latest, tip), (Some(l), Some(t)) if l.commit == t);
        let latest_commit_has_version_tag = tip.is_some_and(|t| index.has_version_at(t));

        let (compatibility, compatibility_detail) = match recommendation.verdict {
            Some(v) => (Some(v.compatibility), Some(v.detail)),
            None => (None, None),
        };

        Ok(ModuleReport {
            version_prefix,
            latest_version: latest.map(|v| v.tag.bare().to_string()),
            latest_major,
            latest_minor: latest.map_or(0, |v| v.tag.minor()),
            latest_patch: latest.map_or(0, |v| v.tag.patch()),
            latest_version_is_prerelease: latest.is_some_and(|v| v.tag.is_prerelease()),
            latest_version_unstable: latest.is_some_and(|v| v.tag.is_unstable()),
            default_branch: branch.as_ref().map(|b| b.name.clone()),
            latest_commit: tip.map(str::to_string),
            latest_commit_has_version_tag,
            latest_commit_has_latest_version,
            modpath_mismatch: !modpath.agrees_with_subdir(&module_subdir),
            version_suffix: modpath.suffix_status(latest_major),
            modpath: modpath.to_string(),
            module_subdir,
            state: recommendation.state,
            compatibility,
            compatibility_detail,
            new_version: recommendation.new_version,
            requires_new_suffix: recommendation.requires_new_suffix,
        })
    }
}

/// The module's subdirectory relative to the repository root, `/`-separated,
/// empty when they are the same directory.
///
/// A relative `module_dir` is taken relative to the repository unless it
/// already starts with `repo_dir`.
pub fn resolve_subdir(repo_dir: &Path, module_dir: &Path) -> Result<String> {
    let outside = || ModtagError::PathResolution {
        module: module_dir.to_path_buf(),
        repo: repo_dir.to_path_buf(),
    };

    let repo = normalize(repo_dir);
    let module = normalize(module_dir);

    let rel = if module.is_absolute() {
        let repo = if repo.is_absolute() {
            repo
        } else {
            normalize(&std::path::absolute(&repo)?)
        };
        match module.strip_prefix(&repo) {
            Ok(rel) => rel.to_path_buf(),
            // Symlinked temp dirs and the like
            Err(_) => match (repo.canonicalize(), module.canonicalize()) {
                (Ok(repo), Ok(module)) => module
                    .strip_prefix(&repo)
                    .map_err(|_| outside())?
                    .to_path_buf(),
                _ => return Err(outside()),
            },
        }
    } else {
        module
            .strip_prefix(&repo)
            .map(Path::to_path_buf)
            .unwrap_or(module)
    };

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }
    Ok(parts.join("/"))
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
