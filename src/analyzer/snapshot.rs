use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ModtagError, Result};
use crate::git::{Repository, HEADS_PREFIX, REMOTES_PREFIX, TAGS_PREFIX};

/// Classified ref state of a repository at one point in time.
///
/// Built once per analysis and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefSnapshot {
    /// Local branch name -> commit
    pub heads: BTreeMap<String, String>,
    /// Remote name -> ref name (including `HEAD`) -> commit
    pub remotes: BTreeMap<String, BTreeMap<String, String>>,
    /// Tag name -> commit it resolves to (annotated tags dereferenced)
    pub tags: BTreeMap<String, String>,
}

impl RefSnapshot {
    /// Lists the repository's refs once and classifies them.
    ///
    /// Any failure, including failing to dereference a tag, discards the
    /// whole snapshot and is reported as a ref-listing error.
    pub fn build(repo: &dyn Repository) -> Result<Self> {
        let entries = repo
            .list_refs()
            .map_err(|e| ModtagError::ref_listing(e.to_string()))?;

        let mut snapshot = RefSnapshot::default();
        for entry in entries {
            if let Some(branch) = entry.name.strip_prefix(HEADS_PREFIX) {
                snapshot.heads.insert(branch.to_string(), entry.hash);
            } else if let Some(rest) = entry.name.strip_prefix(REMOTES_PREFIX) {
                let Some((remote, name)) = rest.split_once('/') else {
                    continue;
                };
                if remote.is_empty() || name.is_empty() {
                    continue;
                }
                snapshot
                    .remotes
                    .entry(remote.to_string())
                    .or_default()
                    .insert(name.to_string(), entry.hash);
            } else if let Some(tag) = entry.name.strip_prefix(TAGS_PREFIX) {
                let commit = repo.tag_target(tag).map_err(|e| {
                    ModtagError::ref_listing(format!("resolving commit for tag {}: {}", tag, e))
                })?;
                snapshot.tags.insert(tag.to_string(), commit);
            }
        }

        debug!(
            heads = snapshot.heads.len(),
            remotes = snapshot.remotes.len(),
            tags = snapshot.tags.len(),
            "built ref snapshot"
        );
        Ok(snapshot)
    }
}
