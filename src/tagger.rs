//! Creating the recommended version tag.

use std::fmt;

use tracing::info;

use crate::config::Config;
use crate::error::{ModtagError, Result};
use crate::git::Repository;
use crate::report::ModuleReport;

/// Why no tag was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BranchUnknown,
    TipUnknown,
    TipAlreadyTagged,
    NoNewVersion,
    SameAsLatest,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::BranchUnknown => "default branch unknown",
            SkipReason::TipUnknown => "latest commit unknown",
            SkipReason::TipAlreadyTagged => "latest commit already has a version tag",
            SkipReason::NoNewVersion => "no new version recommended",
            SkipReason::SameAsLatest => "recommended version is the latest version",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Created { tag: String },
    Skipped(SkipReason),
}

/// Fails with [ModtagError::UncleanRepository] if tracked files are modified.
///
/// Nothing stops the tree from changing between this check and tag creation.
pub fn ensure_clean(repo: &dyn Repository) -> Result<()> {
    if repo.is_clean()? {
        Ok(())
    } else {
        Err(ModtagError::UncleanRepository)
    }
}

/// Tags the default branch tip with the recommended version when that is safe.
///
/// A new major version is refused with [ModtagError::MajorBumpRefused].
/// `message` overrides the configured template; `sign` is or-ed with the
/// configured default.
pub fn maybe_add_tag(
    repo: &dyn Repository,
    report: &ModuleReport,
    message: Option<&str>,
    sign: bool,
    config: &Config,
) -> Result<TagOutcome> {
    if report.default_branch.is_none() {
        return Ok(TagOutcome::Skipped(SkipReason::BranchUnknown));
    }
    let Some(tip) = report.latest_commit.as_deref() else {
        return Ok(TagOutcome::Skipped(SkipReason::TipUnknown));
    };
    if report.latest_commit_has_version_tag {
        return Ok(TagOutcome::Skipped(SkipReason::TipAlreadyTagged));
    }
    let Some(tag) = report.new_tag() else {
        return Ok(TagOutcome::Skipped(SkipReason::NoNewVersion));
    };
    let bare = format!("v{}", report.new_version);
    if report.latest_version.as_deref() == Some(bare.as_str()) {
        return Ok(TagOutcome::Skipped(SkipReason::SameAsLatest));
    }

    if report.new_version.major != report.latest_major {
        return Err(ModtagError::MajorBumpRefused { tag });
    }

    let message = match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => config.tag_message(&tag),
    };
    let sign = sign || config.tagging.sign;

    repo.create_tag(&tag, tip, &message, sign)?;
    info!(%tag, commit = tip, sign, "created tag");
    Ok(TagOutcome::Created { tag })
}
