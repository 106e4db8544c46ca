use serde::Serialize;
use std::fmt;

use tracing::debug;

use super::classifier::{Comparison, CompatibilityClassifier, Verdict};
use super::index::VersionIndex;
use crate::domain::{Compatibility, DefaultBranch, Version};
use crate::error::{ModtagError, Result};
use crate::git::Repository;

/// How the next version was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationState {
    /// No version tags exist; the first release is 0.1.0.
    NoVersions,
    /// The default branch could not be determined.
    BranchUnknown,
    /// The tip carries the latest version tag.
    UpToDate,
    /// The tip carries an older version tag but not the latest one.
    BehindRelease,
    /// The tip is untagged and the classifier was consulted.
    Classified,
}

impl fmt::Display for RecommendationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationState::NoVersions => "no versions",
            RecommendationState::BranchUnknown => "default branch unknown",
            RecommendationState::UpToDate => "up to date",
            RecommendationState::BehindRelease => "tip behind latest release",
            RecommendationState::Classified => "classified",
        };
        f.write_str(name)
    }
}

/// The recommended next version of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub state: RecommendationState,
    /// Present only in the `Classified` state
    pub verdict: Option<Verdict>,
    /// All zero when no new version is recommended
    pub new_version: Version,
    /// The new major version is past 1 and past the latest one
    pub requires_new_suffix: bool,
}

impl Recommendation {
    fn without_bump(state: RecommendationState) -> Self {
        Recommendation {
            state,
            verdict: None,
            new_version: Version::zero(),
            requires_new_suffix: false,
        }
    }
}

/// Decides the next version of the module in `module_subdir`.
///
/// The classifier is consulted only when versions exist, the default branch
/// is known, and its tip carries no version tag of this module.
pub fn recommend(
    repo: &dyn Repository,
    classifier: &dyn CompatibilityClassifier,
    index: &VersionIndex,
    branch: Option<&DefaultBranch>,
    module_subdir: &str,
) -> Result<Recommendation> {
    let Some(latest) = index.latest() else {
        return Ok(Recommendation {
            state: RecommendationState::NoVersions,
            verdict: None,
            new_version: Version::new(0, 1, 0),
            requires_new_suffix: false,
        });
    };

    let Some(branch) = branch else {
        return Ok(Recommendation::without_bump(
            RecommendationState::BranchUnknown,
        ));
    };

    if latest.commit == branch.tip {
        return Ok(Recommendation::without_bump(RecommendationState::UpToDate));
    }
    if index.has_version_at(&branch.tip) {
        return Ok(Recommendation::without_bump(
            RecommendationState::BehindRelease,
        ));
    }

    let comparison = Comparison {
        module_subdir,
        from: latest.tag.name(),
        to: &branch.tip,
    };
    let verdict = classifier
        .classify(repo, &comparison)
        .map_err(|e| match e {
            ModtagError::Classification { .. } => e,
            other => ModtagError::classification(comparison.from, comparison.to, other.to_string()),
        })?;

    let current = latest.tag.triple();
    let new_version = match verdict.compatibility {
        // A prerelease already stands in for its own patch release.
        Compatibility::Patch if latest.tag.is_prerelease() => current,
        change => current.bump(change),
    };
    let requires_new_suffix = new_version.major > current.major && new_version.major > 1;

    debug!(
        from = comparison.from,
        to = comparison.to,
        compatibility = %verdict.compatibility,
        %new_version,
        "recommended next version"
    );

    Ok(Recommendation {
        state: RecommendationState::Classified,
        verdict: Some(verdict),
        new_version,
        requires_new_suffix,
    })
}
