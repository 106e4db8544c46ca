//! The per-module analysis result and the findings derived from it.

use serde::Serialize;
use std::fmt;

use crate::analyzer::RecommendationState;
use crate::domain::{Compatibility, SuffixStatus, Version};

/// Everything modtag learned about one module.
///
/// Fields that depend on an unknown default branch or on the absence of
/// version tags hold `None`, `false` or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    /// Subdirectory of the module within the repository, empty at the root
    pub module_subdir: String,
    /// Required tag prefix, e.g. `tools/gen/`
    pub version_prefix: String,

    /// Latest version tag with the prefix stripped, e.g. `v1.3.0`
    pub latest_version: Option<String>,
    pub latest_major: u64,
    pub latest_minor: u64,
    pub latest_patch: u64,
    pub latest_version_is_prerelease: bool,
    /// Major version 0 or a prerelease
    pub latest_version_unstable: bool,

    pub default_branch: Option<String>,
    /// Tip of the default branch
    pub latest_commit: Option<String>,
    pub latest_commit_has_version_tag: bool,
    pub latest_commit_has_latest_version: bool,

    /// Declared module path
    pub modpath: String,
    /// The module path does not end with the module subdirectory
    pub modpath_mismatch: bool,
    pub version_suffix: SuffixStatus,

    pub state: RecommendationState,
    pub compatibility: Option<Compatibility>,
    pub compatibility_detail: Option<String>,
    /// Recommended next version, all zero when none
    pub new_version: Version,
    pub requires_new_suffix: bool,
}

/// A warning-level inconsistency found in a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    DefaultBranchUnknown,
    NoVersions,
    Prerelease { version: String },
    Unstable { version: String },
    SuffixMismatch { modpath: String, version: String },
    SuffixMissing { modpath: String, major: u64 },
    SuffixUnwanted { modpath: String },
    TipBehindLatest { version: String },
    TipUntagged,
    ChangesSinceRelease { detail: String },
    NewVersion { tag: String },
    NewSuffixRequired { major: u64 },
    ModpathMismatch { modpath: String, subdir: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DefaultBranchUnknown => write!(f, "Could not determine default branch"),
            Warning::NoVersions => write!(f, "No version tags"),
            Warning::Prerelease { version } => {
                write!(f, "Latest version {} is a prerelease", version)
            }
            Warning::Unstable { version } => write!(f, "Latest version {} is unstable", version),
            Warning::SuffixMismatch { modpath, version } => write!(
                f,
                "Module path {} version suffix does not agree with latest version {}",
                modpath, version
            ),
            Warning::SuffixMissing { modpath, major } => write!(
                f,
                "Module path {} lacks suffix matching major version {}",
                modpath, major
            ),
            Warning::SuffixUnwanted { modpath } => {
                write!(f, "Module path {} contains an unwanted version suffix", modpath)
            }
            Warning::TipBehindLatest { version } => write!(
                f,
                "Latest commit on the default branch has version tag, but it is not latest version {}",
                version
            ),
            Warning::TipUntagged => {
                write!(f, "Latest commit on the default branch lacks version tag")
            }
            Warning::ChangesSinceRelease { detail } => {
                write!(f, "Compatibility analysis: {}", detail)
            }
            Warning::NewVersion { tag } => write!(f, "Recommended new version: {}", tag),
            Warning::NewSuffixRequired { major } => {
                write!(f, "Module path will require new version suffix /v{}", major)
            }
            Warning::ModpathMismatch { modpath, subdir } => write!(
                f,
                "Module path {} does not agree with module subdir in repository {}",
                modpath, subdir
            ),
        }
    }
}

/// One line of a module description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Info(String),
    Ok(String),
    Warn(Warning),
}

impl ModuleReport {
    /// The recommended tag name, prefix included, when a new version is recommended
    pub fn new_tag(&self) -> Option<String> {
        (!self.new_version.is_zero()).then(|| self.new_version.tag_name(&self.version_prefix))
    }

    /// All findings in display order.
    pub fn findings(&self) -> Vec<Finding> {
        let mut out = Vec::new();
        let modpath = &self.modpath;

        out.push(Finding::Info(format!("Module path: {}", modpath)));
        if !self.version_prefix.is_empty() {
            out.push(Finding::Info(format!(
                "Version prefix: {} (stripped from version tags in this report)",
                self.version_prefix
            )));
        }

        match (&self.default_branch, &self.latest_commit) {
            (Some(branch), commit) => {
                out.push(Finding::Ok(format!("Default branch: {}", branch)));
                if let Some(commit) = commit {
                    out.push(Finding::Info(format!("Latest commit hash: {}", commit)));
                }
            }
            (None, _) => out.push(Finding::Warn(Warning::DefaultBranchUnknown)),
        }

        match &self.latest_version {
            Some(version) => self.version_findings(version, &mut out),
            None => {
                out.push(Finding::Warn(Warning::NoVersions));
                out.push(Finding::Info(format!(
                    "Recommended first version: {}",
                    self.new_version.tag_name(&self.version_prefix)
                )));
            }
        }

        if self.modpath_mismatch {
            out.push(Finding::Warn(Warning::ModpathMismatch {
                modpath: modpath.clone(),
                subdir: self.module_subdir.clone(),
            }));
        } else if !self.module_subdir.is_empty() {
            out.push(Finding::Ok(format!(
                "Module path {} agrees with module subdir in repository {}",
                modpath, self.module_subdir
            )));
        }

        out
    }

    fn version_findings(&self, version: &str, out: &mut Vec<Finding>) {
        let modpath = &self.modpath;
        out.push(Finding::Ok(format!("Latest version tag: {}", version)));

        out.push(if self.latest_version_is_prerelease {
            Finding::Warn(Warning::Prerelease {
                version: version.to_string(),
            })
        } else {
            Finding::Ok(format!("Latest version {} is not a prerelease", version))
        });
        out.push(if self.latest_version_unstable {
            Finding::Warn(Warning::Unstable {
                version: version.to_string(),
            })
        } else {
            Finding::Ok(format!("Latest version {} is stable", version))
        });

        out.push(match self.version_suffix {
            SuffixStatus::Ok if self.latest_major > 1 => Finding::Ok(format!(
                "Module path {} has suffix matching major version {}",
                modpath, self.latest_major
            )),
            SuffixStatus::Ok => Finding::Ok(format!(
                "Module path {} neither needs nor has a version suffix",
                modpath
            )),
            SuffixStatus::Mismatch => Finding::Warn(Warning::SuffixMismatch {
                modpath: modpath.clone(),
                version: version.to_string(),
            }),
            SuffixStatus::Missing => Finding::Warn(Warning::SuffixMissing {
                modpath: modpath.clone(),
                major: self.latest_major,
            }),
            SuffixStatus::Unwanted => Finding::Warn(Warning::SuffixUnwanted {
                modpath: modpath.clone(),
            }),
        });

        match self.state {
            RecommendationState::UpToDate => out.push(Finding::Ok(
                "Latest commit on the default branch has latest version tag".to_string(),
            )),
            RecommendationState::BehindRelease => {
                out.push(Finding::Warn(Warning::TipBehindLatest {
                    version: version.to_string(),
                }))
            }
            RecommendationState::Classified => {
                out.push(Finding::Warn(Warning::TipUntagged));
                let detail = self.compatibility_detail.clone().unwrap_or_default();
                if self.compatibility == Some(Compatibility::None) {
                    out.push(Finding::Ok(
                        "Compatibility analysis: no new version tag required".to_string(),
                    ));
                } else {
                    out.push(Finding::Warn(Warning::ChangesSinceRelease { detail }));
                    out.push(Finding::Warn(Warning::NewVersion {
                        tag: self.new_version.tag_name(&self.version_prefix),
                    }));
                    if self.requires_new_suffix {
                        out.push(Finding::Warn(Warning::NewSuffixRequired {
                            major: self.new_version.major,
                        }));
                    }
                }
            }
            RecommendationState::NoVersions | RecommendationState::BranchUnknown => {}
        }
    }

    /// The warning-level findings only
    pub fn warnings(&self) -> Vec<Warning> {
        self.findings()
            .into_iter()
            .filter_map(|f| match f {
                Finding::Warn(w) => Some(w),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_to_date() -> ModuleReport {
        ModuleReport {
            module_subdir: String::new(),
            version_prefix: String::new(),
            latest_version: Some("v1.0.0".to_string()),
            latest_major: 1,
            latest_minor: 0,
            latest_patch: 0,
            latest_version_is_prerelease: false,
            latest_version_unstable: false,
            default_branch: Some("main".to_string()),
            latest_commit: Some("c1".to_string()),
            latest_commit_has_version_tag: true,
            latest_commit_has_latest_version: true,
            modpath: "example.com/mod".to_string(),
            modpath_mismatch: false,
            version_suffix: SuffixStatus::Ok,
            state: RecommendationState::UpToDate,
            compatibility: None,
            compatibility_detail: None,
            new_version: Version::zero(),
            requires_new_suffix: false,
        }
    }

    #[test]
    fn test_healthy_module_has_no_warnings() {
        let report = up_to_date();
        assert!(report.warnings().is_empty());
        assert_eq!(report.new_tag(), None);
    }

    #[test]
    fn test_classified_module_warnings() {
        let mut report = up_to_date();
        report.version_prefix = "tools/".to_string();
        report.module_subdir = "tools".to_string();
        report.modpath = "example.com/repo".to_string();
        report.modpath_mismatch = true;
        report.latest_commit = Some("c2".to_string());
        report.latest_commit_has_version_tag = false;
        report.latest_commit_has_latest_version = false;
        report.state = RecommendationState::Classified;
        report.compatibility = Some(Compatibility::Major);
        report.compatibility_detail = Some("breaking change".to_string());
        report.new_version = Version::new(2, 0, 0);
        report.requires_new_suffix = true;

        assert_eq!(
            report.warnings(),
            vec![
                Warning::TipUntagged,
                Warning::ChangesSinceRelease {
                    detail: "breaking change".to_string()
                },
                Warning::NewVersion {
                    tag: "tools/v2.0.0".to_string()
                },
                Warning::NewSuffixRequired { major: 2 },
                Warning::ModpathMismatch {
                    modpath: "example.com/repo".to_string(),
                    subdir: "tools".to_string()
                },
            ]
        );
        assert_eq!(report.new_tag().as_deref(), Some("tools/v2.0.0"));
    }

    #[test]
    fn test_no_versions() {
        let mut report = up_to_date();
        report.latest_version = None;
        report.latest_major = 0;
        report.default_branch = None;
        report.latest_commit = None;
        report.state = RecommendationState::NoVersions;
        report.new_version = Version::new(0, 1, 0);

        assert_eq!(
            report.warnings(),
            vec![Warning::DefaultBranchUnknown, Warning::NoVersions]
        );
    }

    #[test]
    fn test_warning_text() {
        let w = Warning::SuffixMissing {
            modpath: "example.com/mod".to_string(),
            major: 2,
        };
        assert_eq!(
            w.to_string(),
            "Module path example.com/mod lacks suffix matching major version 2"
        );
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(up_to_date()).unwrap();
        assert_eq!(json["version_suffix"], "ok");
        assert_eq!(json["state"], "up_to_date");
        assert_eq!(json["new_version"]["major"], 0);
        assert_eq!(json["latest_commit_has_latest_version"], true);
    }
}
