use serde::{Deserialize, Serialize};
use std::fmt;

/// A `major.minor.patch` triple, as recommended for the next release
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// The all-zero triple, meaning "no recommendation"
    pub fn zero() -> Self {
        Version::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Version::zero()
    }

    /// Bump version according to the compatibility category
    pub fn bump(&self, change: Compatibility) -> Self {
        match change {
            Compatibility::Major => Version::new(self.major + 1, 0, 0),
            Compatibility::Minor => Version::new(self.major, self.minor + 1, 0),
            Compatibility::Patch => Version::new(self.major, self.minor, self.patch + 1),
            Compatibility::None => *self,
        }
    }

    /// Tag name for this version under `prefix` (e.g. `tools/` + `v1.2.3`)
    pub fn tag_name(&self, prefix: &str) -> String {
        format!("{}v{}", prefix, self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Minimum version bump a change requires, as reported by a compatibility classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    None,
    Patch,
    Minor,
    Major,
}

impl Compatibility {
    /// Parses a classifier verdict word (`None`, `Patchlevel`/`Patch`, `Minor`, `Major`).
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim_end_matches(':').to_ascii_lowercase().as_str() {
            "none" => Some(Compatibility::None),
            "patch" | "patchlevel" => Some(Compatibility::Patch),
            "minor" => Some(Compatibility::Minor),
            "major" => Some(Compatibility::Major),
            _ => None,
        }
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compatibility::None => "None",
            Compatibility::Patch => "Patch",
            Compatibility::Minor => "Minor",
            Compatibility::Major => "Major",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(Compatibility::Major), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(Compatibility::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(Compatibility::Patch), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_none_keeps_version() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(Compatibility::None), v);
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(Version::new(0, 1, 0).tag_name(""), "v0.1.0");
        assert_eq!(Version::new(1, 4, 0).tag_name("tools/gen/"), "tools/gen/v1.4.0");
    }

    #[test]
    fn test_zero() {
        assert!(Version::zero().is_zero());
        assert!(!Version::new(0, 0, 1).is_zero());
    }

    #[test]
    fn test_compatibility_from_word() {
        assert_eq!(Compatibility::from_word("Major:"), Some(Compatibility::Major));
        assert_eq!(
            Compatibility::from_word("Patchlevel"),
            Some(Compatibility::Patch)
        );
        assert_eq!(Compatibility::from_word("none"), Some(Compatibility::None));
        assert_eq!(Compatibility::from_word("huge"), None);
    }

    #[test]
    fn test_compatibility_ordering() {
        assert!(Compatibility::Major > Compatibility::Minor);
        assert!(Compatibility::Patch > Compatibility::None);
    }
}
