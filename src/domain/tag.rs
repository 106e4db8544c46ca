use std::cmp::Ordering;
use std::fmt;

use crate::domain::Version;

/// A tag name that, after stripping a required prefix, is a `vMAJOR.MINOR.PATCH`
/// semantic version with optional `-prerelease` and `+build` parts.
///
/// Ordering is semantic-version precedence; build metadata does not take part,
/// and the full tag name breaks the remaining ties so the order is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    name: String,
    prefix_len: usize,
    version: semver::Version,
}

impl VersionTag {
    /// Parses `tag_name` under `prefix`.
    ///
    /// Returns `None` when the tag does not start with `prefix` byte-for-byte
    /// or the remainder is not a `v`-prefixed semantic version.
    pub fn parse(tag_name: &str, prefix: &str) -> Option<Self> {
        let rest = tag_name.strip_prefix(prefix)?;
        let bare = rest.strip_prefix('v')?;
        let version = semver::Version::parse(bare).ok()?;
        Some(VersionTag {
            name: tag_name.to_string(),
            prefix_len: prefix.len(),
            version,
        })
    }

    /// The full tag name, prefix included
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix this tag was parsed under
    pub fn prefix(&self) -> &str {
        &self.name[..self.prefix_len]
    }

    /// The tag name without its prefix, e.g. `v1.2.3-rc.1`
    pub fn bare(&self) -> &str {
        &self.name[self.prefix_len..]
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn triple(&self) -> Version {
        Version::new(self.major(), self.minor(), self.patch())
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// Major version 0 or a prerelease
    pub fn is_unstable(&self) -> bool {
        self.major() == 0 || self.is_prerelease()
    }
}

impl Ord for VersionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.version, &other.version);
        (a.major, a.minor, a.patch, &a.pre)
            .cmp(&(b.major, b.minor, b.patch, &b.pre))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
