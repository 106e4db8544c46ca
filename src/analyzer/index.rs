use std::collections::BTreeMap;

use crate::domain::VersionTag;

/// A version tag and the commit it resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedVersion {
    pub tag: VersionTag,
    pub commit: String,
}

/// The tags of one module that are valid versions under its prefix, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionIndex {
    versions: Vec<IndexedVersion>,
}

impl VersionIndex {
    /// Keeps the tags that start with `prefix` and whose remainder is a version.
    ///
    /// An empty result is the "no versions yet" state, not an error.
    pub fn build(tags: &BTreeMap<String, String>, prefix: &str) -> Self {
        let mut versions: Vec<IndexedVersion> = tags
            .iter()
            .filter_map(|(name, commit)| {
                VersionTag::parse(name, prefix).map(|tag| IndexedVersion {
                    tag,
                    commit: commit.clone(),
                })
            })
            .collect();
        versions.sort_by(|a, b| a.tag.cmp(&b.tag));
        VersionIndex { versions }
    }

    /// The highest version under semantic-version precedence
    pub fn latest(&self) -> Option<&IndexedVersion> {
        self.versions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True if any version tag of this module resolves to `commit`
    pub fn has_version_at(&self, commit: &str) -> bool {
        self.versions.iter().any(|v| v.commit == commit)
    }

    /// All versions, lowest first
    pub fn iter(&self) -> impl Iterator<Item = &IndexedVersion> {
        self.versions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_latest_is_max_precedence() {
        let index = VersionIndex::build(
            &tags(&[
                ("v1.10.0", "c3"),
                ("v1.9.0", "c2"),
                ("v2.0.0-rc.1", "c4"),
                ("v1.2.3", "c1"),
                ("nightly", "c5"),
            ]),
            "",
        );
        assert_eq!(index.len(), 4);
        assert_eq!(index.latest().unwrap().tag.name(), "v2.0.0-rc.1");
        assert_eq!(index.latest().unwrap().commit, "c4");
    }

    #[test]
    fn test_release_beats_its_prerelease() {
        let index = VersionIndex::build(&tags(&[("v2.0.0", "c5"), ("v2.0.0-rc.1", "c4")]), "");
        assert_eq!(index.latest().unwrap().tag.name(), "v2.0.0");
    }

    #[test]
    fn test_prefix_filtering() {
        let all = tags(&[
            ("v1.0.0", "c1"),
            ("lib/v1.0.0", "c2"),
            ("lib/v1.1.0", "c3"),
            ("tools/v3.0.0", "c4"),
        ]);

        let root = VersionIndex::build(&all, "");
        assert_eq!(root.len(), 1);
        assert_eq!(root.latest().unwrap().tag.name(), "v1.0.0");

        let lib = VersionIndex::build(&all, "lib/");
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.latest().unwrap().tag.bare(), "v1.1.0");

        let gen = VersionIndex::build(&all, "tools/gen/");
        assert!(gen.is_empty());
        assert!(gen.latest().is_none());
    }

    #[test]
    fn test_has_version_at() {
        let index = VersionIndex::build(&tags(&[("v1.0.0", "c1"), ("other", "c2")]), "");
        assert!(index.has_version_at("c1"));
        assert!(!index.has_version_at("c2"));
    }
}
