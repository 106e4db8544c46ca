//! Module import paths and their major-version suffix policy.
//!
//! Major versions 0 and 1 share the unsuffixed path; from major version 2 on
//! the path must end in `/vN` with N equal to the major version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agreement between a module path's version suffix and the latest major version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixStatus {
    /// The suffix is present and matches, or neither needed nor present.
    Ok,
    /// The latest major version is 2 or more but the path has no suffix.
    Missing,
    /// The path ends in `/v0` or `/v1`.
    Unwanted,
    /// The suffix names a different major version.
    Mismatch,
}

impl fmt::Display for SuffixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SuffixStatus::Ok => "ok",
            SuffixStatus::Missing => "missing",
            SuffixStatus::Unwanted => "unwanted",
            SuffixStatus::Mismatch => "mismatch",
        };
        f.write_str(name)
    }
}

/// A module's declared import path, split into base path and optional `/vN` suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath {
    path: String,
    base_len: usize,
    suffix: Option<u64>,
}

impl ModulePath {
    pub fn parse(path: &str) -> Self {
        let (base_len, suffix) = match decompose(path) {
            Some((base_len, n)) => (base_len, Some(n)),
            None => (path.len(), None),
        };
        ModulePath {
            path: path.to_string(),
            base_len,
            suffix,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The path with any version suffix removed
    pub fn base(&self) -> &str {
        &self.path[..self.base_len]
    }

    /// The N of a trailing `/vN`, if present
    pub fn suffix_major(&self) -> Option<u64> {
        self.suffix
    }

    pub fn suffix_status(&self, latest_major: u64) -> SuffixStatus {
        suffix_status(self.suffix, latest_major)
    }

    /// For a module in repository subdir `foo/bar`, the base path must end with `/foo/bar`.
    pub fn agrees_with_subdir(&self, subdir: &str) -> bool {
        subdir.is_empty() || self.base().ends_with(&format!("/{}", subdir))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// The suffix policy table. `latest_major` is 0 when there are no versions yet.
pub fn suffix_status(suffix: Option<u64>, latest_major: u64) -> SuffixStatus {
    match suffix {
        None if latest_major > 1 => SuffixStatus::Missing,
        None => SuffixStatus::Ok,
        Some(0) | Some(1) => SuffixStatus::Unwanted,
        Some(n) if n == latest_major => SuffixStatus::Ok,
        Some(_) => SuffixStatus::Mismatch,
    }
}

/// Matches `/v` + digits without a leading zero at the end of `path`.
/// Returns the length of the base path and the suffix number.
fn decompose(path: &str) -> Option<(usize, u64)> {
    let slash = path.rfind('/')?;
    let digits = path[slash + 1..].strip_prefix('v')?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let n = digits.parse().ok()?;
    Some((slash, n))
}
