use std::collections::BTreeMap;

/// Branch names that designate the default branch when the remote agrees.
pub const PREFERRED_BRANCH_NAMES: [&str; 3] = ["main", "master", "default"];

/// Name of the pseudo-ref a remote advertises for its symbolic default.
pub const REMOTE_HEAD: &str = "HEAD";

/// The branch considered authoritative for releases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultBranch {
    pub name: String,
    /// Commit at the tip of the local branch of that name
    pub tip: String,
    /// Remote whose refs decided it
    pub remote: String,
}

/// Picks the default branch from one remote's refs and the local heads.
///
/// 1. `main`, `master`, then `default`: chosen when the remote and local
///    hashes agree and the remote's `HEAD`, if advertised, points at the same commit.
/// 2. Otherwise the sole remote ref whose name is all letters and digits and
///    whose hash equals the local head of the same name.
///
/// A name is only ever returned when its remote hash equals its local hash.
pub fn detect_default_branch(
    remote_refs: &BTreeMap<String, String>,
    heads: &BTreeMap<String, String>,
) -> Option<String> {
    let remote_head = remote_refs.get(REMOTE_HEAD);

    for name in PREFERRED_BRANCH_NAMES {
        if let (Some(remote_hash), Some(local_hash)) = (remote_refs.get(name), heads.get(name)) {
            if remote_hash == local_hash && remote_head.map_or(true, |h| h == remote_hash) {
                return Some(name.to_string());
            }
        }
    }

    let mut candidates = remote_refs.iter().filter(|(name, hash)| {
        name.as_str() != REMOTE_HEAD && is_plain_branch_name(name) && heads.get(*name) == Some(*hash)
    });

    match (candidates.next(), candidates.next()) {
        (Some((name, _)), None) => Some(name.clone()),
        _ => None,
    }
}

/// Tries the `preferred` remotes in order, then every other remote, stopping at the first hit.
pub fn detect_across_remotes(
    remotes: &BTreeMap<String, BTreeMap<String, String>>,
    heads: &BTreeMap<String, String>,
    preferred: &[String],
) -> Option<DefaultBranch> {
    let ordered = preferred
        .iter()
        .filter(|name| remotes.contains_key(*name))
        .chain(remotes.keys().filter(|name| !preferred.contains(*name)));

    for remote in ordered {
        let refs = &remotes[remote];
        if let Some(name) = detect_default_branch(refs, heads) {
            let tip = heads.get(&name)?.clone();
            return Some(DefaultBranch {
                name,
                tip,
                remote: remote.clone(),
            });
        }
    }
    None
}

fn is_plain_branch_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}
