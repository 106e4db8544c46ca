//! Domain logic - pure rules over versions, tags, module paths, and branches

pub mod branch;
pub mod commit;
pub mod modpath;
pub mod tag;
pub mod version;

pub use branch::{detect_across_remotes, detect_default_branch, DefaultBranch};
pub use commit::ParsedCommit;
pub use modpath::{ModulePath, SuffixStatus};
pub use tag::VersionTag;
pub use version::{Compatibility, Version};
