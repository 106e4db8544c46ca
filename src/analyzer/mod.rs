//! Analysis pipeline: ref snapshot, version index, compatibility
//! classification, and the recommended next version of a module.

pub mod checker;
pub mod classifier;
pub mod index;
pub mod recommend;
pub mod snapshot;

pub use checker::{resolve_subdir, Checker};
pub use classifier::{
    CommandClassifier, Comparison, CompatibilityClassifier, ConventionalClassifier, Verdict,
};
pub use index::{IndexedVersion, VersionIndex};
pub use recommend::{recommend, Recommendation, RecommendationState};
pub use snapshot::RefSnapshot;
