use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for modtag operations
#[derive(Error, Debug)]
pub enum ModtagError {
    #[error("Listing refs failed: {0}")]
    RefListing(String),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Cannot compare {from} to {to}: {reason}")]
    Classification {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Module dir {module} is not in repository {repo}")]
    PathResolution { module: PathBuf, repo: PathBuf },

    #[error("Will not add new major-version tag {tag}")]
    MajorBumpRefused { tag: String },

    #[error("Repository is not clean")]
    UncleanRepository,

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Deadline passed running {command}")]
    Timeout { command: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading a module manifest (`go.mod`)
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no module directive in {path}")]
    MissingModuleDirective { path: PathBuf },
}

/// Convenience type alias for Results in modtag
pub type Result<T> = std::result::Result<T, ModtagError>;

impl ModtagError {
    /// Create a ref-listing error with context
    pub fn ref_listing(msg: impl Into<String>) -> Self {
        ModtagError::RefListing(msg.into())
    }

    /// Create a classification error for the compared revisions
    pub fn classification(
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ModtagError::Classification {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Create a command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        ModtagError::Command(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ModtagError::Config(msg.into())
    }

    /// True for the policy refusal that gets its own exit code.
    pub fn is_major_bump_refused(&self) -> bool {
        matches!(self, ModtagError::MajorBumpRefused { .. })
    }
}
