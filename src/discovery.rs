//! Locating module roots and the repository around them.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::manifest::GO_MOD;

/// Name of the directory (or file, in worktrees) marking a repository root
pub const GIT_DIR: &str = ".git";

/// Every directory under `repo_dir` containing a `go.mod`, sorted.
///
/// Hidden and `_`-prefixed directories, `vendor` and `testdata` are not entered.
pub fn find_modules(repo_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut modules = Vec::new();

    let walker = WalkDir::new(repo_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && entry.file_name() == GO_MOD {
            if let Some(dir) = entry.path().parent() {
                modules.push(dir.to_path_buf());
            }
        }
    }

    modules.sort();
    Ok(modules)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || name == "vendor" || name == "testdata"
}

/// The nearest directory at or above `dir` that contains `name`.
pub fn search_upward_for(dir: &Path, name: &str) -> Result<PathBuf> {
    let start = dir.canonicalize()?;
    start
        .ancestors()
        .find(|d| d.join(name).exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no {} found above {}", name, start.display()),
            )
            .into()
        })
}

/// The repository and module directories enclosing `dir`
pub fn determine_dirs(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let module_dir = search_upward_for(dir, GO_MOD)?;
    let repo_dir = search_upward_for(dir, GIT_DIR)?;
    Ok((repo_dir, module_dir))
}
