//! Checking every module of a repository.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::analyzer::{Checker, RefSnapshot};
use crate::discovery;
use crate::error::{ModtagError, Result};
use crate::report::ModuleReport;

/// A module whose analysis failed
#[derive(Debug)]
pub struct ModuleFailure {
    pub module_dir: PathBuf,
    pub error: ModtagError,
}

/// Reports of the modules that could be analyzed, keyed by module subdirectory,
/// and the failures of those that could not.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub reports: BTreeMap<String, ModuleReport>,
    pub failures: Vec<ModuleFailure>,
}

impl ScanOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Checks every module found under the checker's repository.
pub fn scan(checker: &Checker<'_>) -> Result<ScanOutcome> {
    let module_dirs = discovery::find_modules(checker.repo().workdir())?;
    info!(modules = module_dirs.len(), "discovered modules");
    check_all(checker, &module_dirs)
}

/// Checks each of `module_dirs` against one shared ref snapshot.
///
/// A failing module is left out of the reports and recorded in the failures;
/// the others are still checked. Only a failure to build the snapshot aborts.
pub fn check_all(checker: &Checker<'_>, module_dirs: &[PathBuf]) -> Result<ScanOutcome> {
    let snapshot = RefSnapshot::build(checker.repo())?;
    let mut outcome = ScanOutcome::default();

    for module_dir in module_dirs {
        match checker.check_snapshot(&snapshot, module_dir) {
            Ok(report) => {
                outcome.reports.insert(report.module_subdir.clone(), report);
            }
            Err(error) => {
                warn!(module = %module_dir.display(), %error, "module check failed");
                outcome.failures.push(ModuleFailure {
                    module_dir: module_dir.clone(),
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

/// Label for a module in human-readable output
pub fn display_name(module_subdir: &str) -> &str {
    if module_subdir.is_empty() {
        "."
    } else {
        module_subdir
    }
}
