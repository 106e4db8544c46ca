//! Module manifests: reading a module's declared import path.
//!
//! Only the `module` directive of `go.mod` matters here; requirements and
//! replacements are ignored.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::ManifestError;

/// File name of the manifest that marks a module root
pub const GO_MOD: &str = "go.mod";

// module example.com/mod // comment
static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*module\s+(\S+)\s*(?://.*)?$").unwrap());

/// Reads the declared module path of the module rooted at a directory
pub trait ManifestReader {
    fn module_path(&self, module_root: &Path) -> Result<String, ManifestError>;
}

/// Reader for `go.mod` files
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModReader;

impl ManifestReader for GoModReader {
    fn module_path(&self, module_root: &Path) -> Result<String, ManifestError> {
        let path = module_root.join(GO_MOD);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ManifestError::NotFound { path: path.clone() },
            _ => ManifestError::Read {
                path: path.clone(),
                source: e,
            },
        })?;

        parse_module_directive(&content).ok_or(ManifestError::MissingModuleDirective { path })
    }
}

/// Extracts the path from the first `module` directive, unquoting it if needed.
pub fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let caps = MODULE_RE.captures(line)?;
        let raw = &caps[1];
        let unquoted = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| raw.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
            .unwrap_or(raw);
        (!unquoted.is_empty()).then(|| unquoted.to_string())
    })
}
