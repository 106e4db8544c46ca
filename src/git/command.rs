use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, RefEntry, TAGS_PREFIX};
use crate::process::{self, Deadline};

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Repository backend that shells out to a git binary.
///
/// Every invocation runs in the repository directory under the shared deadline.
pub struct GitCommand {
    git: PathBuf,
    dir: PathBuf,
    deadline: Deadline,
}

impl GitCommand {
    pub fn new(git: impl AsRef<Path>, dir: impl AsRef<Path>, deadline: Deadline) -> Self {
        GitCommand {
            git: git.as_ref().to_path_buf(),
            dir: dir.as_ref().to_path_buf(),
            deadline,
        }
    }

    fn git<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.git);
        cmd.current_dir(&self.dir).args(args);
        cmd
    }
}

impl super::Repository for GitCommand {
    fn workdir(&self) -> &Path {
        &self.dir
    }

    fn git_dir(&self) -> PathBuf {
        self.dir.join(".git")
    }

    fn list_refs(&self) -> Result<Vec<RefEntry>> {
        let output = process::run(self.git(["show-ref"]), self.deadline)?;

        // show-ref exits 1 when the repository has no refs at all.
        if !output.status.success() {
            if output.status.code() == Some(1) && output.stdout.is_empty() {
                return Ok(Vec::new());
            }
            return Err(ModtagError::command(format!(
                "git show-ref exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ModtagError::command(format!("git show-ref output: {}", e)))?;
        Ok(parse_show_ref(&stdout))
    }

    fn tag_target(&self, tag_name: &str) -> Result<String> {
        let rev = format!("{}{}^{{commit}}", TAGS_PREFIX, tag_name);
        let output = process::run_checked(
            self.git(["rev-parse", "--verify", "--quiet", rev.as_str()]),
            self.deadline,
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn commits_between(
        &self,
        from: &str,
        to: &str,
        path: Option<&str>,
    ) -> Result<Vec<CommitInfo>> {
        let range = format!("{}..{}", from, to);
        let format = format!("--format=%H{f}%an{f}%B{r}", f = "%x1f", r = "%x1e");
        let mut args = vec!["log".to_string(), "--reverse".to_string(), format, range];
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            args.push("--".to_string());
            args.push(path.to_string());
        }

        let output = process::run_checked(self.git(&args), self.deadline)?;
        Ok(parse_log(&String::from_utf8_lossy(&output.stdout)))
    }

    fn create_tag(&self, name: &str, target: &str, message: &str, sign: bool) -> Result<()> {
        let mut args = vec!["tag", "-m", message];
        if sign {
            args.push("-s");
        }
        args.push(name);
        args.push(target);

        debug!(tag = name, target, sign, "running git tag");
        process::run_checked(self.git(args), self.deadline)?;
        Ok(())
    }

    fn is_clean(&self) -> Result<bool> {
        let output = process::run_checked(self.git(["status", "--porcelain"]), self.deadline)?;
        Ok(porcelain_is_clean(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parses `git show-ref` output (`<hash> <name>` per line); malformed lines are skipped.
pub fn parse_show_ref(output: &str) -> Vec<RefEntry> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [hash, name] => Some(RefEntry::new(*name, *hash)),
                _ => None,
            }
        })
        .collect()
}

fn parse_log(output: &str) -> Vec<CommitInfo> {
    output
        .split(RECORD_SEP)
        .filter_map(|record| {
            let record = record.trim_start_matches('\n');
            let mut fields = record.splitn(3, FIELD_SEP);
            let hash = fields.next()?.trim();
            if hash.is_empty() {
                return None;
            }
            let author = fields.next().unwrap_or("unknown");
            let message = fields.next().unwrap_or("").trim_end();
            Some(CommitInfo {
                hash: hash.to_string(),
                message: message.to_string(),
                author: author.to_string(),
            })
        })
        .collect()
}

/// True when `git status --porcelain` lists nothing but untracked (`??`) entries.
pub fn porcelain_is_clean(output: &str) -> bool {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.starts_with("??"))
}
