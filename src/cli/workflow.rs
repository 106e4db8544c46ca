//! Main workflow: locate the repository and module, check, report, tag.
//!
//! Kept apart from `main.rs` so it can be driven with any output writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::exit::RunStatus;
use super::Args;
use crate::analyzer::{classifier, Checker};
use crate::config::{load_config, Config};
use crate::discovery::{determine_dirs, search_upward_for, GIT_DIR};
use crate::error::ModtagError;
use crate::git::{open_repository, Repository};
use crate::manifest::GoModReader;
use crate::orchestrator::{self, display_name};
use crate::process::Deadline;
use crate::report::ModuleReport;
use crate::tagger::{ensure_clean, maybe_add_tag, TagOutcome};
use crate::ui;

/// Runs one invocation and returns its exit code.
///
/// Errors that stop the whole run are returned; per-module failures and
/// refused major bumps are folded into the exit code.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<i32> {
    let config = load_config(args.config.as_deref()).context("loading configuration")?;
    let deadline = Deadline::after(config.timeout());

    let (repo_dir, module_dir) = resolve_dirs(args)?;
    debug!(repo = %repo_dir.display(), module = ?module_dir, "resolved directories");

    let repo = open_repository(&config, &repo_dir, args.git.as_deref(), deadline)
        .with_context(|| format!("opening repository {}", repo_dir.display()))?;

    if args.add {
        ensure_clean(repo.as_ref()).context("checking for clean repository")?;
    }

    let classifier = classifier::from_config(&config, deadline);
    let checker = Checker::new(
        repo.as_ref(),
        &GoModReader,
        classifier.as_ref(),
        &config.remotes,
    );

    let mut status = RunStatus::default();

    match module_dir {
        None => {
            let outcome = orchestrator::scan(&checker)
                .with_context(|| format!("checking all modules in {}", repo_dir.display()))?;

            if args.json {
                serde_json::to_writer_pretty(&mut *out, &outcome.reports)?;
                writeln!(out)?;
            }

            for (i, (subdir, report)) in outcome.reports.iter().enumerate() {
                if !args.json {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    ui::write_module_heading(out, display_name(subdir))?;
                }
                report_and_tag(args, &config, repo.as_ref(), report, &mut status, out)?;
            }

            for failure in &outcome.failures {
                ui::display_error(&format!(
                    "checking module {}: {}",
                    failure.module_dir.display(),
                    failure.error
                ));
                status.failed = true;
            }
        }
        Some(module_dir) => {
            let report = checker.check(&module_dir).with_context(|| {
                format!(
                    "checking module {} in repository {}",
                    module_dir.display(),
                    repo_dir.display()
                )
            })?;

            if args.json {
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            }
            report_and_tag(args, &config, repo.as_ref(), &report, &mut status, out)?;
        }
    }

    Ok(status.exit_code(args.status))
}

/// Describes one report (unless emitting JSON) and, with `--add`, tags it.
fn report_and_tag<W: Write>(
    args: &Args,
    config: &Config,
    repo: &dyn Repository,
    report: &ModuleReport,
    status: &mut RunStatus,
    out: &mut W,
) -> Result<()> {
    status.warnings += if args.json {
        report.warnings().len()
    } else {
        ui::describe(report, args.quiet, out)?
    };

    if !args.add {
        return Ok(());
    }

    match maybe_add_tag(repo, report, args.message.as_deref(), args.sign, config) {
        Ok(TagOutcome::Created { tag }) => {
            if !args.json {
                writeln!(out, "Added tag {}", tag)?;
            }
        }
        Ok(TagOutcome::Skipped(reason)) => {
            debug!(module = %report.module_subdir, %reason, "no tag added");
        }
        Err(e @ ModtagError::MajorBumpRefused { .. }) => {
            ui::display_error(&e.to_string());
            status.major_bump_refused = true;
        }
        Err(e) => {
            ui::display_error(&format!(
                "adding tag to module {}: {}",
                display_name(&report.module_subdir),
                e
            ));
            status.failed = true;
        }
    }
    Ok(())
}

/// Repository dir and, unless `--all`, module dir.
///
/// With no positional arguments the search starts at `.`; with one it
/// starts there; two are made absolute against the current directory.
pub fn resolve_dirs(args: &Args) -> Result<(PathBuf, Option<PathBuf>)> {
    match (&args.repodir, &args.moduledir) {
        (Some(_), Some(_)) if args.all => bail!("cannot specify both --all and MODULEDIR"),
        (Some(repo), Some(module)) => {
            // A relative MODULEDIR may be given from the cwd ("repo/lib") or
            // from the repository ("lib").
            let module = if module.is_relative() && !module.starts_with(repo) {
                repo.join(module)
            } else {
                module.clone()
            };
            let repo = std::path::absolute(repo)
                .with_context(|| format!("resolving {}", repo.display()))?;
            let module = std::path::absolute(&module)
                .with_context(|| format!("resolving {}", module.display()))?;
            Ok((repo, Some(module)))
        }
        (start, None) => {
            let start = start.as_deref().unwrap_or(Path::new("."));
            if args.all {
                let repo = search_upward_for(start, GIT_DIR).with_context(|| {
                    format!("finding repository directory from {}", start.display())
                })?;
                Ok((repo, None))
            } else {
                let (repo, module) = determine_dirs(start).with_context(|| {
                    format!("determining directories from {}", start.display())
                })?;
                Ok((repo, Some(module)))
            }
        }
        (None, Some(_)) => bail!("MODULEDIR given without REPODIR"),
    }
}
