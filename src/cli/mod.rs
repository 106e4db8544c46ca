//! Command-line surface: arguments, the check/tag workflow, and exit codes.

pub mod exit;
pub mod workflow;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "modtag",
    version,
    about = "Check Go module version tags in a git repository and recommend the next one"
)]
pub struct Args {
    /// Repository directory; with MODULEDIR omitted, the start of the upward search
    pub repodir: Option<PathBuf>,

    /// Module directory within the repository
    pub moduledir: Option<PathBuf>,

    #[arg(long, help = "Add any recommended new version tag to the repository")]
    pub add: bool,

    #[arg(long, help = "Check all modules in the repository")]
    pub all: bool,

    #[arg(long, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, value_name = "PATH", help = "Path to git binary (uses the git command backend)")]
    pub git: Option<String>,

    #[arg(short, long, help = "With --add, message for the new version tag")]
    pub message: Option<String>,

    #[arg(short, long, help = "With --add, sign the new version tag")]
    pub sign: bool,

    #[arg(short, long, help = "Quiet mode: print warnings only")]
    pub quiet: bool,

    #[arg(long, help = "Exit with status 2 if there are warnings")]
    pub status: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short, long, help = "Verbose logging to stderr")]
    pub verbose: bool,
}
