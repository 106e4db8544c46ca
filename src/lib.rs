pub mod analyzer;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod tagger;
pub mod ui;

pub use error::{ManifestError, ModtagError, Result};
