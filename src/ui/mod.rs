//! User interface module - report formatting.

pub mod formatter;

pub use formatter::{describe, display_error, write_module_heading};
