//! Pure formatting functions for UI output.
//!
//! Report descriptions are written to any `io::Write` so they can be
//! captured; errors go straight to stderr.

use std::io::{self, Write};

use console::style;

use crate::report::{Finding, ModuleReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").for_stderr().red(), message);
}

/// Heading printed above each module when several are described.
pub fn write_module_heading<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    writeln!(w, "{}:\n", style(name).bold())
}

/// Writes a human-readable description of `report`.
///
/// In quiet mode only the warnings are written. Returns the number of
/// warnings, which does not depend on `quiet`.
pub fn describe<W: Write>(report: &ModuleReport, quiet: bool, w: &mut W) -> io::Result<usize> {
    let mut warnings = 0;

    for finding in report.findings() {
        match finding {
            Finding::Warn(warning) => {
                warnings += 1;
                writeln!(w, "{} {}", style("⚠").yellow(), warning)?;
            }
            Finding::Ok(text) if !quiet => writeln!(w, "{} {}", style("✓").green(), text)?,
            Finding::Info(text) if !quiet => writeln!(w, "{} {}", style("ℹ").cyan(), text)?,
            _ => {}
        }
    }

    Ok(warnings)
}
