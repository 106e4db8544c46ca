use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use modtag::cli::{exit, workflow, Args};
use modtag::ui;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut stdout = io::stdout().lock();
    let code = match workflow::run(&args, &mut stdout) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            exit::FAILURE
        }
    };
    let _ = stdout.flush();
    drop(stdout);

    std::process::exit(code);
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "modtag=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
