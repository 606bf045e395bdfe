use std::process::ExitCode;

use clap::Parser;
use sayable::cli::{Arguments, ExitStatus};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Arguments::parse();

    let level = if args.verbose() {
        "debug"
    } else if args.quiet() {
        "error"
    } else {
        "warn"
    };
    init_tracing(level);

    match sayable::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

/// Diagnostics go to stderr. `RUST_LOG` replaces the level chosen by
/// `-v`/`-q` when set.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sayable={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
