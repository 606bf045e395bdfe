use anyhow::{Context, Result};

use super::{
    args::Command,
    commands::{compile::compile, extract::extract, init::init, transform::transform},
    exit_status::ExitStatus,
};

/// Dispatch a parsed command.
///
/// Catalogue I/O is async; a current-thread runtime is enough since source
/// extraction runs on the rayon pool.
pub fn run(command: Command) -> Result<ExitStatus> {
    let runtime = || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")
    };

    match command {
        Command::Extract(cmd) => runtime()?.block_on(extract(cmd)),
        Command::Compile(cmd) => runtime()?.block_on(compile(cmd)),
        Command::Transform(cmd) => transform(cmd),
        Command::Init => init(),
    }
}
