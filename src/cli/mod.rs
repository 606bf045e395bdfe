use std::process::ExitCode;

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
pub mod report;
mod run;

pub use args::{
    Arguments, Command, CommonArgs, CompileCommand, ExtractCommand, TransformCommand,
};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(command) = args.with_command_or_help().and_then(|args| args.command) else {
        return Ok(ExitStatus::Success.into());
    };

    Ok(run::run(command)?.into())
}
