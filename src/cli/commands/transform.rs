use std::{fs, io};

use anyhow::{Context, Result};

use super::super::{
    args::TransformCommand,
    exit_status::ExitStatus,
    report::{error_count, report_to},
};
use crate::{core::transform_source, issues::Issue};

/// Print one source file with its messages rewritten into runtime lookups.
///
/// The code goes to stdout (or `--output`) so diagnostics are written to
/// stderr.
pub fn transform(cmd: TransformCommand) -> Result<ExitStatus> {
    let path = match &cmd.common.root {
        Some(root) => root.join(&cmd.file),
        None => cmd.file.clone(),
    };
    let code = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path.to_string_lossy();

    let (code, output) = transform_source(code, &file_name)?;
    tracing::debug!("{}: {} message(s) rewritten", file_name, output.messages.len());

    match &cmd.output {
        Some(out) => fs::write(out, &code)
            .with_context(|| format!("Failed to write {}", out.display()))?,
        None => print!("{code}"),
    }

    let issues: Vec<Issue> = output.issues.into_iter().map(Issue::from).collect();
    if !cmd.common.quiet {
        report_to(&issues, &mut io::stderr().lock());
    }
    Ok(ExitStatus::from_error_count(error_count(&issues)))
}
