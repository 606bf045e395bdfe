use anyhow::{Context, Result};

use super::super::{args::CompileCommand, exit_status::ExitStatus, report::Printer};
use super::load_project;
use crate::core::{catalogue::compile_catalogue, file_scanner::relative_path};

pub async fn compile(cmd: CompileCommand) -> Result<ExitStatus> {
    let project = load_project(&cmd.common)?;
    let root = project.root.as_path();
    let mut printer = Printer::stdout(cmd.common.quiet);

    printer.header("Compiling catalogues");

    let mut compiled = 0;
    for catalogue in &project.config.catalogues {
        let summary = compile_catalogue(root, &project.config, catalogue)
            .await
            .with_context(|| format!("Failed to compile catalogues of {}", catalogue.label()))?;

        printer.step(&format!(
            "{}: {} message(s)",
            catalogue.label(),
            summary.messages
        ));
        for locale in &summary.locales {
            printer.info(&format!(
                "{}: {}/{} translated -> {}",
                locale.locale,
                locale.translated,
                summary.messages,
                relative_path(root, &locale.path)
            ));
        }
        compiled += summary.locales.len();
    }

    printer.success(&format!("Compiled {} locale file(s)", compiled));
    Ok(ExitStatus::Success)
}
