use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt;

use super::super::{
    args::ExtractCommand,
    exit_status::ExitStatus,
    report::{
        Printer, error_count, parse_error_count, print_parse_warning, report, visible_issues,
    },
};
use super::load_project;
use crate::{
    config::{CatalogueConfig, Config},
    core::{
        catalogue::{CatalogueIndex, write_catalogues},
        file_scanner::{SourceMatcher, is_scannable_file, relative_path, scan_files},
        watch::{DEFAULT_DEBOUNCE, watch_debounced},
    },
    issues::Issue,
};

/// Extraction state of one configured catalogue.
struct CatalogueRun<'a> {
    catalogue: &'a CatalogueConfig,
    matcher: SourceMatcher,
    index: CatalogueIndex,
}

struct Extraction<'a> {
    root: PathBuf,
    config: &'a Config,
    prune: bool,
    verbose: bool,
    printer: Printer<std::io::Stdout>,
}

pub async fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let project = load_project(&cmd.common)?;
    let mut run = Extraction {
        root: project.root,
        config: &project.config,
        prune: cmd.prune || project.config.prune,
        verbose: cmd.common.verbose,
        printer: Printer::stdout(cmd.common.quiet),
    };

    run.printer.header("Extracting messages");

    let config = run.config;
    let mut catalogues = Vec::new();
    let mut issues = Vec::new();
    for catalogue in &config.catalogues {
        let matcher = SourceMatcher::new(&catalogue.include, &catalogue.exclude)?;
        let scan = scan_files(&run.root, &matcher);
        let mut index = CatalogueIndex::new(&run.root);
        issues.extend(index.extract_files(&scan.files));

        let state = CatalogueRun {
            catalogue,
            matcher,
            index,
        };
        run.sync(&state).await?;
        catalogues.push(state);
    }

    run.report(&issues);
    let status = ExitStatus::from_error_count(error_count(&issues));
    if status == ExitStatus::Success {
        run.printer.success("Catalogues up to date");
    }

    if !cmd.watch {
        return Ok(status);
    }
    run.watch(&mut catalogues).await?;
    Ok(status)
}

impl Extraction<'_> {
    /// Merge the indexed messages into the catalogue files of every locale.
    async fn sync(&mut self, state: &CatalogueRun<'_>) -> Result<()> {
        let label = state.catalogue.label();
        let entries = state
            .index
            .entries()
            .with_context(|| format!("Failed to merge messages of {}", label))?;
        let written = write_catalogues(&self.root, self.config, state.catalogue, &entries, self.prune)
            .await
            .with_context(|| format!("Failed to update catalogues of {}", label))?;

        self.printer.step(&format!(
            "{}: {} message(s) from {} file(s)",
            label,
            entries.len(),
            state.index.file_count()
        ));
        for path in written {
            self.printer
                .info(&format!("wrote {}", relative_path(&self.root, &path)));
        }
        Ok(())
    }

    fn report(&self, issues: &[Issue]) {
        report(&visible_issues(issues, self.verbose));
        print_parse_warning(parse_error_count(issues), self.verbose);
    }

    /// Re-extract changed source files until the process is stopped.
    /// Failures are reported and the watcher keeps running.
    async fn watch(&mut self, catalogues: &mut [CatalogueRun<'_>]) -> Result<()> {
        let changes = watch_debounced(&self.root, DEFAULT_DEBOUNCE)?;
        tokio::pin!(changes);
        self.printer.info("watching for changes...");

        while let Some(path) = changes.next().await {
            if !is_scannable_file(&path) {
                continue;
            }
            let relative = relative_path(&self.root, &path);
            for state in catalogues.iter_mut() {
                if !state.matcher.matches(&relative) {
                    continue;
                }
                self.update(state, &path, &relative).await;
            }
        }
        Ok(())
    }

    async fn update(&mut self, state: &mut CatalogueRun<'_>, path: &Path, relative: &str) {
        let (changed, issues) = state.index.update_file(path);
        self.report(&issues);
        if !changed {
            tracing::debug!("{}: no message changes", relative);
            return;
        }

        self.printer.step(&format!("{} changed", relative));
        if let Err(e) = self.sync(state).await {
            eprintln!("Error: {:#}", e);
        }
    }
}
