//! Extract and compile passes over one configured catalogue.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::try_join_all;
use rayon::prelude::*;
use swc_common::SourceMap;

use super::{
    CatalogueEntry, CatalogueError, COMPILED_EXTENSION, FallbackResolver, FileSource, compiled_json,
    merge_catalogue, merge_extracted, output_path, read_catalogue, write_atomic,
};
use crate::config::{CatalogueConfig, Config};
use crate::core::file_scanner::relative_path;
use crate::core::parsers::{CatalogueFormat, Format, source::parse_source};
use crate::core::transform::extract_messages;
use crate::issues::{Issue, ParseErrorIssue};

/// Messages extracted from one source file.
struct FileExtraction {
    entries: Vec<CatalogueEntry>,
    issues: Vec<Issue>,
}

/// Extracted messages of every source file of a catalogue, kept per file so
/// a changed file can be re-extracted on its own.
#[derive(Debug)]
pub struct CatalogueIndex {
    root: PathBuf,
    files: BTreeMap<PathBuf, Vec<CatalogueEntry>>,
}

impl CatalogueIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    /// Extract `files` in parallel, replacing what was indexed for them.
    pub fn extract_files(&mut self, files: &[PathBuf]) -> Vec<Issue> {
        let root = self.root.as_path();
        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path, extract_file(root, path)))
            .collect();

        let mut issues = Vec::new();
        for (path, result) in results {
            match result {
                Some(extraction) => {
                    issues.extend(extraction.issues);
                    self.files.insert(path.clone(), extraction.entries);
                }
                None => {
                    self.files.remove(path);
                }
            }
        }
        issues
    }

    /// Re-extract one file after a change. Returns whether the indexed
    /// messages changed, and the issues found in the file.
    pub fn update_file(&mut self, path: &Path) -> (bool, Vec<Issue>) {
        let before = self.files.get(path).cloned();
        let issues = self.extract_files(&[path.to_path_buf()]);
        (self.files.get(path) != before.as_ref(), issues)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// All messages, united by id. Files are visited in path order so the
    /// result does not depend on extraction order.
    pub fn entries(&self) -> Result<Vec<CatalogueEntry>, CatalogueError> {
        merge_extracted(self.files.values().flatten().cloned())
    }
}

/// `None` when the file no longer exists.
fn extract_file(root: &Path, path: &Path) -> Option<FileExtraction> {
    let file_name = relative_path(root, path);
    let code = match fs::read_to_string(path) {
        Ok(code) => code,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            return Some(FileExtraction {
                entries: Vec::new(),
                issues: vec![
                    ParseErrorIssue {
                        file_path: file_name,
                        error: format!("Failed to read file: {}", e),
                    }
                    .into(),
                ],
            });
        }
    };

    let parsed = match parse_source(code, &file_name, Arc::new(SourceMap::default())) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("skipping {}: {}", file_name, e);
            return Some(FileExtraction {
                entries: Vec::new(),
                issues: vec![
                    ParseErrorIssue {
                        file_path: file_name,
                        error: e.to_string(),
                    }
                    .into(),
                ],
            });
        }
    };

    let output = extract_messages(&parsed, &file_name);
    tracing::debug!("found {} message(s) in {}", output.messages.len(), file_name);
    Some(FileExtraction {
        entries: output.messages.iter().map(CatalogueEntry::from_message).collect(),
        issues: output.issues.into_iter().map(Issue::from).collect(),
    })
}

/// Merge `entries` into the catalogue file of every configured locale.
///
/// Every file is read, merged and rendered before the first one is written,
/// so a corrupt catalogue aborts the pass with nothing changed on disk.
/// Files whose content would not change are not rewritten. Returns the
/// written paths.
pub async fn write_catalogues(
    root: &Path,
    config: &Config,
    catalogue: &CatalogueConfig,
    entries: &[CatalogueEntry],
    prune: bool,
) -> Result<Vec<PathBuf>, CatalogueError> {
    let format = Format::from(catalogue.format);

    let mut pending = Vec::new();
    for locale in &config.locales {
        let path = output_path(root, &catalogue.output, locale, format.extension());
        let existing = read_catalogue(&path, &format, locale).await?;
        let merged = merge_catalogue(
            existing.entries,
            entries,
            *locale == config.source_locale,
            prune,
        );
        let content = format
            .stringify(&merged, locale, existing.content.as_deref())
            .map_err(|source| CatalogueError::Render {
                path: path.clone(),
                source,
            })?;

        if existing.content.as_deref() == Some(content.as_str()) {
            tracing::debug!(path = %path.display(), "catalogue unchanged");
            continue;
        }
        pending.push((path, content));
    }

    let mut written = Vec::new();
    for (path, content) in pending {
        write_atomic(&path, &content).await?;
        written.push(path);
    }
    Ok(written)
}

/// One compiled runtime file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLocale {
    pub locale: String,
    pub path: PathBuf,
    /// Messages with a translation after fallbacks.
    pub translated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    /// Messages of the source catalogue.
    pub messages: usize,
    pub locales: Vec<CompiledLocale>,
}

/// Resolve every locale of a catalogue through its fallbacks and write the
/// runtime JSON files. Nothing is written if any catalogue fails to load.
pub async fn compile_catalogue(
    root: &Path,
    config: &Config,
    catalogue: &CatalogueConfig,
) -> Result<CompileSummary, Arc<CatalogueError>> {
    let resolver = FallbackResolver::from_config(FileSource::new(root, catalogue), config);
    let resolved = try_join_all(config.locales.iter().map(|locale| resolver.resolve(locale))).await?;
    let messages = resolver.messages().await?.len();

    let template = catalogue.compiled_output_template();
    let mut locales = Vec::new();
    for (locale, translations) in config.locales.iter().zip(resolved) {
        let path = output_path(root, &template, locale, COMPILED_EXTENSION);
        write_atomic(&path, &compiled_json(&translations)).await?;
        tracing::debug!(path = %path.display(), "compiled {} message(s) for {}", translations.len(), locale);
        locales.push(CompiledLocale {
            locale: locale.clone(),
            path,
            translated: translations.len(),
        });
    }

    Ok(CompileSummary { messages, locales })
}
