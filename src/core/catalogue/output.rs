use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{CatalogueEntry, CatalogueError};
use crate::config::{EXTENSION_PLACEHOLDER, LOCALE_PLACEHOLDER};
use crate::core::parsers::{CatalogueFormat, Format};

/// Extension of compiled runtime files.
pub const COMPILED_EXTENSION: &str = "json";

/// Substitute every `{locale}` and `{extension}` in an output template.
pub fn output_path(root: &Path, template: &str, locale: &str, extension: &str) -> PathBuf {
    root.join(
        template
            .replace(LOCALE_PLACEHOLDER, locale)
            .replace(EXTENSION_PLACEHOLDER, extension),
    )
}

/// A catalogue file as found on disk.
#[derive(Debug, Default)]
pub struct LoadedCatalogue {
    /// Raw content, `None` when the file does not exist.
    pub content: Option<String>,
    pub entries: Vec<CatalogueEntry>,
}

/// Read and parse one locale file.
///
/// A missing file is an empty catalogue. Content that fails to parse is an
/// error: the file holds translations that must not be overwritten.
pub async fn read_catalogue(
    path: &Path,
    format: &Format,
    locale: &str,
) -> Result<LoadedCatalogue, CatalogueError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no catalogue yet");
            return Ok(LoadedCatalogue::default());
        }
        Err(source) => {
            return Err(CatalogueError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let entries = format
        .parse(&content, locale)
        .map_err(|source| CatalogueError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(LoadedCatalogue {
        content: Some(content),
        entries,
    })
}

/// Write `content` through a sibling temporary file and a rename, so the
/// target is either fully replaced or left untouched.
pub async fn write_atomic(path: &Path, content: &str) -> Result<(), CatalogueError> {
    let write_error = |source| CatalogueError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, content).await.map_err(write_error)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_error(e));
    }
    Ok(())
}

/// Render a compiled `id -> translation` map.
pub fn compiled_json(translations: &BTreeMap<String, String>) -> String {
    let mut json = serde_json::to_string_pretty(translations).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}
