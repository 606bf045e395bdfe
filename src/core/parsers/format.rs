//! Catalogue file codecs.
//!
//! A codec turns catalogue file content into [`CatalogueEntry`] values and
//! back. The pipeline only talks to [`CatalogueFormat`]; concrete formats are
//! selected from configuration through the [`Format`] enum.

use enum_dispatch::enum_dispatch;
use thiserror::Error;

use super::json::JsonFormat;
use super::po::PoFormat;
use crate::config::FormatKind;
use crate::core::catalogue::CatalogueEntry;

/// Content that does not follow the codec's grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}{message}", .line.map(|l| format!("line {l}: ")).unwrap_or_default())]
pub struct FormatError {
    /// 1-based line of the offending input, when known.
    pub line: Option<usize>,
    pub message: String,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

#[enum_dispatch]
pub trait CatalogueFormat {
    /// File extension substituted for `{extension}` in output templates.
    fn extension(&self) -> &'static str;

    /// Parse catalogue content in file order.
    fn parse(&self, content: &str, locale: &str) -> Result<Vec<CatalogueEntry>, FormatError>;

    /// Render entries, reusing whatever the previous file content carries
    /// that the entries do not (headers, for example).
    fn stringify(
        &self,
        entries: &[CatalogueEntry],
        locale: &str,
        previous: Option<&str>,
    ) -> Result<String, FormatError>;
}

#[enum_dispatch(CatalogueFormat)]
#[derive(Debug, Clone)]
pub enum Format {
    Po(PoFormat),
    Json(JsonFormat),
}

impl From<FormatKind> for Format {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Po => Format::Po(PoFormat),
            FormatKind::Json => Format::Json(JsonFormat),
        }
    }
}
