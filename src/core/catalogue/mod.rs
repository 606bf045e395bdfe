//! Catalogue pipeline.
//!
//! Extraction merges freshly found messages into one catalogue file per
//! locale, keeping human translations. Compilation resolves every locale
//! through its fallback chain into a flat `id -> translation` map and writes
//! it as JSON for the runtime.

mod error;
mod merge;
mod output;
mod pipeline;
mod resolve;

pub use error::CatalogueError;
pub use merge::{merge_catalogue, merge_extracted};
pub use output::{
    COMPILED_EXTENSION, LoadedCatalogue, compiled_json, output_path, read_catalogue, write_atomic,
};
pub use pipeline::{CatalogueIndex, CompileSummary, CompiledLocale, compile_catalogue, write_catalogues};
pub use resolve::{CatalogueSource, FallbackResolver, FileSource, Translations};

use crate::core::messages::CompositeMessage;

pub const FUZZY_FLAG: &str = "fuzzy";

/// One message of a catalogue file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub id: String,
    /// Canonical ICU text.
    pub message: String,
    /// `None` when untranslated.
    pub translation: Option<String>,
    pub context: Option<String>,
    pub comments: Vec<String>,
    pub references: Vec<String>,
    /// Notes written by translators in the catalogue file itself.
    pub translator_comments: Vec<String>,
    /// Catalogue flags such as `fuzzy`.
    pub flags: Vec<String>,
}

impl CatalogueEntry {
    pub fn from_message(message: &CompositeMessage) -> Self {
        Self {
            id: message.message_id(),
            message: message.to_icu(),
            translation: None,
            context: message.context.clone(),
            comments: message.comments.clone(),
            references: message.references.clone(),
            ..Self::default()
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == FUZZY_FLAG)
    }

    /// Non-empty translation, if any. A fuzzy translation awaits review and
    /// does not count.
    pub fn translated(&self) -> Option<&str> {
        if self.is_fuzzy() {
            return None;
        }
        self.translation.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn entry(id: &str, message: &str, translation: Option<&str>) -> CatalogueEntry {
    CatalogueEntry {
        id: id.to_string(),
        message: message.to_string(),
        translation: translation.map(str::to_string),
        ..CatalogueEntry::default()
    }
}
