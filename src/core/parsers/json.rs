//! JSON catalogue codec.
//!
//! Entries are stored as an object keyed by message id, in catalogue order:
//!
//! ```json
//! {
//!   "vQhkQx": {
//!     "message": "Hello, {name}!",
//!     "translation": "Bonjour, {name} !",
//!     "comments": ["Greeting on the home page"],
//!     "references": ["src/app.tsx:4"]
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::format::{CatalogueFormat, FormatError};
use crate::core::catalogue::CatalogueEntry;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

#[derive(Debug, Serialize, Deserialize)]
struct JsonEntry {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    references: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    translator_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flags: Vec<String>,
}

/// Top-level object in file order. A repeated id is an error rather than
/// the last occurrence silently winning.
struct IdMap(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for IdMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdMapVisitor;

        impl<'de> Visitor<'de> for IdMapVisitor {
            type Value = IdMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by message id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<IdMap, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::new();
                while let Some(id) = map.next_key::<String>()? {
                    if !seen.insert(id.clone()) {
                        return Err(de::Error::custom(format!("duplicate message id \"{id}\"")));
                    }
                    entries.push((id, map.next_value()?));
                }
                Ok(IdMap(entries))
            }
        }

        deserializer.deserialize_map(IdMapVisitor)
    }
}

impl CatalogueFormat for JsonFormat {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn parse(&self, content: &str, _locale: &str) -> Result<Vec<CatalogueEntry>, FormatError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let IdMap(root) =
            serde_json::from_str(content).map_err(|e| FormatError::at(e.line(), e.to_string()))?;

        root.into_iter()
            .map(|(id, value)| {
                let entry: JsonEntry = serde_json::from_value(value)
                    .map_err(|e| FormatError::new(format!("entry \"{id}\": {e}")))?;
                Ok(CatalogueEntry {
                    id,
                    message: entry.message,
                    translation: entry.translation.filter(|t| !t.is_empty()),
                    context: entry.context,
                    comments: entry.comments,
                    references: entry.references,
                    translator_comments: entry.translator_comments,
                    flags: entry.flags,
                })
            })
            .collect()
    }

    fn stringify(
        &self,
        entries: &[CatalogueEntry],
        _locale: &str,
        _previous: Option<&str>,
    ) -> Result<String, FormatError> {
        let mut root = Map::new();
        for entry in entries {
            let value = serde_json::to_value(JsonEntry {
                message: entry.message.clone(),
                translation: entry.translation.clone(),
                context: entry.context.clone(),
                comments: entry.comments.clone(),
                references: entry.references.clone(),
                translator_comments: entry.translator_comments.clone(),
                flags: entry.flags.clone(),
            })
            .map_err(|e| FormatError::new(e.to_string()))?;
            root.insert(entry.id.clone(), value);
        }

        let mut content =
            serde_json::to_string_pretty(&root).map_err(|e| FormatError::new(e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}
