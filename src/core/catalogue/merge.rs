use std::collections::{HashMap, HashSet};

use super::{CatalogueEntry, CatalogueError, FUZZY_FLAG};

/// Union extracted entries by id, in first-seen order.
///
/// Entries sharing an id have their comments and references appended
/// (de-duplicated, order kept). Two entries with the same id but a different
/// (message, context) pair are a hash collision or a conflicting explicit id,
/// and are rejected.
pub fn merge_extracted(
    entries: impl IntoIterator<Item = CatalogueEntry>,
) -> Result<Vec<CatalogueEntry>, CatalogueError> {
    let mut merged: Vec<CatalogueEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(&position) = index.get(&entry.id) else {
            index.insert(entry.id.clone(), merged.len());
            merged.push(entry);
            continue;
        };

        let existing = &mut merged[position];
        if existing.message != entry.message || existing.context != entry.context {
            let second = describe(&entry);
            return Err(CatalogueError::IdCollision {
                id: entry.id,
                first: describe(existing),
                second,
            });
        }
        append_unique(&mut existing.comments, entry.comments);
        append_unique(&mut existing.references, entry.references);
    }

    Ok(merged)
}

fn describe(entry: &CatalogueEntry) -> String {
    match &entry.context {
        Some(context) => format!("{} (context: {})", entry.message, context),
        None => entry.message.clone(),
    }
}

fn append_unique(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

/// Merge extracted entries into the existing content of one locale file.
///
/// - Source locale: the extracted text is authoritative and written as both
///   message and translation.
/// - Other locales: an existing translation is kept verbatim; message,
///   context, comments and references are refreshed from the extraction.
///
/// Translator comments and flags always come from the existing file. The
/// source locale drops `fuzzy`, since its text is the extracted one.
///
/// Entries of the old file that were not extracted again are appended in
/// their old order, unless `prune` is set.
pub fn merge_catalogue(
    existing: Vec<CatalogueEntry>,
    extracted: &[CatalogueEntry],
    is_source: bool,
    prune: bool,
) -> Vec<CatalogueEntry> {
    let mut previous: HashMap<&str, &CatalogueEntry> = HashMap::new();
    for entry in &existing {
        previous.entry(entry.id.as_str()).or_insert(entry);
    }

    let mut merged: Vec<CatalogueEntry> = extracted
        .iter()
        .map(|entry| {
            let old = previous.get(entry.id.as_str());
            let mut flags = old.map(|old| old.flags.clone()).unwrap_or_default();
            let translation = if is_source {
                flags.retain(|flag| flag != FUZZY_FLAG);
                Some(entry.message.clone())
            } else {
                old.and_then(|old| old.translation.clone())
            };
            CatalogueEntry {
                translation,
                translator_comments: old
                    .map(|old| old.translator_comments.clone())
                    .unwrap_or_default(),
                flags,
                ..entry.clone()
            }
        })
        .collect();
    drop(previous);

    if !prune {
        let extracted_ids: HashSet<&str> = extracted.iter().map(|e| e.id.as_str()).collect();
        let stale = existing
            .into_iter()
            .filter(|entry| !extracted_ids.contains(entry.id.as_str()));
        merged.extend(stale);
    }

    merged
}
