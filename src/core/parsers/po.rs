//! Gettext PO catalogue codec, on top of [`polib`].
//!
//! Each message becomes one PO entry. Source comments are written as
//! extracted comments (`#.`), source references as `#:`, and the message
//! context as `msgctxt`. Translator comments (`# `) and flags (`#, fuzzy`)
//! belong to the translator and are carried through untouched. Identifiers
//! are recomputed from (msgid, msgctxt) when reading, unless the entry
//! carries an explicit `#, id=<id>` flag.
//!
//! ```po
//! # Reviewed by Ana
//! #. Greeting on the home page
//! #: src/app.tsx:4
//! #, fuzzy
//! msgid "Hello, {name}!"
//! msgstr "Bonjour, {name} !"
//! ```
//!
//! polib expects well-formed input, so content goes through a line-level
//! check first. That check is also where gettext plural forms are refused:
//! plurals are ICU messages here.

use std::collections::HashSet;
use std::io::BufWriter;

use polib::catalog::Catalog;
use polib::message::{Message, MessageFlags, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;
use tracing::warn;

use super::format::{CatalogueFormat, FormatError};
use crate::core::catalogue::CatalogueEntry;
use crate::core::messages::generate_hash;

const ID_FLAG: &str = "id=";

/// Header used when the content has none; polib requires one.
const FALLBACK_HEADER: &str = "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=UTF-8\\n\"\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct PoFormat;

impl CatalogueFormat for PoFormat {
    fn extension(&self) -> &'static str {
        "po"
    }

    fn parse(&self, content: &str, _locale: &str) -> Result<Vec<CatalogueEntry>, FormatError> {
        let (catalog, _) = read_catalog(content)?;
        Ok(catalog.messages().map(entry_from_message).collect())
    }

    fn stringify(
        &self,
        entries: &[CatalogueEntry],
        locale: &str,
        previous: Option<&str>,
    ) -> Result<String, FormatError> {
        let (mut catalog, obsolete) = match previous.map(read_catalog) {
            Some(Ok((previous, obsolete))) => {
                let mut catalog = Catalog::new(previous.metadata);
                catalog.preheader = previous.preheader;
                (catalog, obsolete)
            }
            Some(Err(err)) => {
                warn!("Previous {locale} catalogue header is unreadable, writing a new one: {err}");
                (Catalog::new(default_metadata(locale)), Vec::new())
            }
            None => (Catalog::new(default_metadata(locale)), Vec::new()),
        };
        if catalog.metadata.language.is_empty() {
            catalog.metadata.language = locale.to_string();
        }

        let mut keys = HashSet::new();
        for entry in entries {
            if !keys.insert((entry.context.as_deref(), entry.message.as_str())) {
                warn!(
                    "Entry \"{}\" shares its msgid and msgctxt with another entry and replaces it",
                    entry.id
                );
            }
            catalog.append_or_update(message_from_entry(entry));
        }

        let mut writer = BufWriter::new(Vec::new());
        po_file::write(&catalog, &mut writer).map_err(|e| FormatError::new(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::new(e.to_string()))?;
        let mut out = String::from_utf8(bytes).map_err(|e| FormatError::new(e.to_string()))?;

        for block in obsolete {
            out.push_str(&block);
            out.push_str("\n\n");
        }
        Ok(out)
    }
}

fn default_metadata(locale: &str) -> CatalogMetadata {
    CatalogMetadata {
        language: locale.to_string(),
        mime_version: "1.0".to_string(),
        content_type: "text/plain; charset=UTF-8".to_string(),
        content_transfer_encoding: "8bit".to_string(),
        ..CatalogMetadata::default()
    }
}

fn entry_from_message(message: &dyn MessageView) -> CatalogueEntry {
    let mut explicit_id = None;
    let mut flags = Vec::new();
    for flag in message.flags().iter() {
        match flag.strip_prefix(ID_FLAG) {
            Some(id) => explicit_id = Some(id.to_string()),
            None => flags.push(flag.clone()),
        }
    }

    let context = message.msgctxt().map(str::to_string);
    CatalogueEntry {
        id: explicit_id.unwrap_or_else(|| generate_hash(message.msgid(), context.as_deref())),
        message: message.msgid().to_string(),
        translation: message
            .msgstr()
            .ok()
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        context,
        comments: comment_lines(message.extracted_comments()),
        references: message
            .source()
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        translator_comments: comment_lines(message.translator_comments()),
        flags,
    }
}

fn comment_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::to_string).collect()
}

fn message_from_entry(entry: &CatalogueEntry) -> Message {
    let mut flags = MessageFlags::new();
    for flag in &entry.flags {
        flags.add_flag(flag);
    }
    if entry.id != generate_hash(&entry.message, entry.context.as_deref()) {
        flags.add_flag(&format!("{ID_FLAG}{}", entry.id));
    }

    Message::build_singular()
        .with_translator_comments(entry.translator_comments.join("\n"))
        .with_extracted_comments(entry.comments.join("\n"))
        .with_source(entry.references.join(" "))
        .with_flags(flags)
        .with_msgctxt(entry.context.clone().unwrap_or_default())
        .with_msgid(entry.message.clone())
        .with_msgstr(entry.translation.clone().unwrap_or_default())
        .done()
}

/// Check `content`, then hand the normalized text to polib. Obsolete
/// (`#~`) blocks are returned verbatim since polib skips them.
fn read_catalog(content: &str) -> Result<(Catalog, Vec<String>), FormatError> {
    let prepared = prepare(content)?;
    let catalog = po_file::parse_from_reader(prepared.text.as_bytes())
        .map_err(|e| FormatError::new(e.to_string()))?;
    Ok((catalog, prepared.obsolete))
}

#[derive(Debug, Default)]
struct Prepared {
    text: String,
    obsolete: Vec<String>,
}

/// Lines between two blank lines.
struct Block<'a> {
    start: usize,
    lines: Vec<&'a str>,
}

impl Block<'_> {
    fn has_body(&self) -> bool {
        self.lines.iter().any(|line| !line.starts_with('#'))
    }

    fn is_obsolete(&self) -> bool {
        !self.has_body() && self.lines.iter().any(|line| line.starts_with("#~"))
    }
}

fn blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            blocks.extend(current.take());
        } else {
            current
                .get_or_insert_with(|| Block {
                    start: index + 1,
                    lines: Vec::new(),
                })
                .lines
                .push(line);
        }
    }
    blocks.extend(current);
    blocks
}

/// Validate each entry and rewrite it in the exact shape polib reads:
/// single-spaced keywords, comment markers followed by a space, and
/// comment-only blocks attached to the entry after them.
fn prepare(content: &str) -> Result<Prepared, FormatError> {
    let mut prepared = Prepared::default();
    let mut entries: Vec<String> = Vec::new();
    let mut has_header = false;
    let mut comments: Vec<&str> = Vec::new();

    for block in blocks(content) {
        if block.is_obsolete() {
            prepared.obsolete.push(block.lines.join("\n"));
            continue;
        }
        if !block.has_body() {
            comments.extend(&block.lines);
            continue;
        }

        let mut text = String::new();
        for line in comments.drain(..).chain(block.lines.iter().copied()) {
            if line.starts_with('#') {
                push_comment(&mut text, line);
            }
        }
        let shape = check_entry(&block, &mut text)?;

        if shape.is_header() {
            if !entries.is_empty() {
                return Err(FormatError::at(block.start, "header entry must come first"));
            }
            if shape.empty_msgstr {
                // Nothing for polib to read; the fallback header stands in.
                continue;
            }
            has_header = true;
        }
        entries.push(text);
    }

    if !has_header {
        prepared.text.push_str(FALLBACK_HEADER);
        prepared.text.push('\n');
    }
    for entry in entries {
        prepared.text.push_str(&entry);
        prepared.text.push('\n');
    }
    Ok(prepared)
}

fn push_comment(text: &mut String, line: &str) {
    text.push_str(line);
    if matches!(line, "#" | "#." | "#:" | "#,") {
        text.push(' ');
    }
    text.push('\n');
}

#[derive(Debug, Clone, Copy)]
struct EntryShape {
    has_context: bool,
    empty_msgid: bool,
    empty_msgstr: bool,
}

impl EntryShape {
    fn is_header(&self) -> bool {
        self.empty_msgid && !self.has_context
    }
}

fn check_entry(block: &Block<'_>, text: &mut String) -> Result<EntryShape, FormatError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut current: Option<&str> = None;
    let mut shape = EntryShape {
        has_context: false,
        empty_msgid: true,
        empty_msgstr: true,
    };

    for (offset, line) in block.lines.iter().enumerate() {
        let line_number = block.start + offset;
        if line.starts_with('#') {
            continue;
        }

        let (keyword, token) = if line.starts_with('"') {
            let keyword = current
                .ok_or_else(|| FormatError::at(line_number, "string without a keyword"))?;
            text.push_str(line);
            (keyword, *line)
        } else {
            let (keyword, rest) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| FormatError::at(line_number, format!("unexpected `{line}`")))?;
            match keyword {
                "msgctxt" | "msgid" | "msgstr" => {}
                "msgid_plural" => return Err(plural_forms(line_number)),
                other if other.starts_with("msgstr[") => return Err(plural_forms(line_number)),
                other => {
                    return Err(FormatError::at(
                        line_number,
                        format!("unknown keyword `{other}`"),
                    ));
                }
            }
            if seen.contains(&keyword) {
                return Err(FormatError::at(
                    line_number,
                    format!("duplicate `{keyword}` in entry"),
                ));
            }
            seen.push(keyword);
            current = Some(keyword);

            let token = rest.trim();
            text.push_str(keyword);
            text.push(' ');
            text.push_str(token);
            (keyword, token)
        };
        text.push('\n');

        let empty = unquote(token, line_number)?.is_empty();
        match keyword {
            "msgctxt" => shape.has_context = true,
            "msgid" => shape.empty_msgid &= empty,
            _ => shape.empty_msgstr &= empty,
        }
    }

    if !seen.contains(&"msgid") {
        return Err(FormatError::at(block.start, "entry without msgid"));
    }
    if !seen.contains(&"msgstr") {
        return Err(FormatError::at(block.start, "entry without msgstr"));
    }
    Ok(shape)
}

fn plural_forms(line: usize) -> FormatError {
    FormatError::at(line, "gettext plural forms are not supported, use ICU plurals")
}

fn unquote(token: &str, line: usize) -> Result<String, FormatError> {
    let inner = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .filter(|_| token.len() >= 2)
        .ok_or_else(|| FormatError::at(line, format!("expected a quoted string, found `{token}`")))?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some(other) => {
                    return Err(FormatError::at(line, format!("invalid escape `\\{other}`")));
                }
                None => return Err(FormatError::at(line, "unterminated escape")),
            },
            '"' => return Err(FormatError::at(line, "unescaped quote inside string")),
            c => value.push(c),
        }
    }
    Ok(value)
}
