//! Pattern matcher: recognizes message constructs in the syntax tree and
//! builds [`CompositeMessage`] trees from them.
//!
//! Recognized constructs:
//! - tagged templates on the accessor: ``say`Hello ${name}` ``
//! - choice calls: `say.plural(count, { one: "…", other: "…" })`
//! - markup: `<Say>Hello <b>{name}</b></Say>`
//! - markup choices: `<Say.Select _={gender} male="He" other="They" />`
//!
//! Matching state for one source file lives in [`MatchContext`]. Matchers
//! return `None` for anything that is not a well-formed construct; malformed
//! constructs are additionally recorded as issues on the context.

pub mod accessor;
pub mod allocator;
pub mod js;
pub mod jsx;


use swc_common::{BytePos, SourceMap};

use crate::core::messages::{CompositeMessage, Message};
use crate::core::parsers::source::ExtractedComments;
use crate::issues::{MalformedMessageIssue, SourceLocation};

pub use accessor::{AccessorMatch, Descriptor, classify};
pub use allocator::{AllocatorMark, IdentifierAllocator};
pub use js::{match_expr, parse_choice_call, parse_tagged_template};
pub use jsx::match_jsx_element;

/// Marker that starts a translator comment, compared case-insensitively.
const TRANSLATOR_MARKER: &str = "translators:";

/// Per-file matching state.
pub struct MatchContext<'a> {
    file_name: &'a str,
    source_map: &'a SourceMap,
    comments: &'a ExtractedComments,
    pub allocator: IdentifierAllocator,
    /// Start positions of the statements enclosing the current node, one
    /// frame per block or function boundary.
    anchors: Vec<Vec<BytePos>>,
    issues: Vec<MalformedMessageIssue>,
}

impl<'a> MatchContext<'a> {
    pub fn new(file_name: &'a str, source_map: &'a SourceMap, comments: &'a ExtractedComments) -> Self {
        Self {
            file_name,
            source_map,
            comments,
            allocator: IdentifierAllocator::default(),
            anchors: vec![Vec::new()],
            issues: Vec::new(),
        }
    }

    /// Prepare for a new top-level match.
    pub fn begin_match(&mut self) {
        self.allocator.reset();
    }

    /// Enter a block or function body; enclosing statements stop contributing
    /// translator comments.
    pub fn enter_boundary(&mut self) {
        self.anchors.push(Vec::new());
    }

    pub fn exit_boundary(&mut self) {
        self.anchors.pop();
        if self.anchors.is_empty() {
            self.anchors.push(Vec::new());
        }
    }

    pub fn push_anchor(&mut self, pos: BytePos) {
        if let Some(frame) = self.anchors.last_mut() {
            frame.push(pos);
        }
    }

    pub fn pop_anchor(&mut self) {
        if let Some(frame) = self.anchors.last_mut() {
            frame.pop();
        }
    }

    /// `file:line` reference for a position.
    pub fn reference(&self, pos: BytePos) -> Option<String> {
        if pos.is_dummy() {
            return None;
        }
        let loc = self.source_map.lookup_char_pos(pos);
        Some(format!("{}:{}", self.file_name, loc.line))
    }

    /// Translator comments attached to the node at `pos` or to any enclosing
    /// statement up to the nearest block or function boundary, in source order.
    pub fn translator_comments(&self, pos: BytePos) -> Vec<String> {
        let mut positions: Vec<BytePos> = self.anchors.last().cloned().unwrap_or_default();
        positions.push(pos);
        positions.sort();
        positions.dedup();

        let mut comments: Vec<_> = positions
            .iter()
            .flat_map(|pos| self.comments.leading_at(*pos))
            .collect();
        comments.sort_by_key(|comment| comment.span.lo);
        comments.dedup_by_key(|comment| comment.span.lo);

        let mut found: Vec<String> = Vec::new();
        for comment in comments {
            for text in comment.text.lines().filter_map(strip_translator_marker) {
                if !found.contains(&text) {
                    found.push(text);
                }
            }
        }
        found
    }

    /// Build the top-level composite for a construct starting at `pos`.
    pub fn composite(
        &self,
        children: Vec<Message>,
        descriptor: Descriptor,
        accessor: Box<swc_ecma_ast::Expr>,
        pos: BytePos,
    ) -> CompositeMessage {
        CompositeMessage {
            children,
            context: descriptor.context,
            id: descriptor.id,
            comments: self.translator_comments(pos),
            references: self.reference(pos).into_iter().collect(),
            accessor,
        }
    }

    pub fn report_malformed(&mut self, pos: BytePos, reason: impl Into<String>) {
        let loc = self.source_map.lookup_char_pos(pos);
        let issue = MalformedMessageIssue {
            location: SourceLocation::new(self.file_name, loc.line, loc.col.0 + 1),
            reason: reason.into(),
        };
        // A failed outer construct is re-walked, so nested failures can repeat.
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn take_issues(&mut self) -> Vec<MalformedMessageIssue> {
        std::mem::take(&mut self.issues)
    }
}

/// Strip the translator marker from one comment line, `None` if the line
/// is not a translator comment.
fn strip_translator_marker(line: &str) -> Option<String> {
    let line = line.trim().trim_start_matches('*').trim_start();
    let head = line.get(..TRANSLATOR_MARKER.len())?;
    if !head.eq_ignore_ascii_case(TRANSLATOR_MARKER) {
        return None;
    }
    let text = line[TRANSLATOR_MARKER.len()..].trim();
    (!text.is_empty()).then(|| text.to_string())
}
