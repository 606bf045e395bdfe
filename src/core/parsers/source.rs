use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap,
    comments::{Comment, Comments, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Rebuild an swc comment store, for code generation.
    pub fn to_swc(&self) -> SingleThreadedComments {
        let comments = SingleThreadedComments::default();
        for (pos, list) in &self.leading {
            comments.add_leading_comments(*pos, list.clone());
        }
        for (pos, list) in &self.trailing {
            comments.add_trailing_comments(*pos, list.clone());
        }
        comments
    }

    /// Comments attached in front of the token starting at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
}

/// Pick the parser syntax from a file extension.
///
/// `.ts`/`.mts`/`.cts` parse as TypeScript, `.tsx` as TSX, and the JavaScript
/// family always allows JSX since `.js` files routinely contain it.
pub fn syntax_for_path(file_path: &str) -> Option<Syntax> {
    let extension = Path::new(file_path).extension()?.to_str()?;
    match extension {
        "ts" | "mts" | "cts" => Some(Syntax::Typescript(TsSyntax::default())),
        "tsx" => Some(Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        })),
        "js" | "jsx" | "mjs" | "cjs" => Some(Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        })),
        _ => None,
    }
}

/// Parse a JavaScript/TypeScript source string into an AST.
///
/// Every file gets its own `SourceMap` from the caller so byte positions, and
/// therefore generated output, do not depend on parse order.
pub fn parse_source(code: String, file_path: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    let Some(syntax) = syntax_for_path(file_path) else {
        bail!("Unsupported source file extension: {}", file_path);
    };

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), Some(&comments));

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind()))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
        })
    })
}
