use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::core::parsers::source::syntax_for_path;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Include/exclude globs of one catalogue, matched against paths relative to
/// the project root with `/` separators.
#[derive(Debug, Clone)]
pub struct SourceMatcher {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl SourceMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
        })
    }

    pub fn matches(&self, relative: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    let mut compiled = Vec::new();
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            let glob = Pattern::new(&expanded)
                .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;
            compiled.push(glob);
        }
    }
    Ok(compiled)
}

/// Expand `{a,b}` alternatives, which `glob::Pattern` does not support.
///
/// `src/*.{ts,tsx}` expands to `src/*.ts` and `src/*.tsx`. Unbalanced braces
/// are left as-is.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (offset, c) in pattern[open..].char_indices() {
        let index = open + offset;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(index);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(index),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alternative = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{prefix}{alternative}{suffix}"))
        })
        .collect()
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Result of scanning files.
pub struct ScanResult {
    /// Matching source files, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_files(root: &Path, matcher: &SourceMatcher) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                tracing::warn!("Cannot access path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_scannable_file(entry.path()) {
            continue;
        }
        if matcher.matches(&relative_path(root, entry.path())) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    ScanResult {
        files,
        skipped_count,
    }
}

pub fn is_scannable_file(path: &Path) -> bool {
    path.to_str().is_some_and(|p| syntax_for_path(p).is_some())
}
