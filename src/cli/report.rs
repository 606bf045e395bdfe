//! Report formatting and printing utilities.
//!
//! Diagnostics are printed cargo-style; progress lines go through a
//! [`Printer`] so `-q` can silence them without touching the library.

use std::io::{self, Write};

use colored::Colorize;

use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Issues worth printing in full. Parse errors are only listed with `-v`;
/// otherwise they are summarized by [`print_parse_warning`].
pub fn visible_issues(issues: &[Issue], verbose: bool) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| verbose || !matches!(issue, Issue::ParseError(_)))
        .cloned()
        .collect()
}

pub fn parse_error_count(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter(|issue| matches!(issue, Issue::ParseError(_)))
        .count()
}

pub fn error_count(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter(|issue| issue.severity() == Severity::Error)
        .count()
}

// ============================================================
// Progress output
// ============================================================

/// Progress lines of a command run. Everything is dropped in quiet mode.
pub struct Printer<W: Write> {
    writer: W,
    quiet: bool,
}

impl Printer<io::Stdout> {
    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }
}

impl<W: Write> Printer<W> {
    pub fn new(writer: W, quiet: bool) -> Self {
        Self { writer, quiet }
    }

    pub fn header(&mut self, text: &str) {
        self.line(format_args!("{}", text.bold()));
    }

    pub fn step(&mut self, text: &str) {
        self.line(format_args!("  {} {}", "-".dimmed(), text));
    }

    pub fn info(&mut self, text: &str) {
        self.line(format_args!("  {}", text.dimmed()));
    }

    pub fn success(&mut self, text: &str) {
        self.line(format_args!("{} {}", SUCCESS_MARK.green(), text.green()));
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if !self.quiet {
            let _ = writeln!(self.writer, "{}", args);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(loc) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                loc.file_path,
                loc.line,
                loc.col
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = error_count(issues);
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

// ============================================================
// Tests
// ============================================================
