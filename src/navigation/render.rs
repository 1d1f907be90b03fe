//! Plain-text report blocks.
//!
//! The layout is consumed by downstream tools, so the header lines are fixed:
//!
//! ```text
//! ---
//!
//! /path/to/file.rs
//! References in File: 2
//! At: L10:C5, L12:C9
//!
//!  5|...
//! ```

use std::fmt::{self, Display, Write};

use super::windows::DisplayWindow;
use crate::lsp::{FullDefinition, Range, SourceLocation, SymbolCandidate};

const BANNER: &str = "---\n\n";
const GAP: &str = "...";

/// 1-indexed `L<line>:C<col>` coordinate of a location's start.
pub struct Coordinate<'a>(pub &'a SourceLocation);

impl Display for Coordinate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.0.range.start;
        write!(f, "L{}:C{}", start.line + 1, start.character + 1)
    }
}

/// 1-indexed `L<a>:C<b> - L<c>:C<d>` span.
pub struct Span(pub Range);

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Range { start, end } = self.0;
        write!(
            f,
            "L{}:C{} - L{}:C{}",
            start.line + 1,
            start.character + 1,
            end.line + 1,
            end.character + 1
        )
    }
}

fn reference_header(file_id: &str, hits: &[SourceLocation]) -> String {
    let mut out = format!("{}{}\nReferences in File: {}\n", BANNER, file_id, hits.len());
    if !hits.is_empty() {
        let coordinates: Vec<String> = hits.iter().map(|hit| Coordinate(hit).to_string()).collect();
        let _ = writeln!(out, "At: {}", coordinates.join(", "));
    }
    out
}

/// Reference block for a readable file.
pub fn render_references(
    file_id: &str,
    lines: &[&str],
    hits: &[SourceLocation],
    windows: &[DisplayWindow],
) -> String {
    let mut out = reference_header(file_id, hits);
    out.push('\n');
    out.push_str(&format_windows(lines, windows));
    out
}

/// Reference block for a file whose content could not be read.
pub fn render_unreadable(file_id: &str, hits: &[SourceLocation], error: &dyn Display) -> String {
    let mut out = reference_header(file_id, hits);
    let _ = write!(out, "\nError reading file: {}", error);
    out
}

/// Block for a definition reached from a position, showing `window` of the file.
pub fn render_definition(
    file_id: &str,
    expanded: Range,
    lines: &[&str],
    window: DisplayWindow,
) -> String {
    let mut out = format!(
        "{}File: {}\nDefinition at: {}\n\n",
        BANNER,
        file_id,
        Span(expanded)
    );
    out.push_str(&format_windows(lines, &[window]));
    out
}

/// Block for a definition found by name, showing the definition body.
pub fn render_symbol_definition(candidate: &SymbolCandidate, definition: &FullDefinition) -> String {
    let mut out = format!(
        "{}Symbol: {}\nFile: {}\nKind: {}\n",
        BANNER,
        candidate.name,
        definition.location.file_id(),
        candidate.kind
    );
    if let Some(container) = candidate.container.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "Container Name: {}", container);
    }
    let _ = writeln!(out, "Range: {}\n", Span(definition.location.range));

    let first = definition.location.range.start.line as usize;
    let body: Vec<&str> = definition.text.split('\n').collect();
    let window = DisplayWindow::new(first, first + body.len().saturating_sub(1));
    out.push_str(&number_lines(&body, first, number_width(window.end)));
    out
}

/// Numbered lines for each window, with a gap marker between windows.
pub fn format_windows(lines: &[&str], windows: &[DisplayWindow]) -> String {
    let width = windows
        .iter()
        .rev()
        .find(|w| w.start < lines.len())
        .map_or(1, |w| number_width(w.end.min(lines.len() - 1)));
    let mut out = String::new();

    for (i, window) in windows.iter().enumerate() {
        if window.start >= lines.len() {
            break;
        }
        if i > 0 {
            out.push_str(GAP);
            out.push('\n');
        }
        let end = window.end.min(lines.len() - 1);
        out.push_str(&number_lines(&lines[window.start..=end], window.start, width));
    }
    out
}

fn number_lines(lines: &[&str], first: usize, width: usize) -> String {
    let mut out = String::new();
    for (offset, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>width$}|{}",
            first + offset + 1,
            line.trim_end_matches('\r'),
            width = width
        );
    }
    out
}

fn number_width(last_index: usize) -> usize {
    (last_index + 1).to_string().len()
}
