//! Expansion of a point location to the definition that encloses it.

use lsp_types::{DocumentSymbol, DocumentSymbolResponse};
use std::path::Path;

use super::client::LspError;
use super::types::{FullDefinition, Position, Range, SourceLocation};

/// Innermost document symbol range containing `position`.
pub fn enclosing_range(symbols: &DocumentSymbolResponse, position: Position) -> Option<Range> {
    match symbols {
        DocumentSymbolResponse::Flat(infos) => infos
            .iter()
            .map(|info| Range::from(info.location.range))
            .filter(|range| range.contains(position))
            .min_by_key(Range::line_span),
        DocumentSymbolResponse::Nested(nested) => innermost_nested(nested, position),
    }
}

fn innermost_nested(symbols: &[DocumentSymbol], position: Position) -> Option<Range> {
    for symbol in symbols {
        let range = Range::from(symbol.range);
        if !range.contains(position) {
            continue;
        }
        let inner = symbol
            .children
            .as_deref()
            .and_then(|children| innermost_nested(children, position));
        return Some(inner.unwrap_or(range));
    }
    None
}

/// Read a source file, replacing invalid UTF-8 instead of failing.
pub async fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Slice the full lines covered by `range` out of `content`.
///
/// The returned location starts at column 0 of the first line and ends at the
/// last character of the final line.
pub fn expand_to_lines(
    content: &str,
    location: &SourceLocation,
    range: Range,
) -> Result<FullDefinition, LspError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let out_of_bounds = |line: u32| LspError::RangeOutOfBounds {
        path: location.file_id(),
        line,
        line_count: lines.len(),
    };

    let start = range.start.line as usize;
    if start >= lines.len() {
        return Err(out_of_bounds(range.start.line));
    }
    let end = (range.end.line as usize).max(start);
    if end >= lines.len() {
        return Err(out_of_bounds(range.end.line));
    }

    let selected: Vec<&str> = lines[start..=end]
        .iter()
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    // LSP columns count UTF-16 code units.
    let end_character = selected.last().map_or(0, |line| line.encode_utf16().count()) as u32;

    let expanded = Range::new(
        Position::new(start as u32, 0),
        Position::new(end as u32, end_character),
    );

    Ok(FullDefinition {
        text: selected.join("\n"),
        location: SourceLocation::new(location.uri.clone(), expanded),
    })
}
