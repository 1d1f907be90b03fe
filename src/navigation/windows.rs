//! Context windows around hit lines.

/// An inclusive, zero-based line range selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplayWindow {
    pub start: usize,
    pub end: usize,
}

impl DisplayWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Compute the merged display windows for a file's hit lines.
///
/// Each hit is padded by `context_lines` on both sides and clipped to the file.
/// Overlapping or adjacent windows coalesce, so the result is sorted and no two
/// windows touch.
pub fn merge_windows(hit_lines: &[usize], line_count: usize, context_lines: usize) -> Vec<DisplayWindow> {
    if line_count == 0 {
        return Vec::new();
    }

    let candidates = hit_lines
        .iter()
        .map(|&line| padded(line, line, line_count, context_lines))
        .collect();

    coalesce(candidates)
}

/// A single window around an arbitrary range, padded and clipped.
///
/// Returns `None` for an empty file.
pub fn span_window(
    start: usize,
    end: usize,
    line_count: usize,
    context_lines: usize,
) -> Option<DisplayWindow> {
    if line_count == 0 {
        return None;
    }
    Some(padded(start, end.max(start), line_count, context_lines))
}

/// Sort and merge windows that overlap or touch.
pub fn coalesce(mut windows: Vec<DisplayWindow>) -> Vec<DisplayWindow> {
    windows.sort();

    let mut merged: Vec<DisplayWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start <= last.end + 1 => {
                last.end = last.end.max(window.end);
            }
            _ => merged.push(window),
        }
    }
    merged
}

fn padded(start: usize, end: usize, line_count: usize, context_lines: usize) -> DisplayWindow {
    let last = line_count - 1;
    let start = start.min(last);
    let end = end.min(last);
    DisplayWindow::new(
        start.saturating_sub(context_lines),
        end.saturating_add(context_lines).min(last),
    )
}
