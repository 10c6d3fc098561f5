//! Terminal-width and grapheme helpers for the single-line title editor.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Shorten `s` to at most `max_cells` cells, ending in `…` when cut
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme boundary after `offset` (clamped to the end)
pub fn next_boundary(s: &str, offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    s[offset..]
        .grapheme_indices(true)
        .nth(1)
        .map_or(s.len(), |(i, _)| offset + i)
}

/// Byte offset of the grapheme boundary before `offset` (clamped to 0)
pub fn prev_boundary(s: &str, offset: usize) -> usize {
    let offset = offset.min(s.len());
    s[..offset]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(i, _)| i)
}

/// Start of the word before `offset`, skipping trailing whitespace first.
/// Used by Ctrl-W / Alt-Backspace.
pub fn word_start_before(s: &str, offset: usize) -> usize {
    let offset = offset.min(s.len());
    let graphemes: Vec<(usize, &str)> = s[..offset].grapheme_indices(true).collect();
    let is_space = |g: &str| g.chars().all(char::is_whitespace);

    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(offset, |(i, _)| *i)
}

/// Terminal column of the cursor at byte `offset`
pub fn cursor_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}
