use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_cells` cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = display_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme boundary after `offset`, if any.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let g = grapheme_at(s, offset);
    (!g.is_empty()).then(|| offset + g.len())
}

/// Byte offset of the grapheme boundary before `offset`, if any.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset.min(s.len())]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// The grapheme cluster starting at `offset` (empty at the end).
pub fn grapheme_at(s: &str, offset: usize) -> &str {
    s.get(offset..)
        .and_then(|rest| rest.graphemes(true).next())
        .unwrap_or("")
}
