#![forbid(unsafe_code)]

//! Grapheme- and width-aware string helpers shared by the palette and hosts.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Remove the last grapheme cluster from `s`. Returns `false` if `s` was empty.
pub fn pop_grapheme(s: &mut String) -> bool {
    match s.grapheme_indices(true).next_back() {
        Some((idx, _)) => {
            s.truncate(idx);
            true
        }
        None => false,
    }
}

/// Display width of `s` in terminal cells.
#[must_use]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `max_width` cells, cut on a grapheme
/// boundary, together with its width.
#[must_use]
pub fn truncate_to_width(s: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    for (idx, grapheme) in s.grapheme_indices(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if width + w > max_width {
            return (&s[..idx], width);
        }
        width += w;
    }
    (s, width)
}
