//! Text segmentation and a built-in font-metrics provider.
//!
//! Span flow breaks text at Unicode line-break opportunities (UAX #14).
//! Each segment runs from one opportunity to the next and carries its
//! trailing whitespace, which may hang past the end of a line.

use std::ops::Range;

use unicode_linebreak::{BreakOpportunity, linebreaks};
use weft_types::{Font, FontMetrics, TextMetrics};

/// Chars that end a line when hard breaks are enabled.
fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// A breakable unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte range within the segmented text.
    pub range: Range<usize>,
    /// The segment ends in a newline that forces a line break.
    pub hard_break: bool,
}

/// Split `text` at every line-break opportunity.
///
/// With `hard_breaks` off, newlines are ordinary break opportunities.
pub fn segments(text: &str, hard_breaks: bool) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut start = 0;
    for (end, opportunity) in linebreaks(text) {
        if end == start {
            continue;
        }
        let hard_break = hard_breaks
            && opportunity == BreakOpportunity::Mandatory
            && text[start..end].ends_with(is_newline);
        out.push(Segment {
            range: start..end,
            hard_break,
        });
        start = end;
    }
    out
}

/// `segment` without its trailing newline chars.
pub fn strip_newlines(segment: &str) -> &str {
    segment.trim_end_matches(is_newline)
}

/// Fixed-advance metrics: every char advances by the same fraction of the
/// font size.
///
/// Good enough for layout tests and headless tools; a renderer supplies
/// real glyph metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl MonospaceMetrics {
    /// Ratios are multiplied by the font size.
    pub fn new(advance: f32, ascent: f32, descent: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.6, 0.8, 0.2)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn measure(&self, font: &Font, text: &str) -> TextMetrics {
        let chars = text.chars().count() as f32;
        TextMetrics {
            advance_width: chars * self.advance * font.size,
            ascent: self.ascent * font.size,
            descent: self.descent * font.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(text: &str, hard: bool) -> Vec<(&str, bool)> {
        segments(text, hard)
            .into_iter()
            .map(|s| (&text[s.range], s.hard_break))
            .collect()
    }

    #[test]
    fn words_keep_trailing_spaces() {
        assert_eq!(
            pieces("Hello big world", true),
            vec![("Hello ", false), ("big ", false), ("world", false)]
        );
    }

    #[test]
    fn newlines_force_breaks() {
        assert_eq!(
            pieces("one\ntwo\n", true),
            vec![("one\n", true), ("two\n", true)]
        );
        assert_eq!(
            pieces("one\ntwo", false),
            vec![("one\n", false), ("two", false)]
        );
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(segments("", true).is_empty());
    }

    #[test]
    fn strip_newlines_only_trims_line_ends() {
        assert_eq!(strip_newlines("ab \r\n"), "ab ");
        assert_eq!(strip_newlines("ab"), "ab");
    }

    #[test]
    fn monospace_scales_with_font_size() {
        let m = MonospaceMetrics::new(0.5, 0.75, 0.25);
        let tm = m.measure(&Font::new("mono", 16.0), "abcd");
        assert_eq!(tm.advance_width, 32.0);
        assert_eq!(tm.ascent, 12.0);
        assert_eq!(tm.descent, 4.0);
        assert_eq!(m.line_metrics(&Font::new("mono", 32.0)).line_height(), 32.0);
    }
}
