//! Single-line labels and overflow handling.
//!
//! When a label's text is wider than its content box, the line-break mode
//! decides which part survives: a clipped prefix, or a prefix and/or suffix
//! joined by an ellipsis marker. Fitting uses the metrics provider's
//! `clip_from_left`/`clip_from_right` binary searches. If even the result
//! is too wide, nothing is drawn.

use serde::{Deserialize, Serialize};
use weft_types::{Canvas, Color, Font, FontMetrics, Rect, TextAlignment};

/// How text that does not fit is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBreakMode {
    /// Longest fitting prefix, no marker.
    Clipping,
    /// Marker, then the longest fitting suffix.
    TruncatingHead,
    /// Prefix and suffix sharing the width, marker in between.
    TruncatingMiddle,
    /// Longest fitting prefix, then the marker.
    #[default]
    TruncatingTail,
}

/// Text to draw for `text` in a box `width` wide, or `None` when nothing
/// fits.
pub fn clip_text(
    metrics: &dyn FontMetrics,
    font: &Font,
    text: &str,
    width: f32,
    mode: LineBreakMode,
    ellipsis: &str,
) -> Option<String> {
    if metrics.measure(font, text).advance_width <= width {
        return Some(text.to_string());
    }

    let room = width - metrics.measure(font, ellipsis).advance_width;
    let clipped = match mode {
        LineBreakMode::Clipping => text[..metrics.clip_from_left(font, text, width)].to_string(),
        _ if room < 0.0 => return None,
        LineBreakMode::TruncatingHead => {
            let start = metrics.clip_from_right(font, text, room);
            format!("{ellipsis}{}", &text[start..])
        },
        LineBreakMode::TruncatingMiddle => {
            let half = room * 0.5;
            let end = metrics.clip_from_left(font, text, half);
            let start = metrics.clip_from_right(font, text, half).max(end);
            format!("{}{ellipsis}{}", &text[..end], &text[start..])
        },
        LineBreakMode::TruncatingTail => {
            let end = metrics.clip_from_left(font, text, room);
            format!("{}{ellipsis}", &text[..end])
        },
    };

    if metrics.measure(font, &clipped).advance_width > width {
        return None;
    }
    Some(clipped)
}

/// Content of a label view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    #[serde(default)]
    pub font: Font,
    #[serde(default = "default_text_color")]
    pub color: Color,
    #[serde(default)]
    pub alignment: TextAlignment,
    #[serde(default)]
    pub line_break_mode: LineBreakMode,
}

fn default_text_color() -> Color {
    Color::BLACK
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::default(),
            color: default_text_color(),
            alignment: TextAlignment::Left,
            line_break_mode: LineBreakMode::TruncatingTail,
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_line_break_mode(mut self, mode: LineBreakMode) -> Self {
        self.line_break_mode = mode;
        self
    }

    /// Unclipped advance of the text.
    pub fn preferred_width(&self, metrics: &dyn FontMetrics) -> f32 {
        metrics.measure(&self.font, &self.text).advance_width
    }

    /// One line.
    pub fn preferred_height(&self, metrics: &dyn FontMetrics) -> f32 {
        metrics.line_metrics(&self.font).line_height()
    }

    /// First and last baseline coincide: the font ascent.
    pub fn baseline(&self, metrics: &dyn FontMetrics) -> f32 {
        metrics.line_metrics(&self.font).ascent
    }

    /// Draw into `content_box`, shortening the text as needed.
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        metrics: &dyn FontMetrics,
        content_box: Rect,
        ellipsis: &str,
    ) {
        let Some(text) = clip_text(
            metrics,
            &self.font,
            &self.text,
            content_box.width,
            self.line_break_mode,
            ellipsis,
        ) else {
            return;
        };
        let advance = metrics.measure(&self.font, &text).advance_width;
        let x = content_box.x + self.alignment.offset(content_box.width, advance);
        let baseline = content_box.y + self.baseline(metrics);
        canvas.draw_text(&self.font, x, baseline, &text, self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, MockCanvas, stub_metrics};

    const ELLIPSIS: &str = "\u{2026}";

    fn font() -> Font {
        Font::new("stub", 16.0)
    }

    fn clip(text: &str, width: f32, mode: LineBreakMode) -> Option<String> {
        clip_text(&stub_metrics(), &font(), text, width, mode, ELLIPSIS)
    }

    fn width_of(text: &str) -> f32 {
        stub_metrics().measure(&font(), text).advance_width
    }

    #[test]
    fn fitting_text_is_untouched() {
        for mode in [
            LineBreakMode::Clipping,
            LineBreakMode::TruncatingHead,
            LineBreakMode::TruncatingMiddle,
            LineBreakMode::TruncatingTail,
        ] {
            assert_eq!(clip("Hello", 40.0, mode).as_deref(), Some("Hello"));
        }
    }

    #[test]
    fn clipping_keeps_fitting_prefix() {
        // 8px per char.
        assert_eq!(clip("Hello World", 43.0, LineBreakMode::Clipping).as_deref(), Some("Hello"));
    }

    #[test]
    fn truncating_tail_appends_ellipsis() {
        assert_eq!(
            clip("Hello World", 48.0, LineBreakMode::TruncatingTail).as_deref(),
            Some("Hello\u{2026}")
        );
    }

    #[test]
    fn truncating_head_prepends_ellipsis() {
        assert_eq!(
            clip("Hello World", 48.0, LineBreakMode::TruncatingHead).as_deref(),
            Some("\u{2026}World")
        );
    }

    #[test]
    fn truncating_middle_fits_box() {
        let box_width = 60.0;
        let out = clip("Hello World", box_width, LineBreakMode::TruncatingMiddle).unwrap();
        let (left, right) = out.split_once(ELLIPSIS).unwrap();
        assert_eq!(left, "Hel");
        assert_eq!(right, "rld");
        assert!(width_of(left) + width_of(ELLIPSIS) + width_of(right) <= box_width);
    }

    #[test]
    fn no_room_for_ellipsis_renders_nothing() {
        assert_eq!(clip("Hello", 5.0, LineBreakMode::TruncatingTail), None);
        assert_eq!(clip("Hello", 5.0, LineBreakMode::TruncatingMiddle), None);
        // Clipping has no marker, so it degrades to an empty prefix.
        assert_eq!(clip("Hello", 5.0, LineBreakMode::Clipping).as_deref(), Some(""));
    }

    #[test]
    fn label_preferred_size_and_baseline() {
        let label = Label::new("abc").with_font(font());
        let m = stub_metrics();
        assert_eq!(label.preferred_width(&m), 24.0);
        assert_eq!(label.preferred_height(&m), 16.0);
        assert_eq!(label.baseline(&m), 12.0);
    }

    #[test]
    fn render_aligns_clipped_text() {
        let label = Label::new("abcd")
            .with_font(font())
            .with_alignment(TextAlignment::Right);
        let mut canvas = MockCanvas::new();
        label.render(&mut canvas, &stub_metrics(), Rect::new(10.0, 20.0, 100.0, 16.0), ELLIPSIS);
        assert_eq!(
            canvas.calls,
            vec![DrawCall::Text {
                x: 78.0,
                baseline_y: 32.0,
                text: "abcd".into(),
                color: Color::BLACK,
            }]
        );
    }

    #[test]
    fn render_draws_nothing_when_too_narrow() {
        let label = Label::new("abcd").with_font(font());
        let mut canvas = MockCanvas::new();
        label.render(&mut canvas, &stub_metrics(), Rect::new(0.0, 0.0, 4.0, 16.0), ELLIPSIS);
        assert!(canvas.calls.is_empty());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncating_tail_is_longest_fitting_prefix(
                text in "[a-zA-Z ]{0,40}",
                width in 0u32..400,
            ) {
                let width = width as f32;
                let Some(out) = clip(&text, width, LineBreakMode::TruncatingTail) else {
                    prop_assert!(width < width_of(ELLIPSIS));
                    return Ok(());
                };
                prop_assert!(width_of(&out) <= width);
                if out != text {
                    let prefix = out.strip_suffix(ELLIPSIS).unwrap();
                    prop_assert!(text.starts_with(prefix));
                    let next_len = prefix.chars().count() + 1;
                    let longer: String = text.chars().take(next_len).collect();
                    prop_assert!(width_of(&longer) + width_of(ELLIPSIS) > width);
                }
            }
        }
    }
}
